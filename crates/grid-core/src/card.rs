//! Cells of the lattice and the cards bound to them.

use crate::constants::{CARD_FADE_MS, CARD_SCALE_MS, LANDSCAPE_SIZE, PORTRAIT_SIZE};
use crate::tween::{Ease, TweenSlot};
use glam::{Vec2, Vec3};

/// Integer address on the infinite lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Center of the cell in grid-local world space.
    pub fn world_position(self, spacing: f32) -> Vec3 {
        Vec3::new(self.x as f32 * spacing, self.y as f32 * spacing, 0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Checkerboard: even `x + y` is portrait.
    pub fn for_cell(cell: CellCoord) -> Self {
        if (cell.x + cell.y).rem_euclid(2) == 0 {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    /// Footprint used until the content's aspect ratio is known.
    pub fn default_size(self) -> Vec2 {
        match self {
            Orientation::Portrait => Vec2::from(PORTRAIT_SIZE),
            Orientation::Landscape => Vec2::from(LANDSCAPE_SIZE),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Appearing,
    Visible,
    Disappearing,
}

impl Visibility {
    /// True from the moment a reveal starts until a hide completes.
    pub fn is_shown(self) -> bool {
        !matches!(self, Visibility::Hidden)
    }
}

#[derive(Clone, Debug)]
pub struct Card {
    /// Creation order, starting at 0.
    pub id: u32,
    pub cell: CellCoord,
    pub position: Vec3,
    pub orientation: Orientation,
    pub content_index: usize,
    pub size: Vec2,
    pub visibility: Visibility,
    pub scale_y: f32,
    pub opacity: f32,
    /// Base Y plus the idle float; what the renderer should draw.
    pub render_y: f32,
    /// Whether the render object is drawn at all.
    pub enabled: bool,
    scale_tween: TweenSlot,
    opacity_tween: TweenSlot,
}

impl Card {
    pub(crate) fn new(id: u32, cell: CellCoord, spacing: f32, content_index: usize, size: Vec2) -> Self {
        let position = cell.world_position(spacing);
        Self {
            id,
            cell,
            position,
            orientation: Orientation::for_cell(cell),
            content_index,
            size,
            visibility: Visibility::Hidden,
            scale_y: 0.0,
            opacity: 0.0,
            render_y: position.y,
            enabled: false,
            scale_tween: TweenSlot::default(),
            opacity_tween: TweenSlot::default(),
        }
    }

    /// Start the reveal. No-op unless the card is fully hidden.
    pub(crate) fn show(&mut self, now_ms: f64) -> bool {
        if self.visibility != Visibility::Hidden {
            return false;
        }
        self.visibility = Visibility::Appearing;
        self.enabled = true;
        self.scale_tween
            .retarget(self.scale_y, 1.0, CARD_SCALE_MS, Ease::Power2Out, now_ms);
        self.opacity_tween
            .retarget(self.opacity, 1.0, CARD_FADE_MS, Ease::Power2Out, now_ms);
        true
    }

    /// Start the hide. No-op unless the card is appearing or visible.
    pub(crate) fn hide(&mut self, now_ms: f64) -> bool {
        if !matches!(self.visibility, Visibility::Appearing | Visibility::Visible) {
            return false;
        }
        self.visibility = Visibility::Disappearing;
        self.scale_tween
            .retarget(self.scale_y, 0.0, CARD_SCALE_MS, Ease::Power2In, now_ms);
        self.opacity_tween
            .retarget(self.opacity, 0.0, CARD_FADE_MS, Ease::Power2In, now_ms);
        true
    }

    pub(crate) fn advance(&mut self, now_ms: f64) {
        if let Some(v) = self.scale_tween.advance(now_ms) {
            self.scale_y = v;
        }
        if let Some(v) = self.opacity_tween.advance(now_ms) {
            self.opacity = v;
        }
        match self.visibility {
            // the render object goes away as soon as the fade ends
            Visibility::Disappearing if !self.opacity_tween.is_running() => {
                self.visibility = Visibility::Hidden;
                self.enabled = false;
            }
            Visibility::Appearing if !self.is_animating() => {
                self.visibility = Visibility::Visible;
            }
            _ => {}
        }
    }

    pub(crate) fn cancel_animations(&mut self) {
        self.scale_tween.cancel();
        self.opacity_tween.cancel();
    }

    pub fn is_animating(&self) -> bool {
        self.scale_tween.is_running() || self.opacity_tween.is_running()
    }
}
