//! The infinite, draggable card grid.
//!
//! All mutation happens either inside a pointer callback or inside
//! [`SpatialCardGrid::update`], which the host calls once per rendered frame.
//! Pointer events for a frame are expected to arrive before that frame's
//! `update`.

use crate::camera::CameraHandle;
use crate::card::{Card, CellCoord, Orientation};
use crate::clock::{Clock, SystemClock};
use crate::config::{GridConfig, GridError};
use crate::constants::*;
use crate::timeline::{CardAction, Scheduled, Timeline};
use crate::tween::{Ease, TweenSlot};
use fnv::FnvHashMap;
use glam::{Vec2, Vec3};

pub type DistortionCallback = Box<dyn FnMut(f32)>;

pub struct SpatialCardGrid<C: Clock = SystemClock> {
    config: GridConfig,
    clock: C,
    camera: CameraHandle,
    on_distortion_change: DistortionCallback,

    // cards in materialization order; `index` maps a cell to its slot
    cards: Vec<Card>,
    index: FnvHashMap<CellCoord, usize>,
    content_aspect: FnvHashMap<usize, f32>,
    timeline: Timeline,

    position_offset: Vec2,
    velocity: Vec2,
    drag_delta: Vec2,
    dragging: bool,
    last_pointer: Vec2,
    cursor_uv: Vec2,
    position: Vec3,

    distortion_intensity: f32,
    distortion_tween: TweenSlot,
    camera_z_tween: TweenSlot,
}

impl SpatialCardGrid<SystemClock> {
    /// Default layout on the system clock. Materializes the initial block.
    pub fn create(camera: CameraHandle, on_distortion_change: impl FnMut(f32) + 'static) -> Self {
        Self::build(
            GridConfig::default(),
            camera,
            Box::new(on_distortion_change),
            SystemClock::new(),
        )
    }
}

impl<C: Clock> SpatialCardGrid<C> {
    pub fn with_config(
        config: GridConfig,
        camera: CameraHandle,
        on_distortion_change: impl FnMut(f32) + 'static,
        clock: C,
    ) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self::build(
            config,
            camera,
            Box::new(on_distortion_change),
            clock,
        ))
    }

    fn build(
        config: GridConfig,
        camera: CameraHandle,
        on_distortion_change: DistortionCallback,
        clock: C,
    ) -> Self {
        let mut grid = Self {
            config,
            clock,
            camera,
            on_distortion_change,
            cards: Vec::new(),
            index: FnvHashMap::default(),
            content_aspect: FnvHashMap::default(),
            timeline: Timeline::default(),
            position_offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            drag_delta: Vec2::ZERO,
            dragging: false,
            last_pointer: Vec2::ZERO,
            cursor_uv: Vec2::splat(0.5),
            position: Vec3::ZERO,
            distortion_intensity: 0.0,
            distortion_tween: TweenSlot::default(),
            camera_z_tween: TweenSlot::default(),
        };
        let half_cols = grid.config.cols / 2;
        let half_rows = grid.config.rows / 2;
        for x in -half_cols..=half_cols {
            for y in -half_rows..=half_rows {
                grid.materialize(CellCoord::new(x, y));
            }
        }
        log::info!(
            "[grid] created {} cards, spacing={} content={}",
            grid.cards.len(),
            grid.config.spacing,
            grid.config.content.len()
        );
        grid
    }

    // ---------------- Pointer input ----------------

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last_pointer = Vec2::new(x, y);
        let now = self.clock.now_ms();
        self.ease_camera_z(CAMERA_BASE_Z + CAMERA_PULL_DISTANCE, now);
        self.distortion_tween.retarget(
            self.distortion_intensity,
            DISTORTION_PEAK,
            DISTORTION_IN_MS,
            Ease::Power2Out,
            now,
        );
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32, viewport_w: f32, viewport_h: f32) {
        // a zero-sized viewport would poison the parallax with NaN
        if viewport_w > 0.0 && viewport_h > 0.0 {
            self.cursor_uv = Vec2::new(x / viewport_w, 1.0 - y / viewport_h);
        }
        if self.dragging {
            let delta = Vec2::new(x - self.last_pointer.x, -(y - self.last_pointer.y)) * DRAG_SCALE;
            self.drag(delta);
            self.last_pointer = Vec2::new(x, y);
        }
    }

    pub fn on_pointer_up(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        let now = self.clock.now_ms();
        self.ease_camera_z(CAMERA_BASE_Z, now);
        self.distortion_tween.retarget(
            self.distortion_intensity,
            0.0,
            DISTORTION_OUT_MS,
            Ease::Power2Out,
            now,
        );
        self.drag_delta = Vec2::ZERO;
    }

    fn drag(&mut self, delta: Vec2) {
        self.drag_delta += delta;
        self.velocity = delta * DRAG_VELOCITY_FACTOR;
    }

    fn ease_camera_z(&mut self, target_z: f32, now_ms: f64) {
        let current = self.camera.borrow().eye.z;
        self.camera_z_tween
            .retarget(current, target_z, CAMERA_EASE_MS, Ease::Power2Out, now_ms);
    }

    // ---------------- Per-frame update ----------------

    /// Advance animations, then scroll, expand and float, in that order.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        self.advance_animations(now);

        let parallax = self.ambient_parallax();

        // drag is authoritative for the frame it was supplied in
        if self.drag_delta.length() > DRAG_EPSILON {
            self.position_offset += self.drag_delta;
        } else {
            self.position_offset += self.velocity;
        }
        self.drag_delta = Vec2::ZERO;

        // per-frame, not time-scaled
        self.velocity = self.velocity.lerp(Vec2::ZERO, VELOCITY_DAMPING);

        self.position = (self.position_offset + parallax).extend(0.0);

        self.expand(now);

        let t = now / 1000.0;
        for card in self.cards.iter_mut().filter(|c| c.visibility.is_shown()) {
            let phase = (t + card.id as f64).sin() as f32;
            card.render_y = card.position.y + phase * FLOAT_AMPLITUDE;
        }
    }

    fn advance_animations(&mut self, now_ms: f64) {
        for due in self.timeline.drain_due(now_ms) {
            if let Some(&slot) = self.index.get(&due.cell) {
                let card = &mut self.cards[slot];
                match due.action {
                    CardAction::Show => card.show(now_ms),
                    CardAction::Hide => card.hide(now_ms),
                };
            }
        }
        for card in self.cards.iter_mut() {
            card.advance(now_ms);
        }
        if let Some(z) = self.camera_z_tween.advance(now_ms) {
            self.camera.borrow_mut().eye.z = z;
        }
        if let Some(v) = self.distortion_tween.advance(now_ms) {
            self.distortion_intensity = v;
            (self.on_distortion_change)(v);
        }
    }

    /// Cosmetic offset from the cursor; never affects which cells exist.
    pub fn ambient_parallax(&self) -> Vec2 {
        (self.cursor_uv - Vec2::splat(0.5)) * AMBIENT_PARALLAX_SCALE
    }

    /// Inclusive cell bounds that must be materialized for the current offset.
    pub fn visible_cell_bounds(&self) -> (CellCoord, CellCoord) {
        let s = self.config.spacing;
        let m = self.config.view_margin;
        let center = -self.position_offset;
        let min = CellCoord::new(
            ((center.x - m.x) / s).floor() as i32,
            ((center.y - m.y) / s).floor() as i32,
        );
        let max = CellCoord::new(
            ((center.x + m.x) / s).ceil() as i32,
            ((center.y + m.y) / s).ceil() as i32,
        );
        (min, max)
    }

    fn expand(&mut self, now_ms: f64) {
        let (min, max) = self.visible_cell_bounds();
        let reveal_at = now_ms + self.config.expand_reveal_delay_ms;
        let mut created = 0usize;
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                let cell = CellCoord::new(x, y);
                if self.materialize(cell).is_some() {
                    self.timeline.schedule(reveal_at, cell, CardAction::Show);
                    created += 1;
                }
            }
        }
        if created > 0 {
            log::debug!(
                "[grid] materialized {} cards around ({:.1}, {:.1}), total={}",
                created,
                -self.position_offset.x,
                -self.position_offset.y,
                self.cards.len()
            );
        }
    }

    /// Create the card for `cell` unless one exists. Returns its slot if new.
    fn materialize(&mut self, cell: CellCoord) -> Option<usize> {
        if self.index.contains_key(&cell) {
            return None;
        }
        let slot = self.cards.len();
        let id = slot as u32;
        let content_index = slot % self.config.content.len();
        let size = self.size_for(content_index, Orientation::for_cell(cell));
        self.cards
            .push(Card::new(id, cell, self.config.spacing, content_index, size));
        self.index.insert(cell, slot);
        Some(slot)
    }

    fn size_for(&self, content_index: usize, orientation: Orientation) -> Vec2 {
        match self.content_aspect.get(&content_index) {
            Some(&aspect) => Vec2::new(CARD_TARGET_HEIGHT * aspect, CARD_TARGET_HEIGHT),
            None => orientation.default_size(),
        }
    }

    // ---------------- Reveal / hide ----------------

    pub fn show_initial_cards(&mut self, delay_ms: f64) {
        self.stagger(delay_ms, CardAction::Show);
    }

    pub fn hide_all_cards(&mut self, delay_ms: f64) {
        self.stagger(delay_ms, CardAction::Hide);
    }

    /// Card `i` in materialization order starts at `delay + i * (budget / n)`.
    fn stagger(&mut self, delay_ms: f64, action: CardAction) {
        let n = self.cards.len();
        if n == 0 {
            return;
        }
        let step = self.config.stagger_total_ms / n as f64;
        let now = self.clock.now_ms();
        for (i, card) in self.cards.iter().enumerate() {
            self.timeline
                .schedule(now + delay_ms + i as f64 * step, card.cell, action);
        }
        log::info!("[grid] {:?} {} cards, step={:.1}ms", action, n, step);
    }

    /// Release every pending timer and running animation. Cards keep the
    /// values they had reached.
    pub fn cancel_animations(&mut self) {
        self.timeline.clear();
        for card in self.cards.iter_mut() {
            card.cancel_animations();
        }
        self.camera_z_tween.cancel();
        self.distortion_tween.cancel();
    }

    // ---------------- Content ----------------

    /// Record the real aspect ratio (width / height) of one content entry and
    /// resize every card bound to it.
    pub fn set_content_aspect(&mut self, content_index: usize, aspect: f32) {
        if !aspect.is_finite() || aspect <= 0.0 {
            log::warn!("[grid] ignoring aspect {} for content {}", aspect, content_index);
            return;
        }
        self.content_aspect.insert(content_index, aspect);
        let size = Vec2::new(CARD_TARGET_HEIGHT * aspect, CARD_TARGET_HEIGHT);
        for card in self
            .cards
            .iter_mut()
            .filter(|c| c.content_index == content_index)
        {
            card.size = size;
        }
    }

    pub fn content_for(&self, card: &Card) -> &str {
        &self.config.content[card.content_index]
    }

    // ---------------- Accessors ----------------

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_at(&self, cell: CellCoord) -> Option<&Card> {
        self.index.get(&cell).map(|&slot| &self.cards[slot])
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn scheduled(&self) -> impl Iterator<Item = &Scheduled> {
        self.timeline.iter()
    }

    pub fn pending_timers(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_animating(&self) -> bool {
        !self.timeline.is_empty()
            || self.camera_z_tween.is_running()
            || self.distortion_tween.is_running()
            || self.cards.iter().any(Card::is_animating)
    }

    /// Rendered world translation: scroll offset plus parallax.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn position_offset(&self) -> Vec2 {
        self.position_offset
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn cursor_uv(&self) -> Vec2 {
        self.cursor_uv
    }

    pub fn distortion_intensity(&self) -> f32 {
        self.distortion_intensity
    }

    pub fn distortion_target(&self) -> Option<f32> {
        self.distortion_tween.target()
    }

    pub fn camera(&self) -> &CameraHandle {
        &self.camera
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
