use crate::constants::*;
use glam::Vec2;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("cell spacing must be finite and positive, got {0}")]
    InvalidSpacing(f32),
    #[error("initial block needs at least one column and one row, got {cols}x{rows}")]
    EmptyInitialBlock { cols: i32, rows: i32 },
    #[error("view margins must be finite and non-negative, got ({x}, {y})")]
    InvalidMargin { x: f32, y: f32 },
    #[error("stagger budget must be finite and non-negative, got {0}")]
    InvalidStagger(f64),
    #[error("content pool is empty")]
    EmptyContentPool,
}

/// Layout and timing knobs for a [`crate::SpatialCardGrid`].
#[derive(Clone, Debug)]
pub struct GridConfig {
    pub spacing: f32,
    pub cols: i32,
    pub rows: i32,
    pub view_margin: Vec2,
    pub stagger_total_ms: f64,
    pub expand_reveal_delay_ms: f64,
    /// Cyclically indexed by card creation order.
    pub content: Vec<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: CARD_SPACING,
            cols: INITIAL_COLS,
            rows: INITIAL_ROWS,
            view_margin: Vec2::new(VIEW_MARGIN_X, VIEW_MARGIN_Y),
            stagger_total_ms: STAGGER_TOTAL_MS,
            expand_reveal_delay_ms: EXPAND_REVEAL_DELAY_MS,
            content: DEFAULT_CONTENT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(GridError::InvalidSpacing(self.spacing));
        }
        if self.cols < 1 || self.rows < 1 {
            return Err(GridError::EmptyInitialBlock {
                cols: self.cols,
                rows: self.rows,
            });
        }
        let m = self.view_margin;
        if !m.is_finite() || m.x < 0.0 || m.y < 0.0 {
            return Err(GridError::InvalidMargin { x: m.x, y: m.y });
        }
        if !self.stagger_total_ms.is_finite() || self.stagger_total_ms < 0.0 {
            return Err(GridError::InvalidStagger(self.stagger_total_ms));
        }
        if self.content.is_empty() {
            return Err(GridError::EmptyContentPool);
        }
        Ok(())
    }
}
