//! Consumer side of the drag distortion.
//!
//! The grid streams a raw intensity; the lens pass does not jump to it but
//! eases its own value toward the latest target, then widens the X term by
//! the viewport aspect so the lens stays circular.

use crate::constants::LENS_EASE_MS;
use crate::tween::{Ease, TweenSlot};

#[derive(Clone, Debug, Default)]
pub struct LensDistortion {
    target: f32,
    intensity: f32,
    tween: TweenSlot,
}

impl LensDistortion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, value: f32, now_ms: f64) {
        if value == self.target && self.tween.is_running() {
            return;
        }
        self.target = value;
        self.tween
            .retarget(self.intensity, value, LENS_EASE_MS, Ease::Power2Out, now_ms);
    }

    pub fn advance(&mut self, now_ms: f64) -> f32 {
        if let Some(v) = self.tween.advance(now_ms) {
            self.intensity = v;
        }
        self.intensity
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Uniform value for the lens shader.
    pub fn uniform(&self, aspect: f32) -> [f32; 2] {
        [self.intensity * aspect, self.intensity]
    }
}
