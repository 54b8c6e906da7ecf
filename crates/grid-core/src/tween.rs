//! Time-based scalar interpolation.
//!
//! A [`Tween`] is a pure description `{from, to, start, duration, ease}`;
//! a [`TweenSlot`] is the animated property that owns at most one running
//! tween. Starting a new tween on a slot replaces the old one, starting
//! from wherever the property currently is.

/// Easing curves, named after the GSAP curves the grid motion is tuned for.
/// `Power2*` are cubic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    Power2In,
    Power2Out,
    Power2InOut,
}

impl Ease {
    /// Map linear progress in \[0, 1\] to eased progress in \[0, 1\].
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2In => t * t * t,
            Ease::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn sample(&self, now_ms: f64) -> f32 {
        let k = self.ease.apply(self.progress(now_ms));
        self.from + (self.to - self.from) * k
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

/// One animated property.
#[derive(Clone, Debug, Default)]
pub struct TweenSlot {
    active: Option<Tween>,
}

impl TweenSlot {
    /// Cancel-and-replace: the new tween starts from `current`.
    pub fn retarget(&mut self, current: f32, to: f32, duration_ms: f64, ease: Ease, now_ms: f64) {
        self.active = Some(Tween {
            from: current,
            to,
            start_ms: now_ms,
            duration_ms,
            ease,
        });
    }

    /// Sampled value while running. The final value is yielded exactly once,
    /// after which the slot is idle and returns `None`.
    pub fn advance(&mut self, now_ms: f64) -> Option<f32> {
        let tween = self.active?;
        let value = tween.sample(now_ms);
        if tween.is_finished(now_ms) {
            self.active = None;
        }
        Some(value)
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn target(&self) -> Option<f32> {
        self.active.map(|t| t.to)
    }
}
