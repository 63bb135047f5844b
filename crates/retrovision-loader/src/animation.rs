//! Easing curves and a millisecond tween for render-side smoothing.
//!
//! The sequence itself only ever holds table values; these helpers let a
//! renderer glide between them (camera zoom, main-UI fade-in).

/// Easing functions. Input is clamped to `[0.0, 1.0]`.
pub mod easing {
    /// Linear easing (no acceleration).
    pub fn linear(t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }

    /// Quadratic ease-out (slow end).
    pub fn ease_out_quad(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        t * (2.0 - t)
    }

    /// Quadratic ease-in-out (slow start and end).
    pub fn ease_in_out_quad(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            2.0 * t * t
        } else {
            -1.0 + (4.0 - 2.0 * t) * t
        }
    }

    /// Cubic ease-out (slow end). Close to the CSS `ease-out` keyword.
    pub fn ease_out_cubic(t: f32) -> f32 {
        let t1 = t.clamp(0.0, 1.0) - 1.0;
        t1 * t1 * t1 + 1.0
    }
}

/// Interpolates from `from` to `to` over `duration_ms`.
#[derive(Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: u32,
    elapsed_ms: u32,
    easing: fn(f32) -> f32,
}

impl Tween {
    /// Start a tween at `from`.
    pub fn new(from: f32, to: f32, duration_ms: u32, easing: fn(f32) -> f32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0,
            easing,
        }
    }

    /// A tween already resting at `value`.
    pub fn settled(value: f32, duration_ms: u32, easing: fn(f32) -> f32) -> Self {
        Self {
            elapsed_ms: duration_ms,
            ..Self::new(value, value, duration_ms, easing)
        }
    }

    /// Advance by `dt_ms` and return the new value.
    pub fn tick(&mut self, dt_ms: u32) -> f32 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        self.value()
    }

    /// Current eased value.
    pub fn value(&self) -> f32 {
        let t = if self.duration_ms > 0 {
            self.elapsed_ms as f32 / self.duration_ms as f32
        } else {
            1.0
        };
        self.from + (self.to - self.from) * (self.easing)(t)
    }

    /// Restart towards a new target from the current value. Retargeting to
    /// the current target is a no-op.
    pub fn retarget(&mut self, to: f32) {
        if to == self.to {
            return;
        }
        self.from = self.value();
        self.to = to;
        self.elapsed_ms = 0;
    }

    /// Value the tween is heading towards.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Whether the full duration has elapsed.
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("duration_ms", &self.duration_ms)
            .finish()
    }
}
