//! Click-free parameter smoothing

use crate::features::crossfade::curves::clamp;

/// Rate-limited follower for gains, cutoffs and per-note bends
///
/// Each call moves the held value toward the target by at most
/// `max_delta_per_sample`, so a parameter jump is spread over several samples
/// instead of producing a step in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlewLimiter {
    value: f32,
    /// Largest change applied per call
    pub max_delta_per_sample: f32,
}

impl Default for SlewLimiter {
    fn default() -> Self {
        Self::new(0.0, 1e-3)
    }
}

impl SlewLimiter {
    /// Create a limiter holding `initial`
    pub fn new(initial: f32, max_delta_per_sample: f32) -> Self {
        Self {
            value: initial,
            max_delta_per_sample,
        }
    }

    /// Current smoothed value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Step toward `target` and return the new smoothed value
    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        let step = clamp(
            target - self.value,
            -self.max_delta_per_sample,
            self.max_delta_per_sample,
        );
        self.value += step;
        self.value
    }
}
