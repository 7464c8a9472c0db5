//! Sensor smoothing filter.
//!
//! First-order exponential moving average used by the override detector:
//!
//! ```text
//! y[0] = x[0]
//! y[n] = alpha × x[n] + (1 − alpha) × y[n-1]
//! ```
//!
//! The first sample seeds the filter so a pedal that is already pressed at
//! start-up is seen at full value on the first check.

/// Exponential moving average state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialFilter {
    alpha: f32,
    value: Option<f32>,
}

impl ExponentialFilter {
    /// Create an unseeded filter. `alpha` is expected in (0, 1].
    pub const fn new(alpha: f32) -> Self {
        Self { alpha, value: None }
    }

    /// Current output, `None` before the first sample.
    #[inline]
    pub const fn value(&self) -> Option<f32> {
        self.value
    }

    /// Feed one sample and return the new output.
    #[inline]
    pub fn update(&mut self, input: f32) -> f32 {
        let output = match self.value {
            Some(prev) => self.alpha * input + (1.0 - self.alpha) * prev,
            None => input,
        };
        self.value = Some(output);
        output
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds() {
        let mut f = ExponentialFilter::new(0.25);
        assert_eq!(f.value(), None);
        assert_eq!(f.update(400.0), 400.0);
        assert_eq!(f.value(), Some(400.0));
    }

    #[test]
    fn step_response_converges() {
        let mut f = ExponentialFilter::new(0.25);
        f.update(0.0);
        assert_eq!(f.update(1000.0), 250.0);
        assert_eq!(f.update(1000.0), 437.5);
        for _ in 0..100 {
            f.update(1000.0);
        }
        assert!((f.value().unwrap() - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn unity_alpha_passes_through() {
        let mut f = ExponentialFilter::new(1.0);
        f.update(10.0);
        assert_eq!(f.update(900.0), 900.0);
    }
}
