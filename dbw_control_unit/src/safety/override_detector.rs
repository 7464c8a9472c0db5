//! Operator override detection.
//!
//! The raw pedal position is the mean of the two redundant channels. It is
//! smoothed with an exponential filter and compared against the profile
//! threshold; strictly above means the operator is pressing the pedal.

use dbw_common::actuator::profile::OverrideDetection;
use dbw_common::actuator::signal::SensorReading;

use crate::control::filters::ExponentialFilter;

/// Result of one override check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideCheck {
    /// Filtered pedal position [ADC counts].
    pub smoothed: f32,
    /// `smoothed > threshold`.
    pub overridden: bool,
}

/// Smoothed-threshold override detector.
#[derive(Debug, Clone)]
pub struct OverrideDetector {
    filter: ExponentialFilter,
    threshold: f32,
}

impl OverrideDetector {
    /// Create a detector with an unseeded filter.
    pub const fn new(params: OverrideDetection) -> Self {
        Self {
            filter: ExponentialFilter::new(params.alpha),
            threshold: params.threshold,
        }
    }

    /// Override threshold [ADC counts].
    #[inline]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Current filtered position, `None` before the first sample.
    #[inline]
    pub const fn smoothed(&self) -> Option<f32> {
        self.filter.value()
    }

    /// Pedal is at or below the threshold. True before the first sample.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.smoothed().is_none_or(|v| v <= self.threshold)
    }

    /// Feed one reading.
    pub fn check(&mut self, reading: &SensorReading) -> OverrideCheck {
        let smoothed = self.filter.update(reading.average());
        OverrideCheck {
            smoothed,
            overridden: smoothed > self.threshold,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
