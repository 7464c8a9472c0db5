//! Spoof calibration curves and safety ranges.
//!
//! A curve maps the widened (12-bit) command to volts; the range bounds the
//! resulting DAC step count. Both are configuration-time constants.

use serde::{Deserialize, Serialize};

use crate::consts::{
    ADC_MAX, BRAKE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_OFFSET,
    BRAKE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_SCALE, BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MAX,
    BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MIN, BRAKE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_OFFSET,
    BRAKE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_SCALE, BRAKE_SPOOF_LOW_SIGNAL_RANGE_MAX,
    BRAKE_SPOOF_LOW_SIGNAL_RANGE_MIN, STEPS_PER_VOLT,
    THROTTLE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_OFFSET,
    THROTTLE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_SCALE, THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MAX,
    THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MIN, THROTTLE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_OFFSET,
    THROTTLE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_SCALE, THROTTLE_SPOOF_LOW_SIGNAL_RANGE_MAX,
    THROTTLE_SPOOF_LOW_SIGNAL_RANGE_MIN,
};

/// Linear `volts = x * scale + offset` curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCurve {
    /// Volts per widened command step.
    pub scale: f32,
    /// Volts at command zero.
    pub offset: f32,
}

impl CalibrationCurve {
    /// Evaluate the curve [V].
    #[inline]
    pub fn volts(&self, widened_command: u16) -> f32 {
        widened_command as f32 * self.scale + self.offset
    }
}

/// Inclusive range of a spoof channel [DAC steps].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRange {
    /// Lowest allowed value.
    pub min: u16,
    /// Highest allowed value.
    pub max: u16,
}

impl SignalRange {
    /// Create a range.
    #[inline]
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the range.
    #[inline]
    pub const fn contains(&self, value: u16) -> bool {
        value >= self.min && value <= self.max
    }

    /// Non-empty and addressable by the 12-bit DAC.
    #[inline]
    pub const fn is_well_formed(&self) -> bool {
        self.min < self.max && self.max <= ADC_MAX
    }
}

/// Curve and safety range for one spoof channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpoofChannel {
    /// Command → volts mapping.
    pub curve: CalibrationCurve,
    /// Allowed DAC output.
    pub range: SignalRange,
}

/// Full spoof calibration for one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpoofCalibration {
    /// Low spoof channel.
    pub low: SpoofChannel,
    /// High spoof channel.
    pub high: SpoofChannel,
    /// DAC steps per volt.
    #[serde(default = "default_steps_per_volt")]
    pub steps_per_volt: f32,
}

fn default_steps_per_volt() -> f32 {
    STEPS_PER_VOLT
}

impl SpoofCalibration {
    /// Accelerator pedal spoof calibration.
    pub const fn throttle() -> Self {
        Self {
            low: SpoofChannel {
                curve: CalibrationCurve {
                    scale: THROTTLE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_SCALE,
                    offset: THROTTLE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_OFFSET,
                },
                range: SignalRange::new(
                    THROTTLE_SPOOF_LOW_SIGNAL_RANGE_MIN,
                    THROTTLE_SPOOF_LOW_SIGNAL_RANGE_MAX,
                ),
            },
            high: SpoofChannel {
                curve: CalibrationCurve {
                    scale: THROTTLE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_SCALE,
                    offset: THROTTLE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_OFFSET,
                },
                range: SignalRange::new(
                    THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MIN,
                    THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MAX,
                ),
            },
            steps_per_volt: STEPS_PER_VOLT,
        }
    }

    /// Brake pedal spoof calibration.
    pub const fn brake() -> Self {
        Self {
            low: SpoofChannel {
                curve: CalibrationCurve {
                    scale: BRAKE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_SCALE,
                    offset: BRAKE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_OFFSET,
                },
                range: SignalRange::new(
                    BRAKE_SPOOF_LOW_SIGNAL_RANGE_MIN,
                    BRAKE_SPOOF_LOW_SIGNAL_RANGE_MAX,
                ),
            },
            high: SpoofChannel {
                curve: CalibrationCurve {
                    scale: BRAKE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_SCALE,
                    offset: BRAKE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_OFFSET,
                },
                range: SignalRange::new(
                    BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MIN,
                    BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MAX,
                ),
            },
            steps_per_volt: STEPS_PER_VOLT,
        }
    }

    /// Validate both channel ranges and the step factor.
    pub fn validate(&self) -> Result<(), String> {
        for (name, ch) in [("low", &self.low), ("high", &self.high)] {
            if !ch.range.is_well_formed() {
                return Err(format!(
                    "{name} spoof range [{}, {}] must satisfy min < max <= {ADC_MAX}",
                    ch.range.min, ch.range.max
                ));
            }
            if !ch.curve.scale.is_finite() || !ch.curve.offset.is_finite() {
                return Err(format!("{name} calibration curve must be finite"));
            }
        }
        if !(self.steps_per_volt.is_finite() && self.steps_per_volt > 0.0) {
            return Err(format!(
                "steps_per_volt {} must be positive",
                self.steps_per_volt
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_evaluates_linearly() {
        let c = CalibrationCurve {
            scale: 0.00002,
            offset: 0.40,
        };
        assert!((c.volts(2048) - 0.44096).abs() < 1e-6);
        assert!((c.volts(0) - 0.40).abs() < 1e-6);
    }

    #[test]
    fn range_contains_is_inclusive() {
        let r = SignalRange::new(328, 1638);
        assert!(r.contains(328));
        assert!(r.contains(1638));
        assert!(!r.contains(327));
        assert!(!r.contains(1639));
    }

    #[test]
    fn builtin_calibrations_validate() {
        assert!(SpoofCalibration::throttle().validate().is_ok());
        assert!(SpoofCalibration::brake().validate().is_ok());
    }

    #[test]
    fn inverted_range_rejected() {
        let mut cal = SpoofCalibration::throttle();
        cal.high.range = SignalRange::new(3358, 656);
        let err = cal.validate().unwrap_err();
        assert!(err.contains("high"));
    }

    #[test]
    fn range_beyond_dac_rejected() {
        let mut cal = SpoofCalibration::brake();
        cal.low.range = SignalRange::new(10, 5000);
        assert!(cal.validate().is_err());
    }
}
