//! Per-actuator profiles.
//!
//! A profile bundles everything that differs between the throttle and the
//! brake module: spoof calibration, sensor operating window, override
//! threshold and filter alpha. The control pipeline itself is identical.

use serde::{Deserialize, Serialize};

use super::calibration::{SignalRange, SpoofCalibration};
use super::signal::SensorReading;
use crate::consts::{
    ACCELERATOR_OVERRIDE_THRESHOLD, ACCELERATOR_SENSOR_HIGH_RANGE, ACCELERATOR_SENSOR_LOW_RANGE,
    ACCELERATOR_SENSOR_REDUNDANCY_TOLERANCE, BRAKE_PEDAL_OVERRIDE_THRESHOLD,
    BRAKE_PEDAL_SENSOR_HIGH_RANGE, BRAKE_PEDAL_SENSOR_LOW_RANGE,
    BRAKE_PEDAL_SENSOR_REDUNDANCY_TOLERANCE, SENSOR_EXPONENTIAL_FILTER_ALPHA,
    SENSOR_VALIDITY_CHECK_FAULT_COUNT,
};

/// Which pedal a module controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorKind {
    /// Accelerator pedal position spoofing.
    #[default]
    Throttle,
    /// Brake pedal position spoofing.
    Brake,
}

impl ActuatorKind {
    /// Lowercase name used in logs and reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Throttle => "throttle",
            Self::Brake => "brake",
        }
    }
}

impl std::fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How latched fault flags are cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatchPolicy {
    /// Flags stay set until an explicit fault-clear request succeeds.
    #[default]
    Latched,
    /// Flags follow the condition: a valid read or a released pedal clears them.
    /// Control is still never re-enabled without an explicit enable request.
    AutoClear,
}

/// Operating window and redundancy relation of the pedal sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorValidityWindow {
    /// Valid low channel values [ADC counts].
    pub low: SignalRange,
    /// Valid high channel values [ADC counts].
    pub high: SignalRange,
    /// Maximum `|low - high / 2|` [ADC counts].
    pub redundancy_tolerance: u16,
}

impl SensorValidityWindow {
    /// Both channels in range, no grounded pin, and the channels agree.
    pub fn accepts(&self, reading: &SensorReading) -> bool {
        if reading.has_grounded_channel() {
            return false;
        }
        if !self.low.contains(reading.low) || !self.high.contains(reading.high) {
            return false;
        }
        let disagreement = (reading.low as i32 - (reading.high as i32) / 2).unsigned_abs();
        disagreement <= self.redundancy_tolerance as u32
    }
}

/// Override detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverrideDetection {
    /// Smoothed position above which the operator is considered in control [ADC counts].
    pub threshold: f32,
    /// Exponential filter alpha, in (0, 1].
    #[serde(default = "default_alpha")]
    pub alpha: f32,
}

fn default_alpha() -> f32 {
    SENSOR_EXPONENTIAL_FILTER_ALPHA
}

/// Everything kind-specific the control pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorProfile {
    /// Actuator kind.
    pub kind: ActuatorKind,
    /// Spoof output calibration.
    pub calibration: SpoofCalibration,
    /// Sensor validity window.
    pub sensor: SensorValidityWindow,
    /// Override detection parameters.
    pub override_detection: OverrideDetection,
    /// Consecutive invalid reads before the sensor fault latches.
    pub fault_count_threshold: u8,
    /// Latch clearing policy.
    pub latch_policy: LatchPolicy,
}

impl ActuatorProfile {
    /// Accelerator pedal profile.
    pub const fn throttle() -> Self {
        Self {
            kind: ActuatorKind::Throttle,
            calibration: SpoofCalibration::throttle(),
            sensor: SensorValidityWindow {
                low: SignalRange::new(ACCELERATOR_SENSOR_LOW_RANGE.0, ACCELERATOR_SENSOR_LOW_RANGE.1),
                high: SignalRange::new(
                    ACCELERATOR_SENSOR_HIGH_RANGE.0,
                    ACCELERATOR_SENSOR_HIGH_RANGE.1,
                ),
                redundancy_tolerance: ACCELERATOR_SENSOR_REDUNDANCY_TOLERANCE,
            },
            override_detection: OverrideDetection {
                threshold: ACCELERATOR_OVERRIDE_THRESHOLD,
                alpha: SENSOR_EXPONENTIAL_FILTER_ALPHA,
            },
            fault_count_threshold: SENSOR_VALIDITY_CHECK_FAULT_COUNT,
            latch_policy: LatchPolicy::Latched,
        }
    }

    /// Brake pedal profile.
    pub const fn brake() -> Self {
        Self {
            kind: ActuatorKind::Brake,
            calibration: SpoofCalibration::brake(),
            sensor: SensorValidityWindow {
                low: SignalRange::new(BRAKE_PEDAL_SENSOR_LOW_RANGE.0, BRAKE_PEDAL_SENSOR_LOW_RANGE.1),
                high: SignalRange::new(
                    BRAKE_PEDAL_SENSOR_HIGH_RANGE.0,
                    BRAKE_PEDAL_SENSOR_HIGH_RANGE.1,
                ),
                redundancy_tolerance: BRAKE_PEDAL_SENSOR_REDUNDANCY_TOLERANCE,
            },
            override_detection: OverrideDetection {
                threshold: BRAKE_PEDAL_OVERRIDE_THRESHOLD,
                alpha: SENSOR_EXPONENTIAL_FILTER_ALPHA,
            },
            fault_count_threshold: SENSOR_VALIDITY_CHECK_FAULT_COUNT,
            latch_policy: LatchPolicy::Latched,
        }
    }

    /// Built-in profile for `kind`.
    pub const fn for_kind(kind: ActuatorKind) -> Self {
        match kind {
            ActuatorKind::Throttle => Self::throttle(),
            ActuatorKind::Brake => Self::brake(),
        }
    }

    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        self.calibration.validate()?;
        for (name, range) in [("low", &self.sensor.low), ("high", &self.sensor.high)] {
            if !range.is_well_formed() {
                return Err(format!(
                    "{name} sensor window [{}, {}] is not well formed",
                    range.min, range.max
                ));
            }
            if range.min == 0 {
                return Err(format!(
                    "{name} sensor window must exclude 0 (grounded pin)"
                ));
            }
        }
        let od = &self.override_detection;
        if !(od.threshold.is_finite() && od.threshold > 0.0) {
            return Err(format!("override threshold {} must be positive", od.threshold));
        }
        if !(od.alpha > 0.0 && od.alpha <= 1.0) {
            return Err(format!("filter alpha {} out of range (0, 1]", od.alpha));
        }
        if self.fault_count_threshold == 0 {
            return Err("fault_count_threshold must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for ActuatorProfile {
    fn default() -> Self {
        Self::throttle()
    }
}
