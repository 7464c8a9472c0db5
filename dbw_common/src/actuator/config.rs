//! Actuator module configuration.
//!
//! Loaded from TOML through [`ConfigLoader`](crate::config::ConfigLoader):
//!
//! ```toml
//! [shared]
//! service_name = "throttle-01"
//! log_level = "info"
//!
//! [module]
//! kind = "throttle"
//! latch_policy = "latched"
//!
//! [module.periods]
//! override_check_ms = 50
//! sensor_check_ms = 250
//! output_update_ms = 20
//! report_publish_ms = 100
//!
//! [module.override_detection]
//! threshold = 750.0
//! alpha = 0.25
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::profile::{ActuatorKind, ActuatorProfile, LatchPolicy, OverrideDetection};
use crate::config::{ConfigError, SharedConfig};
use crate::consts::{
    OUTPUT_UPDATE_INTERVAL_MS, OVERRIDE_CHECK_INTERVAL_MS, REPORT_PUBLISH_INTERVAL_MS,
    SENSOR_VALIDITY_CHECK_INTERVAL_MS,
};

/// Task periods in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPeriods {
    /// Operator override check.
    pub override_check_ms: u32,
    /// Sensor validity check.
    pub sensor_check_ms: u32,
    /// Spoof output refresh.
    pub output_update_ms: u32,
    /// Status report publish.
    pub report_publish_ms: u32,
}

impl Default for TaskPeriods {
    fn default() -> Self {
        Self {
            override_check_ms: OVERRIDE_CHECK_INTERVAL_MS,
            sensor_check_ms: SENSOR_VALIDITY_CHECK_INTERVAL_MS,
            output_update_ms: OUTPUT_UPDATE_INTERVAL_MS,
            report_publish_ms: REPORT_PUBLISH_INTERVAL_MS,
        }
    }
}

impl TaskPeriods {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("override_check_ms", self.override_check_ms),
            ("sensor_check_ms", self.sensor_check_ms),
            ("output_update_ms", self.output_update_ms),
            ("report_publish_ms", self.report_publish_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        Ok(())
    }
}

/// `[module]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleSection {
    /// Which built-in profile to start from.
    #[serde(default)]
    pub kind: ActuatorKind,
    /// Fault flag clearing policy.
    #[serde(default)]
    pub latch_policy: LatchPolicy,
    /// Scheduler periods.
    #[serde(default)]
    pub periods: TaskPeriods,
    /// Replaces the profile's override detection parameters when present.
    #[serde(default)]
    pub override_detection: Option<OverrideDetection>,
}

/// Top-level configuration of one actuator module process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Common fields.
    pub shared: SharedConfig,
    /// Module parameters.
    #[serde(default)]
    pub module: ModuleSection,
}

impl ModuleConfig {
    /// Resolve the effective profile: built-in for the kind, then overrides.
    pub fn profile(&self) -> ActuatorProfile {
        let mut profile = ActuatorProfile::for_kind(self.module.kind);
        profile.latch_policy = self.module.latch_policy;
        if let Some(od) = self.module.override_detection {
            debug!(
                kind = %self.module.kind,
                threshold = od.threshold,
                alpha = od.alpha,
                "Override detection parameters overridden"
            );
            profile.override_detection = od;
        }
        profile
    }

    /// Validate shared fields, periods and the resolved profile.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.module.periods.validate()?;
        self.profile()
            .validate()
            .map_err(ConfigError::ValidationError)
    }
}
