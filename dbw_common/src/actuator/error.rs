//! Error types for the actuator control core.
//!
//! Latched faults are a `bitflags` set, as in the rest of the workspace.
//! Operation errors use `thiserror`. Sensor read errors are never fatal to
//! the process: they disable control and are reported for the cycle.

use bitflags::bitflags;
use thiserror::Error;

use crate::hal::driver::HalError;

bitflags! {
    /// Latched fault flags that block enabling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaultFlags: u8 {
        /// Manual pedal action detected.
        const OPERATOR_OVERRIDE    = 0x01;
        /// Consecutive invalid sensor reads reached the threshold.
        const INVALID_SENSOR_VALUE = 0x02;
    }
}

impl Default for FaultFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for FaultFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors returned by control core operations.
#[derive(Debug, Clone, Error)]
pub enum ControlError {
    /// The sensor read capability failed, now or on the last attempt.
    /// Control is disabled and stays so until a read succeeds.
    #[error("sensor unavailable: {source}")]
    SensorUnavailable {
        /// Driver-level failure.
        source: HalError,
    },

    /// Enable request refused because faults are latched.
    #[error("enable rejected: {reasons} latched")]
    EnableRejected {
        /// Flags that blocked the request.
        reasons: FaultFlags,
    },

    /// Some requested flags could not be cleared because their condition persists.
    #[error("fault clear rejected: {remaining} still active")]
    FaultClearRejected {
        /// Flags still set after the request.
        remaining: FaultFlags,
    },
}
