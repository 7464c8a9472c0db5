//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use dbw_common::prelude::*;` and get
//! the most important types without listing individual paths.
//!
//! # Usage
//!
//! ```rust
//! use dbw_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::actuator::config::{ModuleConfig, TaskPeriods};
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{BIT_SHIFT_10BIT_TO_12BIT, COMMAND_MAX, STEPS_PER_VOLT};

// ─── Actuator ───────────────────────────────────────────────────────
pub use crate::actuator::calibration::{SignalRange, SpoofCalibration};
pub use crate::actuator::error::{ControlError, FaultFlags};
pub use crate::actuator::profile::{ActuatorKind, ActuatorProfile, LatchPolicy};
pub use crate::actuator::signal::{ActuatorSignal, SensorReading, SpoofSignal};
pub use crate::actuator::state::{ControlMode, ControlState};

// ─── HAL ────────────────────────────────────────────────────────────
pub use crate::hal::driver::{ActuatorDriver, HalError};
pub use crate::hal::report::{ControlReport, ReportSink};
