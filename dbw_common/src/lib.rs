//! DBW Common Library
//!
//! Shared data model, calibration constants and configuration loading for
//! all drive-by-wire workspace crates.
//!
//! # Module Structure
//!
//! - [`actuator`] - Control state, sensor/spoof signal types, calibration, profiles, errors
//! - [`hal`] - Hardware driver and report sink contracts
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Calibration and timing constants per actuator kind
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use dbw_common::prelude::*;
//!
//! let profile = ActuatorProfile::for_kind(ActuatorKind::Throttle);
//! assert_eq!(profile.kind, ActuatorKind::Throttle);
//! ```

pub mod actuator;
pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
