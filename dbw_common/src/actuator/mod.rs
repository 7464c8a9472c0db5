//! Actuator module shared types.
//!
//! Control state, sensor and spoof signal types, calibration curves,
//! per-kind profiles, error types and module configuration.

pub mod calibration;
pub mod config;
pub mod error;
pub mod profile;
pub mod signal;
pub mod state;
