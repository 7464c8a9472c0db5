//! HAL driver implementations.
//!
//! - [`simulation`] - Software pedal sensor and output stage for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `ActuatorDriver` trait from `dbw_common::hal::driver`
//! 3. Add export and documentation

pub mod simulation;
