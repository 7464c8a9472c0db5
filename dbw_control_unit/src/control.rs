//! Signal path root.
//!
//! Pure command-to-spoof conversion and the sensor smoothing filter.

pub mod conditioner;
pub mod filters;
