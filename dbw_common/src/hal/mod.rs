//! Hardware-facing contracts.
//!
//! - [`driver`] - `ActuatorDriver` trait and `HalError`
//! - [`report`] - `ReportSink` trait and `ControlReport` snapshot

pub mod driver;
pub mod report;
