//! # DBW HAL Library
//!
//! Hardware side of an actuator module, behind the `ActuatorDriver` and
//! `ReportSink` traits defined in `dbw_common::hal`.
//!
//! # Module Structure
//!
//! - [`drivers`] - Driver implementations (simulation)
//! - [`report`] - Report sinks: tracing log, JSON lines, in-memory recorder
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      dbw_control_unit                        │
//! │   ActuatorController ──► ActuatorDriver ──► SimulationDriver │
//! │          │                                   (pedal model,   │
//! │          ▼                                    relay, DAC)    │
//! │     ReportSink ──► TracingReportSink / JsonLinesSink         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod drivers;
pub mod report;

// Re-export key types for convenience
pub use crate::drivers::simulation::{
    PedalModel, ScenarioAction, ScenarioScript, ScenarioStep, SensorFault, SimulationDriver,
};
pub use crate::report::{FanOutSink, JsonLinesSink, RecordingSink, TracingReportSink};
