//! # DBW Control Unit Library
//!
//! Control core of one drive-by-wire actuator module (throttle or brake).
//! Reads the operator's redundant pedal sensor, decides whether the operator
//! or the automated controller has authority, and drives the spoofed pedal
//! signal accordingly while validating the sensor and disengaging on any
//! fault.
//!
//! ## Pipeline
//!
//! ```text
//! Scheduler ─► SensorValidator ─┐
//!           └► OverrideDetector ┴► ControlStateMachine ─► SignalConditioner ─► ActuatorDriver
//! ```
//!
//! ## Module Structure
//!
//! - [`control`] - Signal conditioner and smoothing filter (pure)
//! - [`safety`] - Sensor validator and override detector
//! - [`state`] - Enabled/disabled state machine
//! - [`controller`] - Per-module facade owning the driver
//! - [`cycle`] - Periodic scheduler, module tick, host loop, RT setup
//!
//! ## Fail-safe
//!
//! Every fault path ends disabled. Nothing enables without an explicit
//! enable request, and enable is refused while any fault flag is latched.

pub mod control;
pub mod controller;
pub mod cycle;
pub mod safety;
pub mod state;
