//! Status reporting contract.
//!
//! The control core pushes a `ControlReport` snapshot into a `ReportSink`
//! on the report-publish period, and forwards per-cycle faults (hardware
//! read failures) through the same sink.

use serde::{Deserialize, Serialize};

use crate::actuator::error::ControlError;
use crate::actuator::profile::ActuatorKind;
use crate::actuator::signal::ActuatorSignal;
use crate::actuator::state::{ControlMode, ControlState};

/// Serializable snapshot of one actuator module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlReport {
    /// Module kind.
    pub kind: ActuatorKind,
    /// Current mode.
    pub mode: ControlMode,
    /// Consecutive invalid sensor reads.
    pub fault_count: u8,
    /// Filtered pedal position, `None` before the first read [ADC counts].
    pub smoothed_position: Option<f32>,
    /// Full control state.
    pub state: ControlState,
    /// Last signal written to the output stage.
    pub signal: ActuatorSignal,
}

/// Sink for status reports and per-cycle faults.
pub trait ReportSink {
    /// Publish the current module state.
    fn report_state(&mut self, report: &ControlReport);

    /// Publish a fault that ended the current cycle.
    fn report_fault(&mut self, kind: ActuatorKind, error: &ControlError);
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn report_state(&mut self, report: &ControlReport) {
        (**self).report_state(report)
    }

    fn report_fault(&mut self, kind: ActuatorKind, error: &ControlError) {
        (**self).report_fault(kind, error)
    }
}
