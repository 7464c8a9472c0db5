//! Report sinks.
//!
//! - [`TracingReportSink`] - structured log lines; mode changes at INFO
//! - [`JsonLinesSink`] - one JSON object per line on any `io::Write`
//! - [`RecordingSink`] - in-memory, for tests
//! - [`FanOutSink`] - forwards to two sinks

use std::io::Write;

use dbw_common::actuator::error::ControlError;
use dbw_common::actuator::profile::ActuatorKind;
use dbw_common::actuator::state::ControlMode;
use dbw_common::hal::report::{ControlReport, ReportSink};
use serde::Serialize;
use tracing::{debug, error, info, warn};

// ─── Tracing ────────────────────────────────────────────────────────

/// Logs reports through `tracing`.
#[derive(Debug, Default)]
pub struct TracingReportSink {
    last_mode: Option<ControlMode>,
}

impl TracingReportSink {
    /// New sink with no previous report.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for TracingReportSink {
    fn report_state(&mut self, report: &ControlReport) {
        let state = &report.state;
        if self.last_mode != Some(report.mode) {
            info!(
                kind = %report.kind,
                mode = ?report.mode,
                faults = %state.faults(),
                commanded = state.commanded_position(),
                "Module mode"
            );
            self.last_mode = Some(report.mode);
        } else {
            debug!(
                kind = %report.kind,
                mode = ?report.mode,
                faults = %state.faults(),
                fault_count = report.fault_count,
                smoothed = ?report.smoothed_position,
                commanded = state.commanded_position(),
                signal = ?report.signal,
                "Module report"
            );
        }
    }

    fn report_fault(&mut self, kind: ActuatorKind, error: &ControlError) {
        error!(%kind, %error, "Module fault");
    }
}

// ─── JSON lines ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonRecord<'a> {
    State(&'a ControlReport),
    Fault { kind: ActuatorKind, message: String },
}

/// Writes each report as one JSON line.
///
/// Write errors are logged and counted; reporting never stops the control
/// loop.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines: u64,
    write_errors: u64,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines: 0,
            write_errors: 0,
        }
    }

    /// Lines written successfully.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Failed writes.
    pub fn write_errors(&self) -> u64 {
        self.write_errors
    }

    /// Flush and return the writer.
    pub fn into_inner(mut self) -> W {
        if let Err(e) = self.writer.flush() {
            warn!(error = %e, "Report flush failed");
        }
        self.writer
    }

    fn write_record(&mut self, record: &JsonRecord<'_>) {
        let result = serde_json::to_writer(&mut self.writer, record)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        match result {
            Ok(()) => self.lines += 1,
            Err(e) => {
                self.write_errors += 1;
                warn!(error = %e, "Report write failed");
            }
        }
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn report_state(&mut self, report: &ControlReport) {
        self.write_record(&JsonRecord::State(report));
    }

    fn report_fault(&mut self, kind: ActuatorKind, error: &ControlError) {
        self.write_record(&JsonRecord::Fault {
            kind,
            message: error.to_string(),
        });
    }
}

// ─── Recording ──────────────────────────────────────────────────────

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// State reports in arrival order.
    pub states: Vec<ControlReport>,
    /// Faults in arrival order.
    pub faults: Vec<(ActuatorKind, ControlError)>,
}

impl RecordingSink {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent state report.
    pub fn last_state(&self) -> Option<&ControlReport> {
        self.states.last()
    }
}

impl ReportSink for RecordingSink {
    fn report_state(&mut self, report: &ControlReport) {
        self.states.push(*report);
    }

    fn report_fault(&mut self, kind: ActuatorKind, error: &ControlError) {
        self.faults.push((kind, error.clone()));
    }
}

// ─── Fan-out ────────────────────────────────────────────────────────

/// Forwards every report to two sinks.
#[derive(Debug, Default)]
pub struct FanOutSink<A, B> {
    /// First receiver.
    pub first: A,
    /// Second receiver.
    pub second: B,
}

impl<A, B> FanOutSink<A, B> {
    /// Pair two sinks.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: ReportSink, B: ReportSink> ReportSink for FanOutSink<A, B> {
    fn report_state(&mut self, report: &ControlReport) {
        self.first.report_state(report);
        self.second.report_state(report);
    }

    fn report_fault(&mut self, kind: ActuatorKind, error: &ControlError) {
        self.first.report_fault(kind, error);
        self.second.report_fault(kind, error);
    }
}
