//! Actuator controller.
//!
//! One `ActuatorController` per module (throttle or brake). It owns the
//! injected driver, the control state machine, the sensor validator and the
//! override detector, and exposes the periodic entry points plus the external
//! requests:
//!
//! | Entry point | Caller |
//! |-------------|--------|
//! | `check_for_operator_override` | scheduler, override period |
//! | `check_for_sensor_faults` | scheduler, sensor period |
//! | `update_output` | scheduler, output period |
//! | `publish_report` | scheduler, report period |
//! | `request_enable` / `request_disable` / `request_fault_clear` / `apply_command` | upstream command path |
//!
//! All entry points take `&mut self`: one writer, no re-entrancy. Every fault
//! path ends disabled and nothing here enables on its own. A failed sensor
//! read blocks enabling and fault clearing until a later read succeeds.

use dbw_common::actuator::error::{ControlError, FaultFlags};
use dbw_common::actuator::profile::{ActuatorProfile, LatchPolicy};
use dbw_common::actuator::signal::{ActuatorSignal, SensorReading};
use dbw_common::actuator::state::{ControlMode, ControlState};
use dbw_common::hal::driver::{ActuatorDriver, HalError};
use dbw_common::hal::report::{ControlReport, ReportSink};
use tracing::{debug, error, info, warn};

use crate::control::conditioner::condition;
use crate::safety::override_detector::{OverrideCheck, OverrideDetector};
use crate::safety::validator::{SensorCheck, SensorValidator};
use crate::state::machine::{ControlEvent, ControlStateMachine, TransitionResult};

/// Control core for one actuator.
pub struct ActuatorController<D> {
    profile: ActuatorProfile,
    driver: D,
    machine: ControlStateMachine,
    validator: SensorValidator,
    detector: OverrideDetector,
    last_signal: ActuatorSignal,
    /// Set by a failed read, cleared by the next successful one.
    read_failure: Option<HalError>,
}

impl<D: ActuatorDriver> ActuatorController<D> {
    /// Create a disabled controller. `profile` is expected to be validated.
    pub fn new(profile: ActuatorProfile, driver: D) -> Self {
        info!(
            kind = %profile.kind,
            driver = driver.name(),
            driver_version = driver.version(),
            latch_policy = ?profile.latch_policy,
            "Actuator controller created"
        );
        Self {
            validator: SensorValidator::new(profile.sensor, profile.fault_count_threshold),
            detector: OverrideDetector::new(profile.override_detection),
            machine: ControlStateMachine::new(),
            last_signal: ActuatorSignal::PassThrough,
            read_failure: None,
            profile,
            driver,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Active profile.
    #[inline]
    pub fn profile(&self) -> &ActuatorProfile {
        &self.profile
    }

    /// Control state snapshot.
    #[inline]
    pub fn state(&self) -> &ControlState {
        self.machine.state()
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.machine.mode()
    }

    /// Consecutive invalid sensor reads.
    #[inline]
    pub fn fault_count(&self) -> u8 {
        self.validator.fault_count()
    }

    /// Filtered pedal position, `None` before the first override check.
    #[inline]
    pub fn smoothed_position(&self) -> Option<f32> {
        self.detector.smoothed()
    }

    /// Whether the last sensor read succeeded.
    #[inline]
    pub fn sensor_available(&self) -> bool {
        self.read_failure.is_none()
    }

    /// Last signal written to the driver.
    #[inline]
    pub fn last_signal(&self) -> ActuatorSignal {
        self.last_signal
    }

    /// Injected driver.
    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Injected driver, mutable.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back.
    pub fn into_driver(self) -> D {
        self.driver
    }

    // ─── Periodic entry points ──────────────────────────────────────

    /// Read the sensor, feed the override filter and latch on a pressed pedal.
    ///
    /// Runs regardless of mode so a pedal held while disabled keeps the latch.
    ///
    /// # Errors
    ///
    /// `ControlError::SensorUnavailable` if the driver read failed. Control is
    /// disabled and the filter is not advanced.
    pub fn check_for_operator_override(&mut self) -> Result<OverrideCheck, ControlError> {
        let reading = self.read_sensor()?;
        let check = self.detector.check(&reading);

        if check.overridden {
            if !self.state().operator_override() {
                warn!(
                    kind = %self.profile.kind,
                    smoothed = check.smoothed,
                    threshold = self.detector.threshold(),
                    was_enabled = self.state().enabled(),
                    "Operator override detected, control disabled"
                );
            }
            self.machine.handle_event(ControlEvent::OperatorOverride);
        } else if self.profile.latch_policy == LatchPolicy::AutoClear
            && self.state().operator_override()
        {
            self.machine.clear_faults(FaultFlags::OPERATOR_OVERRIDE);
            info!(
                kind = %self.profile.kind,
                smoothed = check.smoothed,
                "Operator override released"
            );
        }

        Ok(check)
    }

    /// Read the sensor and run the redundancy and range check.
    ///
    /// # Errors
    ///
    /// `ControlError::SensorUnavailable` if the driver read failed. Control is
    /// disabled and the fault counter is left untouched.
    pub fn check_for_sensor_faults(&mut self) -> Result<SensorCheck, ControlError> {
        let reading = self.read_sensor()?;
        let check = self.validator.check(&reading);

        match check {
            SensorCheck::Valid => {
                if self.profile.latch_policy == LatchPolicy::AutoClear
                    && self.state().invalid_sensor_value()
                {
                    self.machine.clear_faults(FaultFlags::INVALID_SENSOR_VALUE);
                    info!(kind = %self.profile.kind, "Sensor fault cleared by valid read");
                }
            }
            SensorCheck::Transient { consecutive } => {
                debug!(
                    kind = %self.profile.kind,
                    low = reading.low,
                    high = reading.high,
                    consecutive,
                    threshold = self.validator.fault_threshold(),
                    "Invalid sensor reading"
                );
            }
            SensorCheck::FaultLatched { consecutive } => {
                if !self.state().invalid_sensor_value() {
                    warn!(
                        kind = %self.profile.kind,
                        low = reading.low,
                        high = reading.high,
                        consecutive,
                        was_enabled = self.state().enabled(),
                        "Sensor fault latched, control disabled"
                    );
                }
                self.machine.handle_event(ControlEvent::SensorFaultLatched);
            }
        }

        Ok(check)
    }

    /// Write the spoof signal when enabled, pass-through otherwise.
    pub fn update_output(&mut self) -> ActuatorSignal {
        let signal = if self.state().enabled() {
            ActuatorSignal::Spoof(condition(
                self.state().commanded_position(),
                &self.profile.calibration,
            ))
        } else {
            ActuatorSignal::PassThrough
        };
        self.driver.write_actuator_signal(signal);
        self.last_signal = signal;
        signal
    }

    /// Current snapshot for reporting.
    pub fn report(&self) -> ControlReport {
        ControlReport {
            kind: self.profile.kind,
            mode: self.mode(),
            fault_count: self.fault_count(),
            smoothed_position: self.smoothed_position(),
            state: *self.state(),
            signal: self.last_signal,
        }
    }

    /// Push the current snapshot into `sink`.
    pub fn publish_report<S: ReportSink + ?Sized>(&self, sink: &mut S) {
        sink.report_state(&self.report());
    }

    // ─── External requests ──────────────────────────────────────────

    /// Hand authority to the controller.
    ///
    /// # Errors
    ///
    /// `ControlError::SensorUnavailable` if the last sensor read failed, or
    /// `ControlError::EnableRejected` with the latched flags if any fault is
    /// latched. State is unchanged in either case.
    pub fn request_enable(&mut self) -> Result<(), ControlError> {
        if let Some(source) = &self.read_failure {
            warn!(kind = %self.profile.kind, error = %source, "Enable request rejected, sensor unavailable");
            return Err(ControlError::SensorUnavailable {
                source: source.clone(),
            });
        }

        let was_enabled = self.state().enabled();
        match self.machine.handle_event(ControlEvent::EnableRequested) {
            TransitionResult::Ok(_) => {
                if !was_enabled {
                    info!(kind = %self.profile.kind, "Control enabled");
                }
                Ok(())
            }
            TransitionResult::Rejected(reasons) => {
                warn!(kind = %self.profile.kind, %reasons, "Enable request rejected");
                Err(ControlError::EnableRejected { reasons })
            }
        }
    }

    /// Return authority to the operator. Always succeeds.
    pub fn request_disable(&mut self) {
        if self.state().enabled() {
            info!(kind = %self.profile.kind, "Control disabled on request");
        }
        self.machine.handle_event(ControlEvent::DisableRequested);
    }

    /// Acknowledge latched faults whose condition is gone.
    ///
    /// Flags in `mask` that are not set are ignored. Never enables.
    ///
    /// # Errors
    ///
    /// `ControlError::FaultClearRejected` listing the requested flags whose
    /// condition persists (pedal still above threshold, or sensor not
    /// currently healthy). Clearable flags in the same request are cleared.
    /// While sensor reads fail no condition can be confirmed gone, so every
    /// requested flag remains.
    pub fn request_fault_clear(&mut self, mask: FaultFlags) -> Result<(), ControlError> {
        let requested = mask & self.state().faults();
        let mut clearable = FaultFlags::empty();
        if self.read_failure.is_none() {
            if requested.contains(FaultFlags::OPERATOR_OVERRIDE) && self.detector.is_released() {
                clearable |= FaultFlags::OPERATOR_OVERRIDE;
            }
            if requested.contains(FaultFlags::INVALID_SENSOR_VALUE) && self.validator.is_healthy()
            {
                clearable |= FaultFlags::INVALID_SENSOR_VALUE;
            }
        }

        if !clearable.is_empty() {
            self.machine.clear_faults(clearable);
            info!(kind = %self.profile.kind, cleared = %clearable, "Faults cleared");
        }

        let remaining = requested - clearable;
        if remaining.is_empty() {
            Ok(())
        } else {
            warn!(kind = %self.profile.kind, %remaining, "Fault clear rejected");
            Err(ControlError::FaultClearRejected { remaining })
        }
    }

    /// Store an upstream position command, saturated to 10 bits.
    ///
    /// Returns the stored value. Does not change the mode; it reaches the
    /// actuator on the next output update if enabled.
    pub fn apply_command(&mut self, position: u16) -> u16 {
        self.machine.set_commanded_position(position);
        self.state().commanded_position()
    }

    // ─── Internals ──────────────────────────────────────────────────

    fn read_sensor(&mut self) -> Result<SensorReading, ControlError> {
        match self.driver.read_sensor_channels() {
            Ok(reading) => {
                if let Some(previous) = self.read_failure.take() {
                    info!(
                        kind = %self.profile.kind,
                        driver = self.driver.name(),
                        previous = %previous,
                        "Sensor reads recovered"
                    );
                }
                Ok(reading)
            }
            Err(e) => {
                error!(
                    kind = %self.profile.kind,
                    driver = self.driver.name(),
                    error = %e,
                    was_enabled = self.state().enabled(),
                    "Sensor read failed, control disabled"
                );
                self.machine.handle_event(ControlEvent::DisableRequested);
                self.validator.mark_unavailable();
                self.read_failure = Some(e.clone());
                Err(ControlError::SensorUnavailable { source: e })
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
