//! Control authority transitions.
//!
//! Disabled ⇄ Enabled. The only way into `Enabled` is an enable request with
//! no fault latched; every other event leads to `Disabled` unconditionally.
//!
//! | From | Event | To |
//! |------|-------|----|
//! | Disabled | EnableRequested, no faults | Enabled |
//! | Disabled | EnableRequested, faults latched | rejected |
//! | any | DisableRequested | Disabled |
//! | any | SensorFaultLatched | Disabled (+ INVALID_SENSOR_VALUE) |
//! | any | OperatorOverride | Disabled (+ OPERATOR_OVERRIDE) |

use dbw_common::actuator::error::FaultFlags;
use dbw_common::actuator::state::{ControlMode, ControlState};

/// Result of a transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition applied, new mode.
    Ok(ControlMode),
    /// Transition rejected, blocking faults.
    Rejected(FaultFlags),
}

/// Event that can change control authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// External request to give the controller authority.
    EnableRequested,
    /// External request to return authority to the operator.
    DisableRequested,
    /// Consecutive invalid sensor reads reached the threshold.
    SensorFaultLatched,
    /// Smoothed pedal position exceeded the override threshold.
    OperatorOverride,
}

/// Control state owner.
#[derive(Debug, Clone, Default)]
pub struct ControlStateMachine {
    state: ControlState,
}

impl ControlStateMachine {
    /// Disabled with no faults.
    pub const fn new() -> Self {
        Self {
            state: ControlState::new(),
        }
    }

    /// Full state snapshot.
    #[inline]
    pub const fn state(&self) -> &ControlState {
        &self.state
    }

    /// Current mode.
    #[inline]
    pub const fn mode(&self) -> ControlMode {
        self.state.mode()
    }

    /// Apply an event.
    pub fn handle_event(&mut self, event: ControlEvent) -> TransitionResult {
        match event {
            ControlEvent::EnableRequested => match self.state.try_enable() {
                Ok(()) => TransitionResult::Ok(ControlMode::Enabled),
                Err(reasons) => TransitionResult::Rejected(reasons),
            },
            ControlEvent::DisableRequested => {
                self.state.disable();
                TransitionResult::Ok(ControlMode::Disabled)
            }
            ControlEvent::SensorFaultLatched => {
                self.state.latch_invalid_sensor_value();
                TransitionResult::Ok(ControlMode::Disabled)
            }
            ControlEvent::OperatorOverride => {
                self.state.latch_operator_override();
                TransitionResult::Ok(ControlMode::Disabled)
            }
        }
    }

    /// Clear the flags in `mask`. Never changes the mode.
    #[inline]
    pub fn clear_faults(&mut self, mask: FaultFlags) {
        self.state.clear_faults(mask);
    }

    /// Store the upstream command (saturated to 10 bits).
    #[inline]
    pub fn set_commanded_position(&mut self, position: u16) {
        self.state.set_commanded_position(position);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
