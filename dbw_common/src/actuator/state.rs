//! Actuator control state.
//!
//! `ControlState` holds the authority flag, the two latched fault flags and
//! the last commanded position. Fields are private: every mutator keeps the
//! invariant `enabled ⇒ !operator_override && !invalid_sensor_value`, and
//! setting either flag clears `enabled` in the same call.

use serde::{Deserialize, Serialize};

use super::error::FaultFlags;
use crate::consts::COMMAND_MAX;

/// Two-state control mode derived from `ControlState::enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Operator has authority; spoof relay released.
    #[default]
    Disabled,
    /// Automated controller has authority.
    Enabled,
}

/// Per-module control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    enabled: bool,
    operator_override: bool,
    invalid_sensor_value: bool,
    commanded_position: u16,
}

impl ControlState {
    /// Disabled, no faults, zero command.
    pub const fn new() -> Self {
        Self {
            enabled: false,
            operator_override: false,
            invalid_sensor_value: false,
            commanded_position: 0,
        }
    }

    /// Whether automated control has authority.
    #[inline]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether operator action was detected and not yet cleared.
    #[inline]
    pub const fn operator_override(&self) -> bool {
        self.operator_override
    }

    /// Whether the sensor fault latch is set.
    #[inline]
    pub const fn invalid_sensor_value(&self) -> bool {
        self.invalid_sensor_value
    }

    /// Last commanded position (10-bit command domain).
    #[inline]
    pub const fn commanded_position(&self) -> u16 {
        self.commanded_position
    }

    /// Current mode.
    #[inline]
    pub const fn mode(&self) -> ControlMode {
        if self.enabled {
            ControlMode::Enabled
        } else {
            ControlMode::Disabled
        }
    }

    /// Latched fault flags as a set.
    pub fn faults(&self) -> FaultFlags {
        let mut flags = FaultFlags::empty();
        if self.operator_override {
            flags |= FaultFlags::OPERATOR_OVERRIDE;
        }
        if self.invalid_sensor_value {
            flags |= FaultFlags::INVALID_SENSOR_VALUE;
        }
        flags
    }

    /// Enable if no fault is latched. Returns the blocking flags otherwise.
    pub fn try_enable(&mut self) -> Result<(), FaultFlags> {
        let faults = self.faults();
        if !faults.is_empty() {
            return Err(faults);
        }
        self.enabled = true;
        Ok(())
    }

    /// Unconditionally drop authority.
    #[inline]
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Latch operator override and disable in one step.
    #[inline]
    pub fn latch_operator_override(&mut self) {
        self.operator_override = true;
        self.enabled = false;
    }

    /// Latch the sensor fault and disable in one step.
    #[inline]
    pub fn latch_invalid_sensor_value(&mut self) {
        self.invalid_sensor_value = true;
        self.enabled = false;
    }

    /// Clear the flags in `mask`. Never enables.
    pub fn clear_faults(&mut self, mask: FaultFlags) {
        if mask.contains(FaultFlags::OPERATOR_OVERRIDE) {
            self.operator_override = false;
        }
        if mask.contains(FaultFlags::INVALID_SENSOR_VALUE) {
            self.invalid_sensor_value = false;
        }
    }

    /// Store an upstream command, saturated to the 10-bit domain.
    #[inline]
    pub fn set_commanded_position(&mut self, position: u16) {
        self.commanded_position = position.min(COMMAND_MAX);
    }
}
