//! Sensor validator.
//!
//! Classifies each redundant pedal sensor reading and keeps the
//! consecutive-fault counter. A single bad read is transient; reaching the
//! threshold means the sensor fault must be latched. A valid read resets the
//! counter but does not itself clear a latched fault.

use dbw_common::actuator::profile::SensorValidityWindow;
use dbw_common::actuator::signal::SensorReading;

// ─── Fault Counter ──────────────────────────────────────────────────

/// Consecutive invalid-read counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultCounter {
    count: u8,
}

impl FaultCounter {
    /// Zeroed counter.
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Current count.
    #[inline]
    pub const fn count(&self) -> u8 {
        self.count
    }

    /// Saturating increment. Returns the new count.
    #[inline]
    pub fn increment(&mut self) -> u8 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Reset to zero.
    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

// ─── Validator ──────────────────────────────────────────────────────

/// Outcome of one validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorCheck {
    /// Reading accepted; counter reset.
    Valid,
    /// Reading rejected, threshold not reached.
    Transient {
        /// Consecutive invalid reads so far.
        consecutive: u8,
    },
    /// Reading rejected and the threshold is reached.
    FaultLatched {
        /// Consecutive invalid reads so far.
        consecutive: u8,
    },
}

impl SensorCheck {
    /// Whether the checked reading was accepted.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Redundant sensor validator.
#[derive(Debug, Clone)]
pub struct SensorValidator {
    window: SensorValidityWindow,
    fault_threshold: u8,
    counter: FaultCounter,
    last_valid: bool,
}

impl SensorValidator {
    /// Create a validator. No read has happened yet, so the sensor is not
    /// known good.
    pub const fn new(window: SensorValidityWindow, fault_threshold: u8) -> Self {
        Self {
            window,
            fault_threshold,
            counter: FaultCounter::new(),
            last_valid: false,
        }
    }

    /// Consecutive invalid reads.
    #[inline]
    pub const fn fault_count(&self) -> u8 {
        self.counter.count()
    }

    /// Invalid reads needed to latch.
    #[inline]
    pub const fn fault_threshold(&self) -> u8 {
        self.fault_threshold
    }

    /// Operating window in use.
    #[inline]
    pub const fn window(&self) -> &SensorValidityWindow {
        &self.window
    }

    /// Last read was valid and no invalid read is pending.
    #[inline]
    pub const fn is_healthy(&self) -> bool {
        self.last_valid && self.counter.count() == 0
    }

    /// The sensor could not be read: it is no longer known good. The counter
    /// is left as is.
    #[inline]
    pub fn mark_unavailable(&mut self) {
        self.last_valid = false;
    }

    /// Classify one reading and update the counter.
    pub fn check(&mut self, reading: &SensorReading) -> SensorCheck {
        if self.window.accepts(reading) {
            self.counter.reset();
            self.last_valid = true;
            return SensorCheck::Valid;
        }

        self.last_valid = false;
        let consecutive = self.counter.increment();
        if consecutive >= self.fault_threshold {
            SensorCheck::FaultLatched { consecutive }
        } else {
            SensorCheck::Transient { consecutive }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dbw_common::actuator::profile::ActuatorProfile;

    const GOOD: SensorReading = SensorReading::new(300, 600);
    const GROUNDED: SensorReading = SensorReading::new(0, 600);

    fn throttle_validator() -> SensorValidator {
        let p = ActuatorProfile::throttle();
        SensorValidator::new(p.sensor, p.fault_count_threshold)
    }

    #[test]
    fn counter_saturates() {
        let mut c = FaultCounter { count: u8::MAX - 1 };
        assert_eq!(c.increment(), u8::MAX);
        assert_eq!(c.increment(), u8::MAX);
        c.reset();
        assert_eq!(c.count(), 0);
    }

    #[test]
    fn new_validator_is_not_healthy() {
        let v = throttle_validator();
        assert!(!v.is_healthy());
        assert_eq!(v.fault_count(), 0);
    }

    #[test]
    fn fourth_invalid_read_latches() {
        let mut v = throttle_validator();
        assert_eq!(v.check(&GROUNDED), SensorCheck::Transient { consecutive: 1 });
        assert_eq!(v.check(&GROUNDED), SensorCheck::Transient { consecutive: 2 });
        assert_eq!(v.check(&GROUNDED), SensorCheck::Transient { consecutive: 3 });
        assert_eq!(v.check(&GROUNDED), SensorCheck::FaultLatched { consecutive: 4 });
        assert_eq!(v.check(&GROUNDED), SensorCheck::FaultLatched { consecutive: 5 });
    }

    #[test]
    fn valid_read_resets_counter() {
        let mut v = throttle_validator();
        v.check(&GROUNDED);
        v.check(&GROUNDED);
        v.check(&GROUNDED);
        assert_eq!(v.check(&GOOD), SensorCheck::Valid);
        assert_eq!(v.fault_count(), 0);
        assert!(v.is_healthy());
        assert_eq!(v.check(&GROUNDED), SensorCheck::Transient { consecutive: 1 });
        assert!(!v.is_healthy());
    }

    #[test]
    fn unavailable_sensor_is_not_healthy_until_next_valid_read() {
        let mut v = throttle_validator();
        v.check(&GROUNDED);
        v.check(&GOOD);
        assert!(v.is_healthy());

        v.mark_unavailable();
        assert!(!v.is_healthy());
        assert_eq!(v.fault_count(), 0);

        v.check(&GOOD);
        assert!(v.is_healthy());
    }

    #[test]
    fn disagreeing_channels_count_as_invalid() {
        let mut v = throttle_validator();
        let check = v.check(&SensorReading::new(300, 1400));
        assert!(!check.is_valid());
    }
}
