//! Signal conditioner.
//!
//! Converts a commanded position (10-bit command domain) into the two spoof
//! DAC levels:
//!
//! ```text
//! widened = min(cmd, 1023) << 2
//! volts   = widened × scale + offset
//! steps   = clamp(volts × 819.2, range.min, range.max)
//! ```
//!
//! Pure and allocation-free. The clamp is mandatory: for the throttle a zero
//! command evaluates to 327.68 steps on the low channel, one below its floor.

use dbw_common::actuator::calibration::{SpoofCalibration, SpoofChannel};
use dbw_common::actuator::signal::SpoofSignal;
use dbw_common::consts::{BIT_SHIFT_10BIT_TO_12BIT, COMMAND_MAX};

/// Widen a 10-bit command to the 12-bit DAC domain, saturating first.
#[inline]
pub const fn widen_command(command: u16) -> u16 {
    let command = if command > COMMAND_MAX {
        COMMAND_MAX
    } else {
        command
    };
    command << BIT_SHIFT_10BIT_TO_12BIT
}

/// Evaluate one channel and clamp it into its safety range [DAC steps].
#[inline]
fn channel_steps(widened: u16, channel: &SpoofChannel, steps_per_volt: f32) -> u16 {
    let steps = channel.curve.volts(widened) * steps_per_volt;
    // NaN collapses to the range floor.
    let clamped = steps
        .max(channel.range.min as f32)
        .min(channel.range.max as f32);
    clamped as u16
}

/// Condition a command into a spoof signal pair.
#[inline]
pub fn condition(command: u16, calibration: &SpoofCalibration) -> SpoofSignal {
    let widened = widen_command(command);
    SpoofSignal {
        low: channel_steps(widened, &calibration.low, calibration.steps_per_volt),
        high: channel_steps(widened, &calibration.high, calibration.steps_per_volt),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dbw_common::actuator::calibration::SignalRange;

    fn assert_full_domain_in_range(cal: &SpoofCalibration) {
        for cmd in 0..=COMMAND_MAX {
            let s = condition(cmd, cal);
            assert!(
                cal.low.range.contains(s.low),
                "low {} out of range for command {cmd}",
                s.low
            );
            assert!(
                cal.high.range.contains(s.high),
                "high {} out of range for command {cmd}",
                s.high
            );
        }
    }

    #[test]
    fn widen_shifts_by_two() {
        assert_eq!(widen_command(0), 0);
        assert_eq!(widen_command(512), 2048);
        assert_eq!(widen_command(1023), 4092);
    }

    #[test]
    fn widen_saturates_oversized_commands() {
        assert_eq!(widen_command(1024), 4092);
        assert_eq!(widen_command(u16::MAX), 4092);
    }

    #[test]
    fn throttle_midpoint_reference_values() {
        let s = condition(512, &SpoofCalibration::throttle());
        assert_eq!(s.low, 361);
        assert_eq!(s.high, 739);
    }

    #[test]
    fn throttle_zero_command_clamped_to_floor() {
        let s = condition(0, &SpoofCalibration::throttle());
        assert_eq!(s.low, 328);
        assert_eq!(s.high, 656);
    }

    #[test]
    fn throttle_full_domain_in_range() {
        assert_full_domain_in_range(&SpoofCalibration::throttle());
    }

    #[test]
    fn brake_full_domain_in_range() {
        assert_full_domain_in_range(&SpoofCalibration::brake());
    }

    #[test]
    fn output_is_monotonic_in_command() {
        let cal = SpoofCalibration::throttle();
        let mut prev = condition(0, &cal);
        for cmd in 1..=COMMAND_MAX {
            let s = condition(cmd, &cal);
            assert!(s.low >= prev.low && s.high >= prev.high);
            prev = s;
        }
    }

    #[test]
    fn narrow_range_clamps_ceiling() {
        let mut cal = SpoofCalibration::throttle();
        cal.high.range = SignalRange::new(656, 700);
        let s = condition(1023, &cal);
        assert_eq!(s.high, 700);
    }
}
