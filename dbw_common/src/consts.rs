//! System-wide constants for the drive-by-wire workspace.
//!
//! Single source of truth for calibration curves, safety ranges, sensor
//! windows and check periods. Imported by all crates; do not duplicate.
//!
//! The spoof ranges are hardware limits of the vehicle's pedal inputs.
//! Values outside them can put the vehicle into a fault state that requires
//! dealer tooling to clear.

use static_assertions::const_assert;

// ─── Board ──────────────────────────────────────────────────────────

/// Number of bits to shift to go from a 10-bit value to a 12-bit value.
pub const BIT_SHIFT_10BIT_TO_12BIT: u32 = 2;

/// Largest command accepted in the 10-bit command domain.
pub const COMMAND_MAX: u16 = 1023;

/// Largest raw value produced by the 12-bit ADC / accepted by the 12-bit DAC.
pub const ADC_MAX: u16 = 4095;

/// Number of DAC steps per volt (4096 steps across 5 volts).
pub const STEPS_PER_VOLT: f32 = 819.2;

// ─── Shared check parameters ────────────────────────────────────────

/// Number of consecutive invalid sensor reads before control is disabled.
pub const SENSOR_VALIDITY_CHECK_FAULT_COUNT: u8 = 4;

/// Alpha term for the exponential filter used to smooth the pedal sensor input.
pub const SENSOR_EXPONENTIAL_FILTER_ALPHA: f32 = 0.25;

/// Period between sensor validity checks [ms].
pub const SENSOR_VALIDITY_CHECK_INTERVAL_MS: u32 = 250;

/// Period between operator override checks [ms].
pub const OVERRIDE_CHECK_INTERVAL_MS: u32 = 50;

/// Period between spoof output updates [ms].
pub const OUTPUT_UPDATE_INTERVAL_MS: u32 = 20;

/// Period between status report publications [ms].
pub const REPORT_PUBLISH_INTERVAL_MS: u32 = 100;

// ─── Throttle ───────────────────────────────────────────────────────

/// Scalar for the low throttle spoof signal (calibration curve) [V/step].
pub const THROTTLE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_SCALE: f32 = 0.00002;
/// Offset for the low throttle spoof signal (calibration curve) [V].
pub const THROTTLE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_OFFSET: f32 = 0.40;
/// Scalar for the high throttle spoof signal (calibration curve) [V/step].
pub const THROTTLE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_SCALE: f32 = 0.00005;
/// Offset for the high throttle spoof signal (calibration curve) [V].
pub const THROTTLE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_OFFSET: f32 = 0.80;

/// Minimum allowed value for the low throttle spoof signal [DAC steps].
pub const THROTTLE_SPOOF_LOW_SIGNAL_RANGE_MIN: u16 = 328;
/// Maximum allowed value for the low throttle spoof signal [DAC steps].
pub const THROTTLE_SPOOF_LOW_SIGNAL_RANGE_MAX: u16 = 1638;
/// Minimum allowed value for the high throttle spoof signal [DAC steps].
pub const THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MIN: u16 = 656;
/// Maximum allowed value for the high throttle spoof signal [DAC steps].
pub const THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MAX: u16 = 3358;

/// Smoothed accelerator position that indicates operator override [ADC counts].
pub const ACCELERATOR_OVERRIDE_THRESHOLD: f32 = 750.0;

/// Valid operating window of the low accelerator sensor channel [ADC counts].
pub const ACCELERATOR_SENSOR_LOW_RANGE: (u16, u16) = (250, 1700);
/// Valid operating window of the high accelerator sensor channel [ADC counts].
pub const ACCELERATOR_SENSOR_HIGH_RANGE: (u16, u16) = (500, 3400);
/// Allowed disagreement between `low` and `high / 2` [ADC counts].
pub const ACCELERATOR_SENSOR_REDUNDANCY_TOLERANCE: u16 = 150;

// ─── Brake ──────────────────────────────────────────────────────────

/// Scalar for the low brake spoof signal (calibration curve) [V/step].
pub const BRAKE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_SCALE: f32 = 0.00019;
/// Offset for the low brake spoof signal (calibration curve) [V].
pub const BRAKE_SPOOF_LOW_SIGNAL_CALIBRATION_CURVE_OFFSET: f32 = 0.28;
/// Scalar for the high brake spoof signal (calibration curve) [V/step].
pub const BRAKE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_SCALE: f32 = 0.00038;
/// Offset for the high brake spoof signal (calibration curve) [V].
pub const BRAKE_SPOOF_HIGH_SIGNAL_CALIBRATION_CURVE_OFFSET: f32 = 0.56;

/// Minimum allowed value for the low brake spoof signal [DAC steps].
pub const BRAKE_SPOOF_LOW_SIGNAL_RANGE_MIN: u16 = 229;
/// Maximum allowed value for the low brake spoof signal [DAC steps].
pub const BRAKE_SPOOF_LOW_SIGNAL_RANGE_MAX: u16 = 920;
/// Minimum allowed value for the high brake spoof signal [DAC steps].
pub const BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MIN: u16 = 457;
/// Maximum allowed value for the high brake spoof signal [DAC steps].
pub const BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MAX: u16 = 1838;

/// Smoothed brake pedal position that indicates operator override [ADC counts].
pub const BRAKE_PEDAL_OVERRIDE_THRESHOLD: f32 = 400.0;

/// Valid operating window of the low brake pedal sensor channel [ADC counts].
pub const BRAKE_PEDAL_SENSOR_LOW_RANGE: (u16, u16) = (120, 1000);
/// Valid operating window of the high brake pedal sensor channel [ADC counts].
pub const BRAKE_PEDAL_SENSOR_HIGH_RANGE: (u16, u16) = (240, 2000);
/// Allowed disagreement between `low` and `high / 2` [ADC counts].
pub const BRAKE_PEDAL_SENSOR_REDUNDANCY_TOLERANCE: u16 = 120;

// ─── Compile-time sanity ────────────────────────────────────────────

const_assert!(THROTTLE_SPOOF_LOW_SIGNAL_RANGE_MIN < THROTTLE_SPOOF_LOW_SIGNAL_RANGE_MAX);
const_assert!(THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MIN < THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MAX);
const_assert!(THROTTLE_SPOOF_HIGH_SIGNAL_RANGE_MAX <= ADC_MAX);
const_assert!(BRAKE_SPOOF_LOW_SIGNAL_RANGE_MIN < BRAKE_SPOOF_LOW_SIGNAL_RANGE_MAX);
const_assert!(BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MIN < BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MAX);
const_assert!(BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MAX <= ADC_MAX);
const_assert!((COMMAND_MAX as u32) << BIT_SHIFT_10BIT_TO_12BIT <= ADC_MAX as u32);
const_assert!(SENSOR_VALIDITY_CHECK_FAULT_COUNT > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_periods_are_positive() {
        assert!(SENSOR_VALIDITY_CHECK_INTERVAL_MS > 0);
        assert!(OVERRIDE_CHECK_INTERVAL_MS > 0);
        assert!(OUTPUT_UPDATE_INTERVAL_MS > 0);
        assert!(REPORT_PUBLISH_INTERVAL_MS > 0);
    }

    #[test]
    fn filter_alpha_in_unit_interval() {
        assert!(SENSOR_EXPONENTIAL_FILTER_ALPHA > 0.0);
        assert!(SENSOR_EXPONENTIAL_FILTER_ALPHA <= 1.0);
    }

    #[test]
    fn steps_per_volt_matches_12bit_over_5v() {
        assert!((STEPS_PER_VOLT * 5.0 - 4096.0).abs() < 1e-3);
    }

    #[test]
    fn sensor_windows_are_well_formed() {
        for (lo, hi) in [
            ACCELERATOR_SENSOR_LOW_RANGE,
            ACCELERATOR_SENSOR_HIGH_RANGE,
            BRAKE_PEDAL_SENSOR_LOW_RANGE,
            BRAKE_PEDAL_SENSOR_HIGH_RANGE,
        ] {
            assert!(lo > 0, "a grounded channel must never look valid");
            assert!(lo < hi);
            assert!(hi <= ADC_MAX);
        }
    }
}
