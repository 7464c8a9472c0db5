//! Integration test: sensor validity.
//!
//! 1. Invalid reads are tolerated until the fourth consecutive one
//! 2. A latched sensor fault needs a valid read and an acknowledgement
//! 3. A failed ADC read disables at once and is reported, without latching
//! 4. Enable is refused until the ADC answers again

use dbw_common::actuator::error::{ControlError, FaultFlags};
use dbw_common::actuator::profile::ActuatorKind;
use dbw_common::actuator::state::ControlMode;
use dbw_hal::{ScenarioScript, SensorFault};

use super::rig::Rig;

fn enabled_rig() -> Rig {
    let mut rig = Rig::new(ActuatorKind::Throttle);
    rig.controller_mut().apply_command(512);
    rig.controller_mut().request_enable().unwrap();
    rig.advance_to(0);
    rig
}

#[test]
fn disconnected_pin_latches_on_fourth_check() {
    let mut rig = enabled_rig();
    rig.driver_mut().inject_fault(SensorFault::Disconnected);

    // Checks at 250, 500, 750 are tolerated.
    rig.advance_to(990);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);
    assert_eq!(rig.controller().fault_count(), 3);
    assert!(rig.driver().relay_engaged());

    rig.advance_to(1000);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
    assert!(rig.controller().state().invalid_sensor_value());
    assert!(!rig.controller().state().operator_override());
    assert!(!rig.driver().relay_engaged());
}

#[test]
fn disagreeing_channels_latch() {
    let mut rig = enabled_rig();
    rig.driver_mut().inject_fault(SensorFault::Disagreement);
    rig.advance_to(1000);
    assert_eq!(rig.controller().state().faults(), FaultFlags::INVALID_SENSOR_VALUE);
}

#[test]
fn single_bad_read_is_forgotten() {
    let mut rig = enabled_rig();
    rig.driver_mut().inject_fault(SensorFault::Disconnected);
    rig.advance_to(500);
    assert_eq!(rig.controller().fault_count(), 2);

    rig.driver_mut().inject_fault(SensorFault::None);
    rig.advance_to(750);
    assert_eq!(rig.controller().fault_count(), 0);

    rig.driver_mut().inject_fault(SensorFault::Disconnected);
    rig.advance_to(1500);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);
    assert_eq!(rig.controller().fault_count(), 3);
}

#[test]
fn reconnect_requires_clear_and_enable() {
    let mut rig = Rig::new(ActuatorKind::Throttle);
    let mut script = ScenarioScript::sensor_fault();

    rig.play(&mut script, 1490);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);

    rig.play(&mut script, 1500);
    assert!(rig.controller().state().invalid_sensor_value());

    // Reconnected at 2000: the counter resets, the flag stays.
    rig.play(&mut script, 2300);
    assert_eq!(rig.controller().fault_count(), 0);
    assert!(rig.controller().state().invalid_sensor_value());
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);

    rig.play(&mut script, 2450);
    assert!(rig.controller().state().faults().is_empty());
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);

    rig.play(&mut script, 2600);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);

    rig.play(&mut script, 3000);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
}

#[test]
fn read_failure_disables_and_is_reported() {
    let mut rig = enabled_rig();
    let smoothed = rig.controller().smoothed_position();
    rig.driver_mut().inject_fault(SensorFault::Unavailable);

    rig.advance_to(50);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
    assert_eq!(rig.sink.faults.len(), 1);
    let (kind, err) = &rig.sink.faults[0];
    assert_eq!(*kind, ActuatorKind::Throttle);
    assert!(matches!(err, ControlError::SensorUnavailable { .. }));

    assert!(rig.controller().state().faults().is_empty());
    assert_eq!(rig.controller().fault_count(), 0);
    assert_eq!(rig.controller().smoothed_position(), smoothed);

    // Driver back, but enable waits for the override check at 100 to read it.
    rig.driver_mut().inject_fault(SensorFault::None);
    assert!(rig.controller_mut().request_enable().is_err());
    rig.advance_to(100);
    assert!(rig.controller().sensor_available());
    rig.controller_mut().request_enable().unwrap();
    rig.advance_to(120);
    assert!(rig.driver().relay_engaged());
}

#[test]
fn enable_refused_while_adc_is_down() {
    let mut rig = Rig::new(ActuatorKind::Throttle);
    rig.driver_mut().inject_fault(SensorFault::Unavailable);
    rig.controller_mut().apply_command(512);
    rig.advance_to(0);

    let err = rig.controller_mut().request_enable().unwrap_err();
    assert!(matches!(err, ControlError::SensorUnavailable { .. }));

    rig.advance_to(40);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
    assert!(!rig.driver().relay_engaged());
    assert!(!rig.controller().last_signal().is_spoofing());

    rig.driver_mut().inject_fault(SensorFault::None);
    rig.advance_to(50);
    rig.controller_mut().request_enable().unwrap();
    rig.advance_to(60);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);
    assert!(rig.driver().relay_engaged());
}
