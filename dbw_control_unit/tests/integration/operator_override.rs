//! Integration test: operator override.
//!
//! 1. Pedal pressed while enabled -> disabled on the next override check
//! 2. Latched flag blocks enable until acknowledged with the pedal released
//! 3. Auto-clear policy drops the flag on release but never re-enables

use dbw_common::actuator::error::{ControlError, FaultFlags};
use dbw_common::actuator::profile::{ActuatorKind, ActuatorProfile, LatchPolicy};
use dbw_common::actuator::state::ControlMode;
use dbw_hal::ScenarioScript;

use super::rig::Rig;

fn enabled_rig(kind: ActuatorKind) -> Rig {
    let mut rig = Rig::new(kind);
    rig.controller_mut().apply_command(400);
    rig.controller_mut().request_enable().unwrap();
    rig.advance_to(100);
    assert!(rig.driver().relay_engaged());
    rig
}

#[test]
fn pressed_pedal_disables_on_next_override_check() {
    let mut rig = enabled_rig(ActuatorKind::Throttle);
    rig.driver_mut().set_pedal(0.8);

    rig.advance_to(140);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);

    rig.advance_to(150);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
    assert!(rig.controller().state().operator_override());

    rig.advance_to(160);
    assert!(!rig.driver().relay_engaged());
}

#[test]
fn brake_override_needs_filter_to_cross_threshold() {
    let mut rig = enabled_rig(ActuatorKind::Brake);
    // Raw mean 825: the first filtered sample (375) stays below 400.
    rig.driver_mut().set_pedal(0.5);

    rig.advance_to(150);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);
    assert_eq!(rig.controller().smoothed_position(), Some(375.0));

    rig.advance_to(200);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
    assert!(rig.controller().state().operator_override());
}

#[test]
fn override_persists_until_cleared() {
    let mut rig = Rig::new(ActuatorKind::Throttle);
    let mut script = ScenarioScript::operator_override();

    rig.play(&mut script, 1250);
    assert!(rig.controller().state().operator_override());

    // Released at 1300, enable attempt at 1800.
    rig.play(&mut script, 1900);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
    assert!(rig.controller().state().operator_override());
    assert!(!rig.driver().relay_engaged());

    // Cleared at 2000, still disabled until the enable at 2100.
    rig.play(&mut script, 2050);
    assert!(rig.controller().state().faults().is_empty());
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);

    rig.play(&mut script, 2200);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);
    assert!(rig.driver().relay_engaged());

    rig.play(&mut script, 2600);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
    assert!(rig.sink.faults.is_empty());
}

#[test]
fn held_pedal_keeps_override_latched_while_disabled() {
    let mut rig = enabled_rig(ActuatorKind::Throttle);
    rig.driver_mut().set_pedal(1.0);
    rig.advance_to(1000);

    assert!(matches!(
        rig.controller_mut().request_fault_clear(FaultFlags::all()),
        Err(ControlError::FaultClearRejected { remaining }) if remaining == FaultFlags::OPERATOR_OVERRIDE
    ));
    assert!(matches!(
        rig.controller_mut().request_enable(),
        Err(ControlError::EnableRejected { reasons }) if reasons == FaultFlags::OPERATOR_OVERRIDE
    ));
}

#[test]
fn auto_clear_releases_flag_but_stays_disabled() {
    let mut profile = ActuatorProfile::throttle();
    profile.latch_policy = LatchPolicy::AutoClear;
    let mut rig = Rig::with_profile(profile);
    rig.controller_mut().request_enable().unwrap();

    rig.driver_mut().set_pedal(0.8);
    rig.advance_to(100);
    assert!(rig.controller().state().operator_override());

    rig.driver_mut().set_pedal(0.0);
    rig.advance_to(1000);
    assert!(!rig.controller().state().operator_override());
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);

    rig.controller_mut().request_enable().unwrap();
    rig.advance_to(1020);
    assert!(rig.driver().relay_engaged());
}
