//! Integration test: fault-free operation.
//!
//! 1. A disabled module never drives the spoof DAC
//! 2. Enabled, the DAC follows the conditioned command
//! 3. Disable hands control back within one output period

use dbw_common::actuator::profile::ActuatorKind;
use dbw_common::actuator::signal::{ActuatorSignal, SpoofSignal};
use dbw_common::actuator::state::ControlMode;
use dbw_common::consts::{
    BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MAX, BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MIN,
    BRAKE_SPOOF_LOW_SIGNAL_RANGE_MAX, BRAKE_SPOOF_LOW_SIGNAL_RANGE_MIN,
};
use dbw_hal::ScenarioScript;

use super::rig::Rig;

#[test]
fn disabled_module_passes_through() {
    let mut rig = Rig::new(ActuatorKind::Throttle);
    rig.controller_mut().apply_command(900);
    rig.advance_to(500);

    assert!(!rig.driver().relay_engaged());
    assert_eq!(rig.driver().last_signal(), ActuatorSignal::PassThrough);
    // Reports at 0, 100, .. 500.
    assert_eq!(rig.sink.states.len(), 6);
    assert!(
        rig.sink
            .states
            .iter()
            .all(|r| r.mode == ControlMode::Disabled && r.state.faults().is_empty())
    );
    assert!(rig.sink.faults.is_empty());
}

#[test]
fn nominal_script_follows_commands() {
    let mut rig = Rig::new(ActuatorKind::Throttle);
    let mut script = ScenarioScript::nominal();

    rig.play(&mut script, 600);
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);
    assert_eq!(
        rig.driver().dac_output(),
        Some(SpoofSignal { low: 361, high: 739 })
    );

    rig.play(&mut script, 2460);
    assert!(rig.driver().relay_engaged());

    // Disable at 2500; the output update at the same tick releases the relay.
    rig.play(&mut script, 2500);
    assert_eq!(rig.controller().mode(), ControlMode::Disabled);
    assert!(!rig.driver().relay_engaged());
    assert!(rig.controller().state().faults().is_empty());
    assert!(rig.sink.faults.is_empty());
}

#[test]
fn report_stream_shows_enable_and_disable() {
    let mut rig = Rig::new(ActuatorKind::Throttle);
    let mut script = ScenarioScript::nominal();
    rig.play(&mut script, 3000);

    let modes: Vec<_> = rig.sink.states.iter().map(|r| r.mode).collect();
    let enabled_at = modes.iter().position(|m| *m == ControlMode::Enabled).unwrap();
    let disabled_again = modes[enabled_at..]
        .iter()
        .position(|m| *m == ControlMode::Disabled)
        .unwrap();
    assert!(disabled_again > 0);
    assert!(
        rig.sink
            .states
            .iter()
            .all(|r| r.smoothed_position.is_some())
    );
}

#[test]
fn brake_output_stays_within_calibrated_ranges() {
    let mut rig = Rig::new(ActuatorKind::Brake);
    rig.controller_mut().request_enable().unwrap();

    for command in (0..=1023u16).step_by(31).chain([1023]) {
        rig.controller_mut().apply_command(command);
        let until = rig.now_ms + 20;
        rig.advance_to(until);

        let out = rig.driver().dac_output().unwrap();
        assert!(
            (BRAKE_SPOOF_LOW_SIGNAL_RANGE_MIN..=BRAKE_SPOOF_LOW_SIGNAL_RANGE_MAX).contains(&out.low),
            "command {command}: {out:?}"
        );
        assert!(
            (BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MIN..=BRAKE_SPOOF_HIGH_SIGNAL_RANGE_MAX)
                .contains(&out.high),
            "command {command}: {out:?}"
        );
    }
    assert_eq!(rig.controller().mode(), ControlMode::Enabled);
}

#[test]
fn command_change_reaches_dac_on_next_output_update() {
    let mut rig = Rig::new(ActuatorKind::Throttle);
    rig.controller_mut().request_enable().unwrap();
    rig.controller_mut().apply_command(0);
    rig.advance_to(0);
    assert_eq!(rig.driver().dac_output(), Some(SpoofSignal { low: 328, high: 656 }));

    rig.controller_mut().apply_command(512);
    // Output update runs at 20 ms, not at 10.
    rig.advance_to(10);
    assert_eq!(rig.driver().dac_output(), Some(SpoofSignal { low: 328, high: 656 }));
    rig.advance_to(20);
    assert_eq!(rig.driver().dac_output(), Some(SpoofSignal { low: 361, high: 739 }));
}
