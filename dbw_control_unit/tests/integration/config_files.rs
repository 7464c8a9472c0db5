//! Integration test: shipped module configs.
//!
//! The files under `config/` must load, validate and produce the built-in
//! profile for their kind. A module built from a loaded config runs.

use std::fs;
use std::path::PathBuf;

use dbw_common::actuator::config::ModuleConfig;
use dbw_common::actuator::profile::{ActuatorKind, ActuatorProfile, LatchPolicy};
use dbw_common::actuator::state::ControlMode;
use dbw_common::config::ConfigLoader;
use dbw_control_unit::cycle::ActuatorModule;
use dbw_hal::{RecordingSink, SimulationDriver};
use tempfile::TempDir;

fn shipped(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config").join(name)
}

#[test]
fn shipped_configs_match_builtin_profiles() {
    for (file, kind) in [
        ("throttle.toml", ActuatorKind::Throttle),
        ("brake.toml", ActuatorKind::Brake),
    ] {
        let cfg = ModuleConfig::load(&shipped(file)).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.module.kind, kind, "{file}");
        assert_eq!(cfg.profile(), ActuatorProfile::for_kind(kind), "{file}");
    }
}

#[test]
fn module_runs_from_loaded_config() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("brake.toml");
    fs::write(
        &path,
        r#"
[shared]
service_name = "brake-test"

[module]
kind = "brake"
latch_policy = "auto_clear"

[module.periods]
output_update_ms = 10
"#,
    )
    .unwrap();

    let cfg = ModuleConfig::load(&path).unwrap();
    cfg.validate().unwrap();
    let profile = cfg.profile();
    assert_eq!(profile.latch_policy, LatchPolicy::AutoClear);

    let mut module = ActuatorModule::new(
        profile,
        &cfg.module.periods,
        SimulationDriver::new(profile.kind),
        0,
    )
    .unwrap();
    assert_eq!(module.scheduler().base_tick_ms(), Some(10));

    module.controller_mut().request_enable().unwrap();
    let mut sink = RecordingSink::new();
    for now in (0..=200).step_by(10) {
        module.tick(now, &mut sink);
    }
    assert_eq!(module.controller().mode(), ControlMode::Enabled);
    assert!(module.controller().driver().relay_engaged());
    assert_eq!(sink.states.len(), 3);
}
