//! Simulated-time harness shared by the integration tests.

use dbw_common::actuator::config::TaskPeriods;
use dbw_common::actuator::error::FaultFlags;
use dbw_common::actuator::profile::{ActuatorKind, ActuatorProfile};
use dbw_control_unit::controller::ActuatorController;
use dbw_control_unit::cycle::ActuatorModule;
use dbw_hal::{RecordingSink, ScenarioAction, ScenarioScript, SimulationDriver};

/// Tick spacing used by every test [ms]; the gcd of the default periods.
pub const TICK_MS: u64 = 10;

pub struct Rig {
    pub module: ActuatorModule<SimulationDriver>,
    pub sink: RecordingSink,
    /// Next tick to run.
    pub now_ms: u64,
}

impl Rig {
    pub fn new(kind: ActuatorKind) -> Self {
        Self::with_profile(ActuatorProfile::for_kind(kind))
    }

    pub fn with_profile(profile: ActuatorProfile) -> Self {
        let driver = SimulationDriver::new(profile.kind);
        Self {
            module: ActuatorModule::new(profile, &TaskPeriods::default(), driver, 0).unwrap(),
            sink: RecordingSink::new(),
            now_ms: 0,
        }
    }

    pub fn controller(&self) -> &ActuatorController<SimulationDriver> {
        self.module.controller()
    }

    pub fn controller_mut(&mut self) -> &mut ActuatorController<SimulationDriver> {
        self.module.controller_mut()
    }

    pub fn driver(&self) -> &SimulationDriver {
        self.module.controller().driver()
    }

    pub fn driver_mut(&mut self) -> &mut SimulationDriver {
        self.module.controller_mut().driver_mut()
    }

    /// Run every tick up to and including `until_ms`.
    pub fn advance_to(&mut self, until_ms: u64) {
        while self.now_ms <= until_ms {
            self.module.tick(self.now_ms, &mut self.sink);
            self.now_ms += TICK_MS;
        }
    }

    /// Like `advance_to`, applying due script steps ahead of each tick.
    pub fn play(&mut self, script: &mut ScenarioScript, until_ms: u64) {
        while self.now_ms <= until_ms {
            for step in script.take_due(self.now_ms) {
                apply(self.module.controller_mut(), step.action);
            }
            self.module.tick(self.now_ms, &mut self.sink);
            self.now_ms += TICK_MS;
        }
    }
}

fn apply(controller: &mut ActuatorController<SimulationDriver>, action: ScenarioAction) {
    match action {
        ScenarioAction::SetPedal(fraction) => controller.driver_mut().set_pedal(fraction),
        ScenarioAction::InjectFault(fault) => controller.driver_mut().inject_fault(fault),
        ScenarioAction::Command(position) => {
            controller.apply_command(position);
        }
        // Rejections are part of what the scenarios exercise.
        ScenarioAction::Enable => {
            let _ = controller.request_enable();
        }
        ScenarioAction::Disable => controller.request_disable(),
        ScenarioAction::ClearFaults => {
            let _ = controller.request_fault_clear(FaultFlags::all());
        }
    }
}
