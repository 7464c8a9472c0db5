//! Timed stimulus scripts for the simulation host.
//!
//! A script is a list of actions keyed by the millisecond at which they
//! fire. The host polls `take_due` once per tick and applies the returned
//! actions to the driver (pedal, faults) and to the controller (commands,
//! enable/disable, fault clear).

/// One scripted action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioAction {
    /// Move the pedal to a fraction of full travel.
    SetPedal(f32),
    /// Inject or remove a sensor fault.
    InjectFault(super::SensorFault),
    /// Upstream position command (10-bit).
    Command(u16),
    /// Enable request.
    Enable,
    /// Disable request.
    Disable,
    /// Fault clear request for all flags.
    ClearFaults,
}

/// Action with its firing time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioStep {
    /// Firing time since start [ms].
    pub at_ms: u64,
    /// Action to apply.
    pub action: ScenarioAction,
}

/// Ordered stimulus script.
#[derive(Debug, Clone)]
pub struct ScenarioScript {
    name: &'static str,
    steps: Vec<ScenarioStep>,
    cursor: usize,
}

impl ScenarioScript {
    /// Empty script.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
            cursor: 0,
        }
    }

    /// Add a step. Steps with equal times keep insertion order.
    pub fn at(mut self, at_ms: u64, action: ScenarioAction) -> Self {
        let pos = self.steps.partition_point(|s| s.at_ms <= at_ms);
        self.steps.insert(pos, ScenarioStep { at_ms, action });
        self
    }

    /// Script name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All steps in firing order.
    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    /// Time of the last step, 0 for an empty script.
    pub fn end_ms(&self) -> u64 {
        self.steps.last().map_or(0, |s| s.at_ms)
    }

    /// Every step has fired.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Steps due at `now_ms` that have not fired yet.
    pub fn take_due(&mut self, now_ms: u64) -> &[ScenarioStep] {
        let start = self.cursor;
        let pending = &self.steps[start..];
        let count = pending.partition_point(|s| s.at_ms <= now_ms);
        self.cursor += count;
        &self.steps[start..self.cursor]
    }

    /// Enable, follow a command ramp, disable.
    pub fn nominal() -> Self {
        use ScenarioAction::*;
        Self::new("nominal")
            .at(0, SetPedal(0.0))
            .at(100, Command(256))
            .at(100, Enable)
            .at(500, Command(512))
            .at(1000, Command(768))
            .at(1500, Command(512))
            .at(2500, Disable)
    }

    /// Operator presses the pedal while enabled, releases, acknowledges and
    /// re-enables.
    pub fn operator_override() -> Self {
        use ScenarioAction::*;
        Self::new("override")
            .at(0, SetPedal(0.0))
            .at(100, Command(400))
            .at(100, Enable)
            .at(800, SetPedal(0.8))
            .at(1300, SetPedal(0.0))
            .at(1800, Enable)
            .at(2000, ClearFaults)
            .at(2100, Enable)
            .at(2500, Disable)
    }

    /// Sensor pin disconnects while enabled, reconnects, acknowledge and
    /// re-enable.
    pub fn sensor_fault() -> Self {
        use super::SensorFault;
        use ScenarioAction::*;
        Self::new("sensor-fault")
            .at(0, SetPedal(0.0))
            .at(100, Command(512))
            .at(100, Enable)
            .at(600, InjectFault(SensorFault::Disconnected))
            .at(2000, InjectFault(SensorFault::None))
            .at(2400, ClearFaults)
            .at(2500, Enable)
            .at(2900, Disable)
    }
}
