//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `ActuatorDriver` trait with a
//! software pedal sensor, a spoof DAC and the relay that selects between the
//! operator's wired sensor and the DAC.

use dbw_common::actuator::profile::ActuatorKind;
use dbw_common::actuator::signal::{ActuatorSignal, SensorReading, SpoofSignal};
use dbw_common::hal::driver::{ActuatorDriver, DriverDiagnostics, HalError};
use tracing::{debug, info};

use super::pedal::{PedalModel, SensorFault};

/// Simulation driver implementing the ActuatorDriver trait.
pub struct SimulationDriver {
    /// Driver name
    name: &'static str,
    /// Driver version
    version: &'static str,
    /// Which pedal is simulated
    kind: ActuatorKind,
    /// Pedal-to-ADC model
    model: PedalModel,
    /// Pedal travel in [0, 1]
    pedal: f32,
    /// Active injected fault
    fault: SensorFault,
    /// Relay position (true = DAC drives the vehicle)
    relay_engaged: bool,
    /// Last signal written
    last_signal: ActuatorSignal,
    /// Read/write counters
    diagnostics: DriverDiagnostics,
}

impl SimulationDriver {
    /// Create a driver with the pedal at rest and no fault.
    pub fn new(kind: ActuatorKind) -> Self {
        info!(%kind, "Simulation driver created");
        Self {
            name: "simulation",
            version: env!("CARGO_PKG_VERSION"),
            kind,
            model: PedalModel::for_kind(kind),
            pedal: 0.0,
            fault: SensorFault::None,
            relay_engaged: false,
            last_signal: ActuatorSignal::PassThrough,
            diagnostics: DriverDiagnostics::default(),
        }
    }

    /// Simulated pedal kind.
    pub fn kind(&self) -> ActuatorKind {
        self.kind
    }

    /// Move the simulated pedal to `fraction` of full travel.
    pub fn set_pedal(&mut self, fraction: f32) {
        debug!(kind = %self.kind, fraction, "Pedal moved");
        self.pedal = fraction.clamp(0.0, 1.0);
    }

    /// Current pedal travel.
    pub fn pedal(&self) -> f32 {
        self.pedal
    }

    /// Inject (or with `SensorFault::None` remove) a sensor fault.
    pub fn inject_fault(&mut self, fault: SensorFault) {
        if fault != self.fault {
            info!(kind = %self.kind, ?fault, "Sensor fault injected");
        }
        self.fault = fault;
    }

    /// Active fault.
    pub fn fault(&self) -> SensorFault {
        self.fault
    }

    /// Relay position: true when the DAC drives the vehicle.
    pub fn relay_engaged(&self) -> bool {
        self.relay_engaged
    }

    /// Last signal written.
    pub fn last_signal(&self) -> ActuatorSignal {
        self.last_signal
    }

    /// DAC levels currently driven, `None` while the relay is released.
    pub fn dac_output(&self) -> Option<SpoofSignal> {
        match self.last_signal {
            ActuatorSignal::Spoof(s) => Some(s),
            ActuatorSignal::PassThrough => None,
        }
    }
}

impl ActuatorDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn read_sensor_channels(&mut self) -> Result<SensorReading, HalError> {
        self.diagnostics.reads += 1;
        match self.model.faulted_reading(self.pedal, self.fault) {
            Some(reading) => Ok(reading),
            None => {
                self.diagnostics.read_failures += 1;
                Err(HalError::SensorUnavailable(format!(
                    "{} pedal ADC not responding",
                    self.kind
                )))
            }
        }
    }

    fn write_actuator_signal(&mut self, signal: ActuatorSignal) {
        self.diagnostics.writes += 1;
        let engaged = signal.is_spoofing();
        if engaged != self.relay_engaged {
            debug!(kind = %self.kind, engaged, "Relay switched");
        }
        self.relay_engaged = engaged;
        self.last_signal = signal;
    }

    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        Some(self.diagnostics.clone())
    }
}
