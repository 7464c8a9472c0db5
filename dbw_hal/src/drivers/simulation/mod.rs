//! Simulation driver module.
//!
//! Software stand-in for the pedal sensor ADC, the spoof DAC and the signal
//! relay, with fault injection and timed scenarios for the module host.

mod driver;
mod pedal;
mod scenario;

pub use driver::SimulationDriver;
pub use pedal::{PedalModel, SensorFault};
pub use scenario::{ScenarioAction, ScenarioScript, ScenarioStep};
