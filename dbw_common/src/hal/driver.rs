//! HAL driver trait and error types.
//!
//! This module defines:
//! - `ActuatorDriver` trait - Interface for pluggable pedal sensor / spoof DAC backends
//! - `HalError` enum - Error types for HAL operations
//! - `DriverDiagnostics` struct - Optional driver diagnostics

use thiserror::Error;

use crate::actuator::signal::{ActuatorSignal, SensorReading};

/// Error types for HAL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Hardware communication error
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),

    /// Sensor could not be sampled at all
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),
}

/// Optional driver diagnostics.
#[derive(Debug, Clone, Default)]
pub struct DriverDiagnostics {
    /// Number of sensor reads attempted
    pub reads: u64,
    /// Number of sensor reads that failed
    pub read_failures: u64,
    /// Number of actuator writes
    pub writes: u64,
}

/// Trait defining the interface for actuator module drivers.
///
/// The control core reaches the redundant pedal sensor and the spoof output
/// stage only through this trait, enabling real hardware backends and a
/// deterministic simulation for tests.
///
/// # Timing Contracts
///
/// | Operation | Max Duration | RT Constraint |
/// |-----------|--------------|---------------|
/// | `read_sensor_channels()` | one check period | **HARD** |
/// | `write_actuator_signal()` | one update period | **HARD** |
pub trait ActuatorDriver {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Sample both sensor channels.
    ///
    /// An `Err` means the read capability itself failed (hardware fault),
    /// which is distinct from returning an out-of-range reading.
    fn read_sensor_channels(&mut self) -> Result<SensorReading, HalError>;

    /// Drive the spoof output stage.
    ///
    /// `PassThrough` releases the relay so the operator's own sensor reaches
    /// the vehicle. Assumed infallible at this layer.
    fn write_actuator_signal(&mut self, signal: ActuatorSignal);

    /// Get driver-specific diagnostics.
    /// Default: None
    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        None
    }
}

impl<D: ActuatorDriver + ?Sized> ActuatorDriver for &mut D {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn version(&self) -> &'static str {
        (**self).version()
    }

    fn read_sensor_channels(&mut self) -> Result<SensorReading, HalError> {
        (**self).read_sensor_channels()
    }

    fn write_actuator_signal(&mut self, signal: ActuatorSignal) {
        (**self).write_actuator_signal(signal)
    }

    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        (**self).diagnostics()
    }
}
