//! Simulated redundant pedal position sensor.
//!
//! Both channels are linear in pedal travel, with the high channel at twice
//! the low channel:
//!
//! ```text
//! low  = rest + fraction × span
//! high = 2 × low
//! ```

use dbw_common::actuator::profile::ActuatorKind;
use dbw_common::actuator::signal::SensorReading;

/// Injectable sensor fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorFault {
    /// Healthy sensor.
    #[default]
    None,
    /// Low channel pin open; pulled to ground, reads 0.
    Disconnected,
    /// High channel drifts away from twice the low channel.
    Disagreement,
    /// ADC read itself fails.
    Unavailable,
}

/// Offset added to the high channel under `SensorFault::Disagreement` [ADC counts].
const DISAGREEMENT_OFFSET: u16 = 800;

/// Linear pedal-travel to ADC model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PedalModel {
    /// Low channel at rest [ADC counts].
    pub rest: f32,
    /// Low channel travel from rest to floor [ADC counts].
    pub span: f32,
}

impl PedalModel {
    /// Accelerator pedal: low 300 → 1500.
    pub const fn throttle() -> Self {
        Self {
            rest: 300.0,
            span: 1200.0,
        }
    }

    /// Brake pedal: low 150 → 950.
    pub const fn brake() -> Self {
        Self {
            rest: 150.0,
            span: 800.0,
        }
    }

    /// Model for `kind`.
    pub const fn for_kind(kind: ActuatorKind) -> Self {
        match kind {
            ActuatorKind::Throttle => Self::throttle(),
            ActuatorKind::Brake => Self::brake(),
        }
    }

    /// Healthy reading at `fraction` of full travel (clamped to [0, 1]).
    pub fn reading(&self, fraction: f32) -> SensorReading {
        let low = self.rest + fraction.clamp(0.0, 1.0) * self.span;
        SensorReading::new(low as u16, (2.0 * low) as u16)
    }

    /// Reading with `fault` applied. `None` for `SensorFault::Unavailable`.
    pub fn faulted_reading(&self, fraction: f32, fault: SensorFault) -> Option<SensorReading> {
        let healthy = self.reading(fraction);
        match fault {
            SensorFault::None => Some(healthy),
            SensorFault::Disconnected => Some(SensorReading::new(0, healthy.high)),
            SensorFault::Disagreement => Some(SensorReading::new(
                healthy.low,
                healthy.high.saturating_add(DISAGREEMENT_OFFSET),
            )),
            SensorFault::Unavailable => None,
        }
    }
}
