//! Raw sensor readings and conditioned actuator signals.

use serde::{Deserialize, Serialize};

/// One redundant read of the pedal position sensor [ADC counts].
///
/// Produced every validation cycle and never kept past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    /// Low channel (nominally half of `high`).
    pub low: u16,
    /// High channel.
    pub high: u16,
}

impl SensorReading {
    /// Create a reading from both channels.
    #[inline]
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Mean of both channels, the value the override filter tracks.
    #[inline]
    pub fn average(&self) -> f32 {
        (self.low as f32 + self.high as f32) / 2.0
    }

    /// True if either pin reads zero (tied to ground when disconnected).
    #[inline]
    pub const fn has_grounded_channel(&self) -> bool {
        self.low == 0 || self.high == 0
    }
}

/// Conditioned spoof levels [DAC steps].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpoofSignal {
    /// Low spoof channel.
    pub low: u16,
    /// High spoof channel.
    pub high: u16,
}

/// What the actuator output stage is told to do in one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ActuatorSignal {
    /// Relay released: the operator's wired sensor drives the vehicle.
    #[default]
    PassThrough,
    /// Relay engaged: the DAC drives the given spoof levels.
    Spoof(SpoofSignal),
}

impl ActuatorSignal {
    /// Whether the spoof path is engaged.
    #[inline]
    pub const fn is_spoofing(&self) -> bool {
        matches!(self, Self::Spoof(_))
    }
}
