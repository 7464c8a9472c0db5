//! Safety module root.
//!
//! Redundant sensor validation with the consecutive-fault counter, and
//! operator override detection on the smoothed pedal position.

pub mod override_detector;
pub mod validator;
