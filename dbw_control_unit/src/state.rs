//! State machine module root.
//!
//! Enabled/disabled control authority driven by `ControlEvent`s.

pub mod machine;
