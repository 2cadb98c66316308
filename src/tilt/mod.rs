//! Tilt gesture recognition
//!
//! Turns the continuous accelerometer feed into discrete game actions:
//! - `classifier`: Schmitt-trigger hysteresis over the gravity axis
//! - `gate`: Edge-triggered latch so one physical tilt scores once

pub mod classifier;
pub mod gate;

pub use classifier::{TiltClassifier, TiltSample, TiltState, classify};
pub use gate::{Action, ActionGate};
