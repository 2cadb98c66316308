//! Hysteresis tilt classifier
//!
//! The phone is held landscape against the forehead with the screen facing
//! out, so gravity sits almost entirely on the x/y plane and `z` stays near
//! zero. Tipping the screen toward the floor drives `z` positive, toward the
//! ceiling drives it negative.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_RESET_THRESHOLD, DEFAULT_TRIGGER_THRESHOLD};

/// Raw accelerometer reading in units of g
pub type TiltSample = Vec3;

/// Discrete tilt position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TiltState {
    /// Held level against the forehead
    #[default]
    Neutral,
    /// Screen tipped toward the ceiling (pass)
    Up,
    /// Screen tipped toward the floor (correct)
    Down,
}

impl TiltState {
    pub fn is_tilted(&self) -> bool {
        !matches!(self, TiltState::Neutral)
    }
}

/// Advance the tilt state machine by one `z` reading.
///
/// Leaving `Neutral` requires `|z|` to pass `trigger`; returning to `Neutral`
/// requires `|z|` to fall under `reset`. Anything in between holds the
/// current state, which keeps a trembling hand from chattering across one
/// threshold.
pub fn classify(previous: TiltState, z: f32, trigger: f32, reset: f32) -> TiltState {
    match previous {
        TiltState::Neutral => {
            if z < -trigger {
                TiltState::Up
            } else if z > trigger {
                TiltState::Down
            } else {
                TiltState::Neutral
            }
        }
        TiltState::Up | TiltState::Down => {
            // NaN compares false here and holds the current state
            if z.abs() < reset {
                TiltState::Neutral
            } else {
                previous
            }
        }
    }
}

/// Stateful wrapper around [`classify`] fed once per sensor sample
#[derive(Debug, Clone)]
pub struct TiltClassifier {
    state: TiltState,
    trigger: f32,
    reset: f32,
    /// Last sample seen, kept for debug overlays
    last_sample: TiltSample,
}

impl Default for TiltClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_THRESHOLD, DEFAULT_RESET_THRESHOLD)
    }
}

impl TiltClassifier {
    /// Thresholds are assumed valid (`0 < reset < trigger < 1`); see
    /// `SessionConfig::validate`.
    pub fn new(trigger: f32, reset: f32) -> Self {
        Self {
            state: TiltState::Neutral,
            trigger,
            reset,
            last_sample: Vec3::ZERO,
        }
    }

    /// Feed one sample and return the resulting state
    pub fn update(&mut self, sample: TiltSample) -> TiltState {
        self.last_sample = sample;
        self.state = classify(self.state, sample.z, self.trigger, self.reset);
        self.state
    }

    pub fn state(&self) -> TiltState {
        self.state
    }

    pub fn last_sample(&self) -> TiltSample {
        self.last_sample
    }

    pub fn thresholds(&self) -> (f32, f32) {
        (self.trigger, self.reset)
    }

    /// Return to `Neutral` (new round)
    pub fn reset(&mut self) {
        self.state = TiltState::Neutral;
        self.last_sample = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TRIGGER: f32 = 0.65;
    const RESET: f32 = 0.35;

    #[test]
    fn test_neutral_to_tilted() {
        assert_eq!(classify(TiltState::Neutral, 0.9, TRIGGER, RESET), TiltState::Down);
        assert_eq!(classify(TiltState::Neutral, -0.9, TRIGGER, RESET), TiltState::Up);
        assert_eq!(classify(TiltState::Neutral, 0.5, TRIGGER, RESET), TiltState::Neutral);
        // Exactly on the threshold does not trigger
        assert_eq!(classify(TiltState::Neutral, TRIGGER, TRIGGER, RESET), TiltState::Neutral);
    }

    #[test]
    fn test_dead_zone_holds() {
        assert_eq!(classify(TiltState::Down, 0.5, TRIGGER, RESET), TiltState::Down);
        assert_eq!(classify(TiltState::Up, -0.5, TRIGGER, RESET), TiltState::Up);
        // Swinging straight through to the other side still holds
        assert_eq!(classify(TiltState::Down, -0.9, TRIGGER, RESET), TiltState::Down);
        assert_eq!(classify(TiltState::Up, 0.9, TRIGGER, RESET), TiltState::Up);
    }

    #[test]
    fn test_reset_to_neutral() {
        assert_eq!(classify(TiltState::Down, 0.2, TRIGGER, RESET), TiltState::Neutral);
        assert_eq!(classify(TiltState::Up, -0.1, TRIGGER, RESET), TiltState::Neutral);
    }

    #[test]
    fn test_classifier_only_reads_z() {
        let mut classifier = TiltClassifier::default();
        assert_eq!(classifier.update(Vec3::new(-1.0, 0.9, 0.0)), TiltState::Neutral);
        assert_eq!(classifier.update(Vec3::new(0.0, 0.0, 0.8)), TiltState::Down);
        assert_eq!(classifier.last_sample().z, 0.8);

        classifier.reset();
        assert_eq!(classifier.state(), TiltState::Neutral);
    }

    #[test]
    fn test_trembling_hand_near_trigger() {
        let mut classifier = TiltClassifier::default();
        let trace = [0.66, 0.62, 0.67, 0.60, 0.68, 0.64];
        let states: Vec<TiltState> = trace
            .iter()
            .map(|&z| classifier.update(Vec3::new(0.0, 0.0, z)))
            .collect();
        assert!(states.iter().all(|s| *s == TiltState::Down));
    }

    proptest! {
        #[test]
        fn prop_no_direct_flip(zs in prop::collection::vec(-1.5f32..1.5, 1..200)) {
            let mut prev = TiltState::Neutral;
            for z in zs {
                let next = classify(prev, z, TRIGGER, RESET);
                if prev.is_tilted() && next.is_tilted() {
                    prop_assert_eq!(prev, next);
                }
                prev = next;
            }
        }

        #[test]
        fn prop_transitions_respect_thresholds(
            prev_idx in 0usize..3,
            z in -1.5f32..1.5,
        ) {
            let prev = [TiltState::Neutral, TiltState::Up, TiltState::Down][prev_idx];
            let next = classify(prev, z, TRIGGER, RESET);
            if prev == TiltState::Neutral && next != TiltState::Neutral {
                prop_assert!(z.abs() > TRIGGER);
            }
            if prev.is_tilted() && next == TiltState::Neutral {
                prop_assert!(z.abs() < RESET);
            }
        }
    }
}
