//! One-action-per-gesture latch
//!
//! Holding the phone tilted must not keep scoring. After an action fires
//! the gate closes and only reopens once the classifier reports `Neutral`.

use serde::{Deserialize, Serialize};

use super::classifier::TiltState;

/// A scoring action produced by a completed tilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Tilted down (guessed) vs up (passed)
    pub correct: bool,
}

/// Edge-triggered gate between the classifier and the scorer
#[derive(Debug, Clone)]
pub struct ActionGate {
    ready_for_action: bool,
    enabled: bool,
}

impl Default for ActionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionGate {
    /// A new gate is armed but disabled until the round starts
    pub fn new() -> Self {
        Self {
            ready_for_action: true,
            enabled: false,
        }
    }

    /// Enable or disable the gate. Either way it is re-armed, so a fresh
    /// round always starts ready.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.ready_for_action = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_ready(&self) -> bool {
        self.ready_for_action
    }

    /// Process the classifier output for one sample
    pub fn on_tilt_changed(&mut self, tilt: TiltState) -> Option<Action> {
        if !self.enabled {
            return None;
        }

        if self.ready_for_action {
            let action = match tilt {
                TiltState::Up => Action { correct: false },
                TiltState::Down => Action { correct: true },
                TiltState::Neutral => return None,
            };
            self.ready_for_action = false;
            Some(action)
        } else {
            if tilt == TiltState::Neutral {
                self.ready_for_action = true;
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilt::classifier::classify;
    use proptest::prelude::*;

    fn armed() -> ActionGate {
        let mut gate = ActionGate::new();
        gate.set_enabled(true);
        gate
    }

    #[test]
    fn test_down_is_correct_up_is_pass() {
        let mut gate = armed();
        assert_eq!(gate.on_tilt_changed(TiltState::Down), Some(Action { correct: true }));
        assert!(!gate.is_ready());
        assert_eq!(gate.on_tilt_changed(TiltState::Neutral), None);
        assert!(gate.is_ready());
        assert_eq!(gate.on_tilt_changed(TiltState::Up), Some(Action { correct: false }));
    }

    #[test]
    fn test_held_tilt_scores_once() {
        let mut gate = armed();
        assert!(gate.on_tilt_changed(TiltState::Down).is_some());
        for _ in 0..20 {
            assert_eq!(gate.on_tilt_changed(TiltState::Down), None);
        }
        // Flipping to the other side without levelling still counts for nothing
        assert_eq!(gate.on_tilt_changed(TiltState::Up), None);
    }

    #[test]
    fn test_disabled_gate_is_silent_and_rearms() {
        let mut gate = ActionGate::new();
        assert_eq!(gate.on_tilt_changed(TiltState::Down), None);

        gate.set_enabled(true);
        assert!(gate.on_tilt_changed(TiltState::Down).is_some());
        assert!(!gate.is_ready());

        gate.set_enabled(false);
        assert!(gate.is_ready());
        gate.set_enabled(true);
        assert!(gate.on_tilt_changed(TiltState::Up).is_some());
    }

    proptest! {
        #[test]
        fn prop_one_action_per_gesture(
            peak in 0.66f32..1.5,
            hold in 1usize..50,
            down in any::<bool>(),
        ) {
            let (trigger, reset) = (0.65, 0.35);
            let sign = if down { 1.0 } else { -1.0 };
            let mut trace = vec![0.0f32; 3];
            trace.extend(std::iter::repeat_n(sign * peak, hold));
            trace.extend([sign * 0.5, 0.0, 0.0]);

            let mut gate = armed();
            let mut state = TiltState::Neutral;
            let mut actions = Vec::new();
            for z in trace {
                state = classify(state, z, trigger, reset);
                if let Some(action) = gate.on_tilt_changed(state) {
                    actions.push(action);
                }
            }

            prop_assert_eq!(actions, vec![Action { correct: down }]);
            prop_assert!(gate.is_ready());
        }
    }
}
