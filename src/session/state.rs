//! Session state, configuration and the events it reports
//!
//! Everything a running round owns lives in [`Session`]. The coordinator is
//! the only thing that mutates it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::results::RoundResult;
use crate::round::{HistoryLog, Prompt, WordQueue};

/// Lifecycle of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the player to start
    #[default]
    Ready,
    /// Timer running, tilts score
    Playing,
    /// Terminal; a new round needs a new session
    Finished,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinishReason {
    /// The countdown reached zero
    TimeUp,
    /// The player left the round
    Exited,
    /// The app went to the background mid-round
    Backgrounded,
}

/// Foreground/background signal from the host OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

/// Sound cue requested from the audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Correct,
    Wrong,
}

/// Haptic pattern requested from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Haptic {
    Success,
    Impact,
}

/// Feedback for one scored action, already filtered by the player's
/// sound and vibration preferences
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Feedback {
    pub sound: Option<Cue>,
    /// Playback volume for `sound`
    pub volume: f32,
    pub haptic: Option<Haptic>,
}

/// Notifications for the presentation layer, drained after each input
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StatusChanged(GameStatus),
    /// One second of the round elapsed
    TimerTick { time_left: u32 },
    /// A tilt was accepted
    Scored {
        correct: bool,
        score: u32,
        answered: u32,
        /// Prompt now on screen
        next_word: String,
        feedback: Feedback,
    },
    /// Background music level, sent only when music is enabled
    MusicVolume(f32),
    Finished(FinishReason),
    /// Final payload, delivered exactly once
    Completed(RoundResult),
}

/// Invalid session configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("round duration must be at least one second")]
    ZeroDuration,
    #[error("tilt thresholds must satisfy 0 < reset ({reset}) < trigger ({trigger}) < 1")]
    InvalidThresholds { trigger: f32, reset: f32 },
    #[error("sample interval must be positive")]
    ZeroSampleInterval,
    #[error("volume {0} is outside 0.0..=1.0")]
    InvalidVolume(f32),
    #[error("recorder failsafe of {0} ms is outside 1..={max} ms", max = MAX_RECORDER_FAILSAFE_MS)]
    InvalidFailsafe(u64),
}

/// Inputs fixed at session construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Prompts for this round
    pub pool: Vec<Prompt>,
    pub duration_secs: u32,
    pub trigger_threshold: f32,
    pub reset_threshold: f32,
    /// Requested accelerometer cadence
    pub sample_interval_ms: u32,
    /// How long to wait for the recorder after time runs out
    pub failsafe_ms: u64,
    /// Whether to drive the recorder at all
    pub record_video: bool,
    pub sound_effects: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub haptics: bool,
    /// Background music is playing around the round
    pub music: bool,
    /// Music volume (0.0 - 1.0) before the play/idle multipliers
    pub music_volume: f32,
    /// Music multiplier while playing
    pub play_volume: f32,
    /// Music multiplier restored when the round ends
    pub idle_volume: f32,
    /// Shuffle seed
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pool: Vec::new(),
            duration_secs: DEFAULT_ROUND_SECS,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            reset_threshold: DEFAULT_RESET_THRESHOLD,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            failsafe_ms: RECORDER_FAILSAFE_MS,
            record_video: true,
            sound_effects: true,
            sfx_volume: DEFAULT_SFX_VOLUME,
            haptics: true,
            music: false,
            music_volume: DEFAULT_MUSIC_VOLUME,
            play_volume: PLAY_VOLUME_MODIFIER,
            idle_volume: IDLE_VOLUME_MODIFIER,
            seed: 0,
        }
    }
}

impl SessionConfig {
    /// Default configuration over the given prompts
    pub fn with_pool<P: Into<Prompt>>(pool: impl IntoIterator<Item = P>) -> Self {
        Self {
            pool: pool.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }

        let (trigger, reset) = (self.trigger_threshold, self.reset_threshold);
        // Written positively so NaN fails
        let ordered = 0.0 < reset && reset < trigger && trigger < 1.0;
        if !ordered {
            return Err(ConfigError::InvalidThresholds { trigger, reset });
        }

        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }

        if !(1..=MAX_RECORDER_FAILSAFE_MS).contains(&self.failsafe_ms) {
            return Err(ConfigError::InvalidFailsafe(self.failsafe_ms));
        }

        let volumes = [self.play_volume, self.idle_volume, self.music_volume, self.sfx_volume];
        for volume in volumes {
            if !(0.0..=1.0).contains(&volume) {
                return Err(ConfigError::InvalidVolume(volume));
            }
        }

        Ok(())
    }

    /// Feedback for an accepted action under these preferences
    pub fn feedback_for(&self, correct: bool) -> Feedback {
        let (cue, haptic) = if correct {
            (Cue::Correct, Haptic::Success)
        } else {
            (Cue::Wrong, Haptic::Impact)
        };
        Feedback {
            sound: self.sound_effects.then_some(cue),
            volume: self.sfx_volume,
            haptic: self.haptics.then_some(haptic),
        }
    }
}

/// Mutable state of one round
#[derive(Debug, Clone)]
pub struct Session {
    pub status: GameStatus,
    pub score: u32,
    pub answered_count: u32,
    pub queue: WordQueue,
    pub history: HistoryLog,
    /// Clock reading when play began
    pub start_timestamp: Option<u64>,
    pub finish_reason: Option<FinishReason>,
}

impl Session {
    pub fn new(queue: WordQueue) -> Self {
        Self {
            status: GameStatus::Ready,
            score: 0,
            answered_count: 0,
            queue,
            history: HistoryLog::new(),
            start_timestamp: None,
            finish_reason: None,
        }
    }

    /// Milliseconds since play began (0 before start)
    pub fn offset_ms(&self, now_ms: u64) -> u64 {
        self.start_timestamp
            .map(|start| now_ms.saturating_sub(start))
            .unwrap_or(0)
    }

    pub fn current_word(&self) -> &str {
        self.queue.current().word()
    }
}
