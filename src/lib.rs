//! Tilt Charades - session engine for a tilt-to-answer party game
//!
//! Core modules:
//! - `tilt`: Accelerometer hysteresis classifier and the one-action-per-gesture gate
//! - `round`: Round timer, shuffled word queue, timestamped outcome history
//! - `session`: Session state machine and its recorder/sensor collaborators
//! - `clock`: Monotonic time source (system or manually driven)
//! - `settings`: Persisted player preferences
//! - `results`: Completion payload and playback captions

pub mod clock;
pub mod results;
pub mod round;
pub mod session;
pub mod settings;
pub mod tilt;

pub use clock::{Clock, ManualClock, SystemClock};
pub use results::RoundResult;
pub use round::{HistoryEntry, HistoryLog, Outcome, Prompt, RoundTimer, WordQueue};
pub use session::{
    ConfigError, FinishReason, GameStatus, Recorder, RecordingHandle, SensorFeed, SessionConfig,
    SessionCoordinator, SessionEvent,
};
pub use settings::{Sensitivity, Settings};
pub use tilt::{Action, ActionGate, TiltClassifier, TiltSample, TiltState, classify};

/// Game configuration constants
pub mod consts {
    /// Default tilt trigger threshold (fraction of 1g on the z axis)
    pub const DEFAULT_TRIGGER_THRESHOLD: f32 = 0.65;
    /// Default tilt reset threshold (must be below the trigger threshold)
    pub const DEFAULT_RESET_THRESHOLD: f32 = 0.35;
    /// Default accelerometer sample interval
    pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 100;

    /// Default round length
    pub const DEFAULT_ROUND_SECS: u32 = 90;
    /// Round timer tick period
    pub const TIMER_TICK_MS: u64 = 1000;

    /// How long a finished round waits for the recorder to hand back its file
    pub const RECORDER_FAILSAFE_MS: u64 = 4000;
    /// Upper bound accepted for a configured failsafe
    pub const MAX_RECORDER_FAILSAFE_MS: u64 = 60_000;

    /// Music volume multiplier while a round is playing
    pub const PLAY_VOLUME_MODIFIER: f32 = 0.2;
    /// Music volume multiplier outside of play
    pub const IDLE_VOLUME_MODIFIER: f32 = 1.0;
    pub const DEFAULT_MUSIC_VOLUME: f32 = 0.5;
    pub const DEFAULT_SFX_VOLUME: f32 = 1.0;

    /// Prompts used when the category pool is empty
    pub const FALLBACK_PROMPTS: [&str; 2] = ["Error", "No Data"];
}
