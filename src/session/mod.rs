//! Session state machine
//!
//! `Ready -> Playing -> Finished`. The coordinator is single-threaded and
//! event-driven: each input (sensor sample, clock poll, recorder callback,
//! app state change, exit) is one `&mut self` call that runs to completion.

pub mod coordinator;
pub mod recorder;
pub mod sensor;
pub mod state;

pub use coordinator::SessionCoordinator;
pub use recorder::{
    CaptureDevice, NoRecorder, QueuedRecorder, Recorder, RecorderError, RecordingHandle,
};
pub use sensor::{PushFeed, SensorError, SensorFeed};
pub use state::{
    AppState, ConfigError, Cue, Feedback, FinishReason, GameStatus, Haptic, Session, SessionConfig,
    SessionEvent,
};
