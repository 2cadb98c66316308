//! Per-round building blocks
//!
//! All of these are plain owned state. Nothing here schedules work on its
//! own; the session coordinator drives them with the current clock value.

pub mod history;
pub mod queue;
pub mod timer;

pub use history::{HistoryEntry, HistoryLog, Outcome};
pub use queue::{Card, Prompt, WordQueue};
pub use timer::{RoundTimer, TimerEvent};
