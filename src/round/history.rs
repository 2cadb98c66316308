//! Timestamped record of which prompt was on screen when
//!
//! Used after the round to caption the recording: the entry active at a
//! playback offset is the word the player was acting out at that moment.

use serde::{Deserialize, Serialize};

/// What happened to a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Still on screen (or on screen when the round ended)
    #[default]
    Pending,
    Correct,
    Pass,
}

impl Outcome {
    pub fn from_correct(correct: bool) -> Self {
        if correct { Outcome::Correct } else { Outcome::Pass }
    }
}

/// One prompt's time on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub word: String,
    /// Offset from round start
    pub timestamp_ms: u64,
    pub result: Outcome,
}

impl HistoryEntry {
    pub fn pending(word: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            word: word.into(),
            timestamp_ms,
            result: Outcome::Pending,
        }
    }
}

/// Append-only list of history entries in chronological order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Timestamps must not go backwards.
    pub fn append(&mut self, entry: HistoryEntry) {
        debug_assert!(
            self.entries
                .last()
                .is_none_or(|last| last.timestamp_ms <= entry.timestamp_ms),
            "history timestamps must be non-decreasing"
        );
        self.entries.push(entry);
    }

    /// Settle the most recent entry. Returns false if the log is empty.
    pub fn finalize_last(&mut self, result: Outcome) -> bool {
        match self.entries.last_mut() {
            Some(entry) => {
                entry.result = result;
                true
            }
            None => false,
        }
    }

    /// The last entry whose timestamp is at or before `offset_ms`, or the
    /// first entry if the offset precedes them all.
    pub fn entry_active_at(&self, offset_ms: u64) -> Option<&HistoryEntry> {
        let after = self
            .entries
            .partition_point(|e| e.timestamp_ms <= offset_ms);
        self.entries.get(after.saturating_sub(1))
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
