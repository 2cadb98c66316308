//! Round results
//!
//! The payload handed to the results and video review stages when a round
//! completes. Serialized as camelCase JSON for the review screen.

use serde::{Deserialize, Serialize};

use crate::round::{HistoryEntry, HistoryLog, Outcome};
use crate::session::{FinishReason, RecordingHandle};

/// Final outcome of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    /// Correct answers
    pub score: u32,
    /// Answered prompts (correct + passed)
    pub total: u32,
    pub history: HistoryLog,
    /// Recording of the round, if the recorder delivered one in time
    pub recording: Option<RecordingHandle>,
    pub finish_reason: FinishReason,
    /// The category had no words and placeholders were played
    #[serde(default)]
    pub used_fallback_pool: bool,
}

/// Overlay text for one moment of the recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caption<'a> {
    pub word: &'a str,
    pub result: Outcome,
}

impl RoundResult {
    /// Fraction of answered prompts that were correct
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f32 / self.total as f32
        }
    }

    pub fn correct_words(&self) -> impl Iterator<Item = &str> {
        self.words_with(Outcome::Correct)
    }

    pub fn passed_words(&self) -> impl Iterator<Item = &str> {
        self.words_with(Outcome::Pass)
    }

    fn words_with(&self, outcome: Outcome) -> impl Iterator<Item = &str> {
        self.history
            .iter()
            .filter(move |e| e.result == outcome)
            .map(|e| e.word.as_str())
    }

    /// Caption for a playback position in the recording
    pub fn caption_at(&self, position_ms: u64) -> Option<Caption<'_>> {
        self.history
            .entry_active_at(position_ms)
            .map(|HistoryEntry { word, result, .. }| Caption {
                word: word.as_str(),
                result: *result,
            })
    }

    pub fn has_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// "score/total" as shown on the results screen
    pub fn score_line(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> RoundResult {
        let mut history = HistoryLog::new();
        for (word, at, result) in [
            ("Arepa", 0, Outcome::Correct),
            ("Tinto", 3_000, Outcome::Pass),
            ("Chiva", 7_500, Outcome::Correct),
            ("Ruana", 12_000, Outcome::Pending),
        ] {
            history.append(HistoryEntry {
                word: word.to_string(),
                timestamp_ms: at,
                result,
            });
        }
        RoundResult {
            score: 2,
            total: 3,
            history,
            recording: Some(RecordingHandle::new("file:///cache/round.mp4")),
            finish_reason: FinishReason::TimeUp,
            used_fallback_pool: false,
        }
    }

    #[test]
    fn test_word_lists_and_accuracy() {
        let result = sample_result();
        assert_eq!(result.correct_words().collect::<Vec<_>>(), vec!["Arepa", "Chiva"]);
        assert_eq!(result.passed_words().collect::<Vec<_>>(), vec!["Tinto"]);
        assert!((result.accuracy() - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(result.score_line(), "2/3");
    }

    #[test]
    fn test_caption_at() {
        let result = sample_result();
        let caption = result.caption_at(5_000).unwrap();
        assert_eq!(caption.word, "Tinto");
        assert_eq!(caption.result, Outcome::Pass);
        assert_eq!(result.caption_at(90_000).unwrap().result, Outcome::Pending);
    }

    #[test]
    fn test_empty_round_accuracy() {
        let result = RoundResult {
            score: 0,
            total: 0,
            history: HistoryLog::new(),
            recording: None,
            finish_reason: FinishReason::Exited,
            used_fallback_pool: true,
        };
        assert_eq!(result.accuracy(), 0.0);
        assert!(result.caption_at(0).is_none());
    }

    #[test]
    fn test_json_for_review_stage() {
        let json = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(json["score"], 2);
        assert_eq!(json["recording"], "file:///cache/round.mp4");
        assert_eq!(json["finishReason"], "timeUp");
        assert_eq!(json["history"][0]["word"], "Arepa");
    }
}
