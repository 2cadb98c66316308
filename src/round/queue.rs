//! Shuffled prompt queue for a round

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::FALLBACK_PROMPTS;

/// Structured prompt card with optional hint text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Acting hint for the mime round
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

/// A single thing to act out. In JSON either a bare string or a card object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    Plain(String),
    Card(Card),
}

impl Prompt {
    /// The word shown on screen and recorded in history
    pub fn word(&self) -> &str {
        match self {
            Prompt::Plain(word) => word,
            Prompt::Card(card) => &card.word,
        }
    }

    pub fn card(&self) -> Option<&Card> {
        match self {
            Prompt::Plain(_) => None,
            Prompt::Card(card) => Some(card),
        }
    }
}

impl From<&str> for Prompt {
    fn from(word: &str) -> Self {
        Prompt::Plain(word.to_string())
    }
}

impl From<String> for Prompt {
    fn from(word: String) -> Self {
        Prompt::Plain(word)
    }
}

/// Fixed pool of prompts with a wrapping cursor
#[derive(Debug, Clone)]
pub struct WordQueue {
    /// Never empty once initialized
    prompts: Vec<Prompt>,
    index: usize,
    fallback: bool,
}

impl WordQueue {
    /// Shuffle a copy of `pool`. An empty pool is replaced by the fallback
    /// prompts so the round stays playable; check `is_fallback`.
    pub fn initialize<R: Rng + ?Sized>(pool: &[Prompt], rng: &mut R) -> Self {
        let fallback = pool.is_empty();
        let mut prompts: Vec<Prompt> = if fallback {
            FALLBACK_PROMPTS.iter().map(|&w| Prompt::from(w)).collect()
        } else {
            pool.to_vec()
        };

        // Fallback order is fixed
        if !fallback {
            prompts.shuffle(rng);
        }

        Self {
            prompts,
            index: 0,
            fallback,
        }
    }

    pub fn current(&self) -> &Prompt {
        &self.prompts[self.index]
    }

    /// Move to the next prompt, wrapping at the end of the pool
    pub fn advance(&mut self) -> &Prompt {
        self.index = (self.index + 1) % self.prompts.len();
        &self.prompts[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// True when the upstream pool was empty and placeholders are in use
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }
}
