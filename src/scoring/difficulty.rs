//! Per-word and per-text difficulty
//!
//! Difficulty runs from 0 (easy) to 1 (hard). A word starts at 1.0 and is made
//! easier either by the user's known-word probability (personalized mode) or by how
//! frequent the word is.

use super::median::{mean, upper_biased_index_select};
use crate::language::Language;
use crate::probabilities::KnownProbabilities;
use crate::ranks::RankLookup;
use crate::tokenizer::split_words;
use serde::{Deserialize, Serialize};

/// Difficulty of a text with no words
pub const EMPTY_TEXT_DIFFICULTY: f64 = 1.0;

/// Validated knobs for one difficulty request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyOptions {
    rank_boundary: f64,
    personalized: bool,
}

impl DifficultyOptions {
    /// `rank_boundary` is clamped into `[1, ceiling]`; a non-finite boundary falls
    /// back to the ceiling.
    pub fn new(rank_boundary: f64, personalized: bool, ceiling: u32) -> Self {
        let ceiling = f64::from(ceiling.max(1));
        let rank_boundary = if rank_boundary.is_finite() {
            rank_boundary.clamp(1.0, ceiling)
        } else {
            ceiling
        };
        Self {
            rank_boundary,
            personalized,
        }
    }

    pub fn rank_boundary(&self) -> f64 {
        self.rank_boundary
    }

    pub fn personalized(&self) -> bool {
        self.personalized
    }
}

impl Default for DifficultyOptions {
    fn default() -> Self {
        Self::new(10_000.0, true, 10_000)
    }
}

/// Median and average difficulty of one text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextDifficulty {
    pub median: f64,
    pub average: f64,
}

/// How frequent a ranked word is relative to the boundary: 1.0 for rank 1,
/// approaching 0 at the boundary.
fn frequency_score(rank: u32, rank_boundary: f64) -> f64 {
    (rank_boundary - (f64::from(rank) - 1.0)) / rank_boundary
}

/// Difficulty of a single word.
///
/// Unranked words stay at 1.0 even when a known probability exists. For ranked
/// words a known probability (personalized mode) wins over frequency; otherwise
/// words ranked within the boundary are discounted by their frequency score.
pub fn word_difficulty(
    word: &str,
    language: &Language,
    ranks: &dyn RankLookup,
    options: &DifficultyOptions,
    known: &KnownProbabilities,
) -> f64 {
    let mut difficulty = 1.0;
    let Some(rank) = ranks.rank(word, language) else {
        return difficulty;
    };

    match known.get(word) {
        Some(p) if options.personalized => difficulty -= p,
        _ => {
            if f64::from(rank) <= options.rank_boundary {
                difficulty -= frequency_score(rank, options.rank_boundary);
            }
        }
    }
    difficulty
}

/// Score a whole text
pub fn score_difficulty(
    text: &str,
    language: &Language,
    ranks: &dyn RankLookup,
    options: &DifficultyOptions,
    known: &KnownProbabilities,
) -> TextDifficulty {
    let words = split_words(text);
    let difficulties: Vec<f64> = words
        .iter()
        .map(|w| word_difficulty(w, language, ranks, options, known))
        .collect();

    match (upper_biased_index_select(&difficulties), mean(&difficulties)) {
        (Some(median), Some(average)) => TextDifficulty { median, average },
        _ => TextDifficulty {
            median: EMPTY_TEXT_DIFFICULTY,
            average: EMPTY_TEXT_DIFFICULTY,
        },
    }
}
