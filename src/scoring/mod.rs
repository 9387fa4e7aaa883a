//! Batch text scoring
//!
//! [`Scorer`] resolves the language once per batch and then scores every text with
//! the pure functions in [`difficulty`] and [`learnability`]. Text ids are opaque:
//! they are moved from input to output untouched.

pub mod difficulty;
pub mod learnability;
pub mod median;

use crate::config::ScoringConfig;
use crate::deserializers::{de_option_bool_forgiving, de_option_f64_forgiving};
use crate::error::Result;
use crate::language::LanguageRegistry;
use crate::probabilities::KnownProbabilities;
use crate::ranks::RankLookup;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub use difficulty::{DifficultyOptions, TextDifficulty, score_difficulty, word_difficulty};
pub use learnability::{TextLearnability, score_learnability};
pub use median::upper_biased_index_select;

/// A text to score, tagged with a caller-owned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredText<I = serde_json::Value> {
    pub id: I,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyScore<I = serde_json::Value> {
    pub id: I,
    pub score_median: f64,
    pub score_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnabilityScore<I = serde_json::Value> {
    pub id: I,
    pub score: f64,
    pub count: usize,
}

/// Difficulty batch payload as hosts receive it
#[derive(Debug, Clone, Deserialize)]
pub struct DifficultyRequest<I = serde_json::Value> {
    pub texts: Vec<ScoredText<I>>,
    #[serde(default, deserialize_with = "de_option_f64_forgiving")]
    pub rank_boundary: Option<f64>,
    #[serde(default, deserialize_with = "de_option_bool_forgiving")]
    pub personalized: Option<bool>,
}

impl<I> DifficultyRequest<I> {
    /// Fill missing knobs from config and clamp the boundary to the configured ceiling
    pub fn options(&self, config: &ScoringConfig) -> DifficultyOptions {
        DifficultyOptions::new(
            self.rank_boundary.unwrap_or(config.default_rank_boundary),
            self.personalized.unwrap_or(config.default_personalized),
            config.rank_ceiling,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearnabilityRequest<I = serde_json::Value> {
    pub texts: Vec<ScoredText<I>>,
}

/// Scores text batches against one rank snapshot
#[derive(Clone)]
pub struct Scorer {
    registry: LanguageRegistry,
    ranks: Arc<dyn RankLookup>,
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(registry: LanguageRegistry, ranks: Arc<dyn RankLookup>, config: ScoringConfig) -> Self {
        Self {
            registry,
            ranks,
            config,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Median and average difficulty for every text.
    ///
    /// An unknown language fails the whole batch. `known` is only consulted when
    /// `options.personalized()` is set.
    pub fn difficulty_for_texts<I>(
        &self,
        language_code: &str,
        texts: Vec<ScoredText<I>>,
        options: &DifficultyOptions,
        known: &KnownProbabilities,
    ) -> Result<Vec<DifficultyScore<I>>> {
        let language = self.registry.resolve(language_code)?;
        tracing::debug!(
            language = %language,
            texts = texts.len(),
            rank_boundary = options.rank_boundary(),
            personalized = options.personalized(),
            known = known.len(),
            "Scoring difficulty"
        );

        let scores: Vec<DifficultyScore<I>> = texts
            .into_iter()
            .map(|text| {
                let TextDifficulty { median, average } =
                    score_difficulty(&text.content, &language, self.ranks.as_ref(), options, known);
                DifficultyScore {
                    id: text.id,
                    score_median: median,
                    score_average: average,
                }
            })
            .collect();

        tracing::info!(language = %language, texts = scores.len(), "Difficulty batch scored");
        Ok(scores)
    }

    /// Learnability for every text against the user's current learning set
    pub fn learnability_for_texts<I>(
        &self,
        language_code: &str,
        texts: Vec<ScoredText<I>>,
        learning_set: &HashSet<String>,
    ) -> Result<Vec<LearnabilityScore<I>>> {
        let language = self.registry.resolve(language_code)?;
        tracing::debug!(
            language = %language,
            texts = texts.len(),
            learning = learning_set.len(),
            "Scoring learnability"
        );

        let scores: Vec<LearnabilityScore<I>> = texts
            .into_iter()
            .map(|text| {
                let TextLearnability { score, count } =
                    score_learnability(&text.content, learning_set);
                LearnabilityScore {
                    id: text.id,
                    score,
                    count,
                }
            })
            .collect();

        tracing::info!(language = %language, texts = scores.len(), "Learnability batch scored");
        Ok(scores)
    }
}
