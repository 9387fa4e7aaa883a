//! Bookmark learning history and known/learning word classification
//!
//! A bookmark is a word the user looked up, together with every exercise they did
//! on it. The most recent decisive exercise outcome tells whether the word is
//! mastered ("too easy") or still being learned.

use crate::language::Language;
use crate::ranks::RankLookup;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

/// Outcome recorded for a single exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExerciseOutcome {
    ShowSolution,
    Retry,
    Correct,
    Wrong,
    Typo,
    TooEasy,
    IKnow,
}

impl ExerciseOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseOutcome::ShowSolution => "Show solution",
            ExerciseOutcome::Retry => "Retry",
            ExerciseOutcome::Correct => "Correct",
            ExerciseOutcome::Wrong => "Wrong",
            ExerciseOutcome::Typo => "Typo",
            ExerciseOutcome::TooEasy => "Too easy",
            ExerciseOutcome::IKnow => "I know",
        }
    }

    /// `Some(true)` if this outcome marks the word as mastered, `Some(false)` if it
    /// marks it as still being learned, `None` if it says nothing either way.
    fn decides_too_easy(&self) -> Option<bool> {
        match self {
            ExerciseOutcome::TooEasy | ExerciseOutcome::IKnow => Some(true),
            ExerciseOutcome::ShowSolution | ExerciseOutcome::Wrong => Some(false),
            ExerciseOutcome::Retry | ExerciseOutcome::Correct | ExerciseOutcome::Typo => None,
        }
    }
}

impl FromStr for ExerciseOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "showsolution" => Ok(ExerciseOutcome::ShowSolution),
            "retry" => Ok(ExerciseOutcome::Retry),
            "correct" => Ok(ExerciseOutcome::Correct),
            "wrong" => Ok(ExerciseOutcome::Wrong),
            "typo" => Ok(ExerciseOutcome::Typo),
            "tooeasy" => Ok(ExerciseOutcome::TooEasy),
            "iknow" => Ok(ExerciseOutcome::IKnow),
            _ => Err(format!("unknown exercise outcome '{}'", s)),
        }
    }
}

impl TryFrom<String> for ExerciseOutcome {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExerciseOutcome> for String {
    fn from(value: ExerciseOutcome) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub outcome: ExerciseOutcome,
    #[serde(default)]
    pub source: Option<String>,
    /// Milliseconds the user needed; absent for self-assessed outcomes
    #[serde(default)]
    pub solving_speed: Option<u64>,
    pub time: DateTime<Utc>,
}

/// A looked-up word with its translations, context and exercise log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: u64,
    pub word: String,
    /// Language code of `word`
    pub language: String,
    #[serde(default)]
    pub translations: Vec<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Bookmark {
    pub fn is_in(&self, language: &Language) -> bool {
        self.language.eq_ignore_ascii_case(language.code())
    }

    /// Walk the exercise log from newest to oldest and report whether the first
    /// decisive outcome says the word is too easy. No decisive outcome means the
    /// word is still being learned.
    pub fn is_latest_outcome_too_easy(&self) -> bool {
        let mut log: Vec<&Exercise> = self.exercises.iter().collect();
        log.sort_by(|a, b| b.time.cmp(&a.time));
        log.iter()
            .find_map(|e| e.outcome.decides_too_easy())
            .unwrap_or(false)
    }
}

/// Distinct words the user is actively studying in `language`
pub fn learning_set(bookmarks: &[Bookmark], language: &Language) -> HashSet<String> {
    bookmarks
        .iter()
        .filter(|b| b.is_in(language) && !b.is_latest_outcome_too_easy())
        .map(|b| b.word.clone())
        .collect()
}

/// Distinct mastered words that the rank table knows for `language`, sorted
pub fn known_words(
    bookmarks: &[Bookmark],
    language: &Language,
    ranks: &dyn RankLookup,
) -> Vec<String> {
    let known: BTreeSet<&str> = bookmarks
        .iter()
        .filter(|b| b.is_latest_outcome_too_easy())
        .map(|b| b.word.as_str())
        .filter(|w| ranks.has_rank(w, language))
        .collect();
    known.into_iter().map(str::to_string).collect()
}

/// Bookmarks in `language` that are not yet mastered, in input order
pub fn still_learning<'a>(bookmarks: &'a [Bookmark], language: &Language) -> Vec<&'a Bookmark> {
    bookmarks
        .iter()
        .filter(|b| b.is_in(language) && !b.is_latest_outcome_too_easy())
        .collect()
}
