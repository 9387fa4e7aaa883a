//! Learnability: share of a text made of words the user is studying

use crate::tokenizer::split_words;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextLearnability {
    /// `count / tokens`, 0.0 for a text without tokens
    pub score: f64,
    pub count: usize,
}

/// Count tokens of `text` present in `learning_set`. Repeated tokens count every
/// time they occur.
pub fn score_learnability(text: &str, learning_set: &HashSet<String>) -> TextLearnability {
    let words = split_words(text);
    if words.is_empty() {
        return TextLearnability {
            score: 0.0,
            count: 0,
        };
    }
    let count = words.iter().filter(|w| learning_set.contains(w.as_str())).count();
    TextLearnability {
        score: count as f64 / words.len() as f64,
        count,
    }
}
