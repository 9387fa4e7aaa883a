//! Per-user known-word probabilities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Probability in `[0, 1]` that a user already knows each word.
///
/// Values are validated once at construction; a word without an entry means
/// "no estimate" and scoring falls back to frequency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "HashMap<String, f64>", into = "HashMap<String, f64>")]
pub struct KnownProbabilities {
    by_word: HashMap<String, f64>,
}

impl KnownProbabilities {
    pub fn new(raw: HashMap<String, f64>) -> Self {
        let mut by_word = HashMap::with_capacity(raw.len());
        for (word, p) in raw {
            if !p.is_finite() {
                tracing::warn!(word = %word, "Dropping non-finite known probability");
                continue;
            }
            if !(0.0..=1.0).contains(&p) {
                tracing::warn!(word = %word, probability = p, "Clamping known probability into [0, 1]");
            }
            by_word.insert(word, p.clamp(0.0, 1.0));
        }
        Self { by_word }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.by_word.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.by_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_word.is_empty()
    }
}

impl From<HashMap<String, f64>> for KnownProbabilities {
    fn from(raw: HashMap<String, f64>) -> Self {
        Self::new(raw)
    }
}

impl From<KnownProbabilities> for HashMap<String, f64> {
    fn from(value: KnownProbabilities) -> Self {
        value.by_word
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for KnownProbabilities {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|(w, p)| (w.into(), p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let known: KnownProbabilities = [("sol", 1.4), ("luna", -0.2), ("mar", 0.5)]
            .into_iter()
            .collect();
        assert_eq!(known.get("sol"), Some(1.0));
        assert_eq!(known.get("luna"), Some(0.0));
        assert_eq!(known.get("mar"), Some(0.5));
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let known: KnownProbabilities = [("sol", f64::NAN), ("mar", 0.3)].into_iter().collect();
        assert_eq!(known.get("sol"), None);
        assert_eq!(known.len(), 1);
    }

    #[test]
    fn test_deserialize_validates() {
        let known: KnownProbabilities = serde_json::from_str(r#"{"sol": 2.0}"#).unwrap();
        assert_eq!(known.get("sol"), Some(1.0));
    }
}
