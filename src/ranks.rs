//! Word-frequency rank lookups
//!
//! Ranks are 1-based (1 = most frequent word of the language). The scoring core only
//! reads them; loading and refreshing rank data is the host's job.

use crate::error::Result;
use crate::language::Language;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Read-only access to word-frequency ranks
pub trait RankLookup: Send + Sync {
    /// Rank of `word` in `language`, or `None` when the word is unranked
    fn rank(&self, word: &str, language: &Language) -> Option<u32>;

    fn has_rank(&self, word: &str, language: &Language) -> bool {
        self.rank(word, language).is_some()
    }
}

/// In-memory rank snapshot keyed by language code, then word
#[derive(Debug, Clone, Default)]
pub struct RankTable {
    by_language: HashMap<String, HashMap<String, u32>>,
}

#[derive(Debug, Deserialize)]
struct RankRow {
    language: String,
    word: String,
    rank: String,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace one entry. Rank 0 is not a valid rank and is ignored.
    pub fn insert(&mut self, language_code: &str, word: &str, rank: u32) {
        if rank == 0 {
            return;
        }
        self.by_language
            .entry(language_code.trim().to_lowercase())
            .or_default()
            .insert(word.to_string(), rank);
    }

    /// Load a `language,word,rank` CSV (with header). Rows that do not carry a
    /// positive integer rank are skipped with a warning.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = Self::new();
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut skipped = 0usize;
        for row in rdr.deserialize::<RankRow>() {
            let row = row?;
            match row.rank.parse::<u32>() {
                Ok(rank) if rank > 0 && !row.word.is_empty() => {
                    table.insert(&row.language, &row.word, rank);
                }
                _ => {
                    skipped += 1;
                    tracing::warn!(
                        language = %row.language,
                        word = %row.word,
                        rank = %row.rank,
                        "Skipping rank row without a positive rank"
                    );
                }
            }
        }
        tracing::debug!(entries = table.len(), skipped, "Loaded rank table");
        Ok(table)
    }

    pub fn from_csv_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn len(&self) -> usize {
        self.by_language.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RankLookup for RankTable {
    fn rank(&self, word: &str, language: &Language) -> Option<u32> {
        let words = self.by_language.get(language.code())?;
        words.get(word).copied().or_else(|| {
            // Sentence-initial capitals should still find the dictionary form
            let lower = word.to_lowercase();
            if lower == word {
                None
            } else {
                words.get(&lower).copied()
            }
        })
    }
}

impl<T: RankLookup + ?Sized> RankLookup for std::sync::Arc<T> {
    fn rank(&self, word: &str, language: &Language) -> Option<u32> {
        (**self).rank(word, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageRegistry;

    fn es() -> Language {
        LanguageRegistry::new(["es", "de"]).resolve("es").unwrap()
    }

    #[test]
    fn test_lookup_and_lowercase_fallback() {
        let mut table = RankTable::new();
        table.insert("es", "sol", 200);
        assert_eq!(table.rank("sol", &es()), Some(200));
        assert_eq!(table.rank("Sol", &es()), Some(200));
        assert_eq!(table.rank("brilla", &es()), None);
        assert!(!table.has_rank("brilla", &es()));
    }

    #[test]
    fn test_languages_are_separate() {
        let mut table = RankTable::new();
        table.insert("de", "sol", 9);
        assert_eq!(table.rank("sol", &es()), None);
    }

    #[test]
    fn test_csv_import_skips_bad_rows() {
        let csv = "language,word,rank\nes,el,5\nes,sol,200\nes,raro,0\nes,malo,abc\n";
        let table = RankTable::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rank("el", &es()), Some(5));
        assert_eq!(table.rank("raro", &es()), None);
    }

    #[test]
    fn test_zero_rank_insert_ignored() {
        let mut table = RankTable::new();
        table.insert("es", "nada", 0);
        assert!(table.is_empty());
    }
}
