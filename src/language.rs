//! Language handles and code resolution

use crate::error::{Result, WordscopeError};
use serde::Serialize;
use std::fmt;

/// Resolved language handle. Only obtainable through a [`LanguageRegistry`],
/// so holding one means the code was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Language {
    code: String,
}

impl Language {
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// The set of languages the host supports
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    /// Build from language codes; codes are lowercased and duplicates dropped
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut languages: Vec<Language> = Vec::new();
        for code in codes {
            let code = normalize_code(code.as_ref());
            if code.is_empty() || languages.iter().any(|l| l.code == code) {
                continue;
            }
            languages.push(Language { code });
        }
        Self { languages }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(&config.languages.available)
    }

    /// Resolve a caller-supplied code (case-insensitive, surrounding whitespace ignored)
    pub fn resolve(&self, code: &str) -> Result<Language> {
        let wanted = normalize_code(code);
        self.languages
            .iter()
            .find(|l| l.code == wanted)
            .cloned()
            .ok_or_else(|| WordscopeError::UnknownLanguage {
                code: code.to_string(),
            })
    }

    /// Codes in configured order
    pub fn available(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.code.as_str()).collect()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}
