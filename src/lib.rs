pub mod config;
pub mod deserializers;
pub mod error;
pub mod fetch;
pub mod history;
pub mod language;
pub mod probabilities;
pub mod ranks;
pub mod scoring;
pub mod snapshot;
pub mod tokenizer;
pub mod translate;

pub use error::{Result, WordscopeError};
pub use language::{Language, LanguageRegistry};
pub use probabilities::KnownProbabilities;
pub use ranks::{RankLookup, RankTable};
pub use scoring::{DifficultyOptions, Scorer};

// Load env from a simple, standardized location resolution.
// WORDSCOPE_ENV_FILE wins; otherwise `.env` is loaded if present and silently ignored if missing.
pub fn load_env() {
    match std::env::var("WORDSCOPE_ENV_FILE") {
        Ok(path) => {
            let _ = dotenvy::from_path(path);
        }
        Err(_) => {
            let _ = dotenvy::dotenv();
        }
    }
}
