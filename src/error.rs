//! Domain-specific error types for wordscope

use thiserror::Error;

/// Main error type for the scoring and fetching core
#[derive(Error, Debug)]
pub enum WordscopeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown language: {code}")]
    UnknownLanguage { code: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("Extraction error: {message}")]
    Extraction { message: String },

    #[error("Translation error: {message}")]
    Translation { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WordscopeError {
    /// True for errors the caller caused (bad language code, malformed payload)
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            WordscopeError::UnknownLanguage { .. }
                | WordscopeError::InvalidInput { .. }
                | WordscopeError::Serialization { .. }
        )
    }

    /// Map a reqwest error from a client built with `timeout`, so a timeout
    /// reports the limit that was actually hit
    pub fn from_reqwest(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            return WordscopeError::Timeout {
                operation: request_label(&err),
                timeout_ms: timeout.as_millis() as u64,
            };
        }
        err.into()
    }
}

fn request_label(err: &reqwest::Error) -> String {
    err.url()
        .map(|u| format!("request to {u}"))
        .unwrap_or_else(|| "HTTP request".to_string())
}

impl From<anyhow::Error> for WordscopeError {
    fn from(err: anyhow::Error) -> Self {
        WordscopeError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for WordscopeError {
    fn from(err: serde_json::Error) -> Self {
        WordscopeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for WordscopeError {
    fn from(err: reqwest::Error) -> Self {
        // The client's limit is unknown here; see `from_reqwest`
        if err.is_timeout() {
            return WordscopeError::Http {
                message: format!("{} timed out", request_label(&err)),
            };
        }
        WordscopeError::Http {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

impl From<csv::Error> for WordscopeError {
    fn from(err: csv::Error) -> Self {
        WordscopeError::InvalidInput {
            message: format!("CSV parsing error: {}", err),
        }
    }
}

impl From<toml::de::Error> for WordscopeError {
    fn from(err: toml::de::Error) -> Self {
        WordscopeError::Config {
            message: format!("TOML parsing error: {}", err),
        }
    }
}

impl From<std::io::Error> for WordscopeError {
    fn from(err: std::io::Error) -> Self {
        WordscopeError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type alias for wordscope operations
pub type Result<T> = std::result::Result<T, WordscopeError>;
