//! Word translation through the Google Translate v2 REST API

use crate::config::TranslateConfig;
use crate::error::{Result, WordscopeError};
use crate::language::Language;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, word: &str, from: &Language, to: &Language) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<TranslationEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationEntry {
    translated_text: String,
}

pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleTranslator {
    /// Fails with a configuration error when no API key is set
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| WordscopeError::Config {
            message: "WORDSCOPE_TRANSLATE_API_KEY is not set".into(),
        })?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WordscopeError::Internal {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            timeout,
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, word: &str, from: &Language, to: &Language) -> Result<String> {
        debug!(from = %from, to = %to, chars = word.chars().count(), "Translating word");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", word),
                ("target", to.code()),
                ("format", "text"),
                ("source", from.code()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            // The query carries the API key, keep it out of error messages
            .map_err(|e| WordscopeError::from_reqwest(e.without_url(), self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WordscopeError::Translation {
                message: format!("translate API returned {}: {}", status, body),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| WordscopeError::from_reqwest(e.without_url(), self.timeout))?;
        parse_translation(&body)
    }
}

fn parse_translation(body: &str) -> Result<String> {
    let parsed: TranslateResponse =
        serde_json::from_str(body).map_err(|e| WordscopeError::Translation {
            message: format!("unexpected translate API response: {}", e),
        })?;
    parsed
        .data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or_else(|| WordscopeError::Translation {
            message: "translate API returned no translations".into(),
        })
}
