use crate::config::FetchConfig;
use crate::error::{Result, WordscopeError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A fetched page body and the URL it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub body: String,
}

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;
}

/// Fetches pages over HTTP with a browser-like identity
pub struct HttpPageSource {
    client: reqwest::Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpPageSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.max_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WordscopeError::Internal {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            timeout,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Fetch a page whose URL may arrive percent-encoded (as a path segment of a
    /// host route, say) and return the raw body.
    pub async fn get_page(&self, url: &str) -> Result<Page> {
        let decoded = urlencoding::decode(url).map_err(|e| WordscopeError::InvalidInput {
            message: format!("URL is not valid UTF-8 after decoding: {}", e),
        })?;
        self.fetch(&decoded).await
    }

    async fn read_capped(&self, mut response: reqwest::Response) -> Result<Vec<u8>> {
        if let Some(len) = response.content_length()
            && len > self.max_body_bytes as u64
        {
            return Err(WordscopeError::Http {
                message: format!(
                    "response body of {} bytes exceeds limit of {}",
                    len, self.max_body_bytes
                ),
            });
        }
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| WordscopeError::from_reqwest(e, self.timeout))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(WordscopeError::Http {
                    message: format!("response body exceeds limit of {} bytes", self.max_body_bytes),
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<Page> {
        let parsed = reqwest::Url::parse(url.trim()).map_err(|e| WordscopeError::InvalidInput {
            message: format!("invalid URL '{}': {}", url, e),
        })?;
        debug!(url = %parsed, "Fetching page");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| WordscopeError::from_reqwest(e, self.timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WordscopeError::Http {
                message: format!("{} returned HTTP {}", url, status),
            });
        }
        let final_url = response.url().to_string();
        let bytes = self.read_capped(response).await?;
        debug!(url = %final_url, bytes = bytes.len(), "Fetched page");
        Ok(Page {
            url: final_url,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
