//! Concurrent article fetching under one batch-wide deadline
//!
//! Every request becomes its own task. Results are appended to a shared collector
//! as they finish; when the deadline passes the remaining tasks are cancelled and
//! whatever was collected is returned. A request that fails and a request that is
//! too slow look the same to the caller: neither produces a result.

pub mod extract;
pub mod source;

use crate::config::FetchConfig;
use crate::deserializers::de_option_u64_forgiving;
use crate::error::{Result, WordscopeError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use extract::{Extracted, extract_article};
pub use source::{HttpPageSource, Page, PageSource};

/// Shortest deadline a batch is given, whatever the caller asks for
pub const MIN_FETCH_TIMEOUT: Duration = Duration::from_millis(100);

/// How long aborted tasks get to unwind once the deadline has passed
const ABORT_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest<I = serde_json::Value> {
    pub url: String,
    pub id: I,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult<I = serde_json::Value> {
    pub id: I,
    pub content: String,
    pub image: String,
}

/// Fetch batch payload as hosts receive it; `timeout` is in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct FetchBatchRequest<I = serde_json::Value> {
    pub urls: Vec<FetchRequest<I>>,
    #[serde(default, deserialize_with = "de_option_u64_forgiving")]
    pub timeout: Option<u64>,
}

impl<I> FetchBatchRequest<I> {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

pub struct Fetcher {
    source: Arc<dyn PageSource>,
    default_timeout: Duration,
    max_timeout: Duration,
}

impl Fetcher {
    pub fn new(source: Arc<dyn PageSource>, config: &FetchConfig) -> Self {
        let max_timeout = Duration::from_secs(config.max_timeout_secs).max(MIN_FETCH_TIMEOUT);
        Self {
            source,
            default_timeout: Duration::from_secs(config.default_timeout_secs)
                .clamp(MIN_FETCH_TIMEOUT, max_timeout),
            max_timeout,
        }
    }

    /// Fetcher backed by [`HttpPageSource`]
    pub fn http(config: &FetchConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpPageSource::new(config)?), config))
    }

    /// Deadline actually applied for a requested timeout
    pub fn effective_timeout(&self, requested: Option<Duration>) -> Duration {
        requested
            .unwrap_or(self.default_timeout)
            .clamp(MIN_FETCH_TIMEOUT, self.max_timeout)
    }

    /// Fetch and extract every request concurrently, returning the results that
    /// completed before the deadline in completion order.
    pub async fn fetch_all<I>(
        &self,
        requests: Vec<FetchRequest<I>>,
        timeout: Option<Duration>,
    ) -> Vec<FetchResult<I>>
    where
        I: Send + 'static,
    {
        let deadline = self.effective_timeout(timeout);
        let batch_id = Uuid::new_v4();
        let requested = requests.len();
        if requested == 0 {
            return Vec::new();
        }
        debug!(
            batch_id = %batch_id,
            requests = requested,
            timeout_ms = deadline.as_millis() as u64,
            "Starting fetch batch"
        );

        let started = Instant::now();
        let collected: Arc<Mutex<Vec<FetchResult<I>>>> =
            Arc::new(Mutex::new(Vec::with_capacity(requested)));
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for FetchRequest { url, id } in requests {
            let source = Arc::clone(&self.source);
            let collected = Arc::clone(&collected);
            let cancel = cancel.child_token();
            tasks.spawn(async move {
                let outcome = tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(batch_id = %batch_id, url = %url, "Fetch cancelled at deadline");
                        return;
                    }
                    outcome = fetch_one(source, &url) => outcome,
                };
                match outcome {
                    Ok(Extracted { content, image }) => {
                        let mut results = lock(&collected);
                        if !cancel.is_cancelled() {
                            results.push(FetchResult { id, content, image });
                        }
                    }
                    Err(e) => {
                        debug!(batch_id = %batch_id, url = %url, error = %e, "Fetch failed, dropping");
                    }
                }
            });
        }

        let all_done = tokio::time::timeout(deadline, async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined
                    && e.is_panic()
                {
                    warn!(batch_id = %batch_id, "Fetch task panicked");
                }
            }
        })
        .await
        .is_ok();

        // Results are taken before cancelling so nothing finishing after the
        // deadline can slip into the batch
        let results = std::mem::take(&mut *lock(&collected));

        if !all_done {
            let pending = tasks.len();
            cancel.cancel();
            tasks.abort_all();
            // Aborted tasks unwind at their next await. Extraction already handed to
            // the blocking pool finishes in the background and is discarded.
            let _ = tokio::time::timeout(ABORT_GRACE, async {
                while tasks.join_next().await.is_some() {}
            })
            .await;
            warn!(
                batch_id = %batch_id,
                pending,
                timeout_ms = deadline.as_millis() as u64,
                "Fetch deadline reached, abandoning stragglers"
            );
        }

        info!(
            batch_id = %batch_id,
            requested,
            returned = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetch batch finished"
        );
        results
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

async fn fetch_one(source: Arc<dyn PageSource>, url: &str) -> Result<Extracted> {
    let Page { url, body } = source.fetch(url).await?;
    extract_blocking(move || extract_article(&body, &url)).await
}

/// Run CPU-bound extraction on the blocking pool so it never stalls the runtime
/// or the batch deadline.
async fn extract_blocking<F>(extract: F) -> Result<Extracted>
where
    F: FnOnce() -> Extracted + Send + 'static,
{
    tokio::task::spawn_blocking(extract)
        .await
        .map_err(|e| WordscopeError::Extraction {
            message: format!("extraction task failed: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticSource;

    #[async_trait]
    impl PageSource for StaticSource {
        async fn fetch(&self, url: &str) -> Result<Page> {
            Ok(Page {
                url: url.to_string(),
                body: format!("<p>page at {}</p>", url),
            })
        }
    }

    fn fetcher() -> Fetcher {
        Fetcher::new(Arc::new(StaticSource), &FetchConfig::default())
    }

    #[test]
    fn test_effective_timeout_clamps() {
        let f = fetcher();
        assert_eq!(f.effective_timeout(None), Duration::from_secs(10));
        assert_eq!(f.effective_timeout(Some(Duration::ZERO)), MIN_FETCH_TIMEOUT);
        assert_eq!(f.effective_timeout(Some(Duration::from_secs(9999))), Duration::from_secs(120));
    }

    #[test]
    fn test_batch_request_parsing() {
        let req: FetchBatchRequest = serde_json::from_value(json!({
            "urls": [{"url": "https://a.example/", "id": 1}],
            "timeout": "5"
        }))
        .unwrap();
        assert_eq!(req.urls.len(), 1);
        assert_eq!(req.timeout(), Some(Duration::from_secs(5)));

        let req: FetchBatchRequest = serde_json::from_value(json!({"urls": []})).unwrap();
        assert_eq!(req.timeout(), None);
    }

    #[tokio::test]
    async fn test_all_fast_requests_return() {
        let requests = vec![
            FetchRequest {
                url: "https://a.example/".to_string(),
                id: json!("a"),
            },
            FetchRequest {
                url: "https://b.example/".to_string(),
                id: json!("b"),
            },
        ];
        let mut out = fetcher().fetch_all(requests, Some(Duration::from_secs(5))).await;
        out.sort_by_key(|r| r.id.to_string());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, json!("a"));
        assert_eq!(out[0].content, "page at https://a.example/");
        assert_eq!(out[0].image, "");
    }

    #[tokio::test]
    async fn test_extraction_panic_becomes_error() {
        let err = extract_blocking(|| panic!("malformed page")).await.unwrap_err();
        assert!(matches!(err, WordscopeError::Extraction { .. }));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let out = fetcher().fetch_all::<u32>(vec![], None).await;
        assert!(out.is_empty());
    }
}
