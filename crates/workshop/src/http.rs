//! Page fetching
//!
//! [`PageFetcher`] is the seam between the scanner and the network. The
//! scanner only needs "bytes for this URL or an error"; [`HttpFetcher`]
//! provides that over reqwest with a per-request timeout and bounded retry.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::ScanConfig;
use crate::error::{Result, ScrapeError};
use crate::metrics::ScanMetrics;
use crate::progress::{ProgressCallback, ProgressEvent};

/// Source of page bytes
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the body of `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher with timeout and exponential-backoff retry
pub struct HttpFetcher {
    client: Client,
    config: ScanConfig,
    progress_callback: Option<ProgressCallback>,
    metrics: Option<Arc<ScanMetrics>>,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher from scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ScrapeError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
                field: None,
            })?;

        Ok(Self {
            client,
            config: config.clone(),
            progress_callback: None,
            metrics: None,
        })
    }

    /// Report retry attempts through `callback`
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Count retries into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<ScanMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Single GET without retry
    pub async fn fetch_once(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.request_error(url, e))?;
        debug!("GET {} -> {} bytes", url, body.len());
        Ok(body.to_vec())
    }

    fn request_error(&self, url: &str, error: reqwest::Error) -> ScrapeError {
        if error.is_timeout() {
            ScrapeError::NetworkTimeout {
                url: url.to_string(),
                duration_secs: self.config.timeout.as_secs(),
            }
        } else {
            ScrapeError::HttpRequest {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        retry_with_backoff(
            || self.fetch_once(url),
            &self.config,
            self.progress_callback.clone(),
            self.metrics.as_deref(),
            url,
        )
        .await
    }
}

/// Run `operation` until it succeeds, fails unrecoverably, or retries run out
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    config: &ScanConfig,
    progress_callback: Option<ProgressCallback>,
    metrics: Option<&ScanMetrics>,
    url: &str,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let delay = config.get_retry_delay(attempt - 1);
            debug!("Retry attempt {} for {} after {:?} delay", attempt, url, delay);
            if let Some(metrics) = metrics {
                metrics.record_retry();
            }

            if let Some(ref callback) = progress_callback {
                callback(ProgressEvent::RetryAttempt {
                    url: url.to_string(),
                    attempt,
                    max_attempts: config.max_retries,
                });
            }

            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !e.is_recoverable() {
                    debug!("Error is not recoverable, failing immediately: {}", e);
                    return Err(e);
                }
                last_error = Some(e);
            }
        }
    }

    Err(ScrapeError::MaxRetriesExceeded {
        url: url.to_string(),
        max_retries: config.max_retries,
        last_error: last_error.map_or_else(|| "no attempt made".to_string(), |e| e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn fast_config(max_retries: usize) -> ScanConfig {
        ScanConfig::default()
            .with_max_retries(max_retries)
            .with_retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failure() {
        let calls = AtomicUsize::new(0);
        let metrics = ScanMetrics::default();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let callback: ProgressCallback = Arc::new(move |event| sink.lock().unwrap().push(event));

        let result = retry_with_backoff(
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ScrapeError::HttpStatus { url: "u".into(), status: 503 })
                } else {
                    Ok(42)
                }
            },
            &fast_config(2),
            Some(callback),
            Some(&metrics),
            "u",
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(events.lock().unwrap().len(), 1);
        assert_eq!(metrics.snapshot().retries_attempted, 1);
    }

    #[tokio::test]
    async fn test_retry_stops_on_unrecoverable_error() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = retry_with_backoff(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ScrapeError::HttpStatus { url: "u".into(), status: 404 })
            },
            &fast_config(3),
            None,
            None,
            "u",
        )
        .await;

        assert!(matches!(result, Err(ScrapeError::HttpStatus { status: 404, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_exhaustion() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = retry_with_backoff(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ScrapeError::HttpStatus { url: "u".into(), status: 500 })
            },
            &fast_config(2),
            None,
            None,
            "u",
        )
        .await;

        match result {
            Err(ScrapeError::MaxRetriesExceeded { max_retries, last_error, .. }) => {
                assert_eq!(max_retries, 2);
                assert!(last_error.contains("500"));
            }
            other => panic!("Expected MaxRetriesExceeded, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
