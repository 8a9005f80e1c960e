//! Configuration types for collection scans

use std::time::Duration;

use tracing::warn;

use crate::error::{Result, ScrapeError};

/// Default catalog location; detail pages live under `<base>/filedetails/`
pub const DEFAULT_BASE_URL: &str = "https://steamcommunity.com/sharedfiles";

/// Configuration for scan operations
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Catalog base URL used to template detail page URLs
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub max_retries: usize,
    /// Initial delay between retries (doubles each retry)
    pub retry_delay: Duration,
    /// Maximum retry delay cap
    pub max_retry_delay: Duration,
    /// Number of detail pages fetched at once (1 = strictly sequential)
    pub max_concurrent_fetches: usize,
    /// Pause after each detail page fetch
    pub settle_delay: Duration,
}

impl ScanConfig {
    /// Defaults overridden by `WORKSHOP_*` environment variables
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("WORKSHOP_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = env_number("WORKSHOP_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = env_number("WORKSHOP_MAX_RETRIES") {
            config.max_retries = retries as usize;
        }
        if let Some(concurrency) = env_number("WORKSHOP_CONCURRENCY") {
            config.max_concurrent_fetches = concurrency as usize;
        }
        if let Some(ms) = env_number("WORKSHOP_SETTLE_MS") {
            config.settle_delay = Duration::from_millis(ms);
        }

        config
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Detail page URL for a workshop item
    pub fn detail_url(&self, workshop_id: &str) -> String {
        format!("{}/filedetails/?id={}", self.base_url.trim_end_matches('/'), workshop_id)
    }

    /// Calculate retry delay for the given attempt using exponential backoff
    pub fn get_retry_delay(&self, attempt: usize) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.min(16) as u32);
        let delay = (self.retry_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_retry_delay.as_millis() as u64))
    }

    /// Reject settings the scanner cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_fetches == 0 {
            return Err(ScrapeError::Configuration {
                message: "max_concurrent_fetches must be at least 1".to_string(),
                field: Some("max_concurrent_fetches".to_string()),
            });
        }
        if self.timeout.is_zero() {
            return Err(ScrapeError::Configuration {
                message: "timeout must be greater than zero".to_string(),
                field: Some("timeout".to_string()),
            });
        }
        let base = url::Url::parse(&self.base_url)
            .map_err(|e| ScrapeError::invalid_url(self.base_url.clone(), e))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ScrapeError::UnsupportedUrl {
                url: self.base_url.clone(),
                scheme: base.scheme().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "workshop/0.1.0".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
            max_retry_delay: Duration::from_secs(8),
            max_concurrent_fetches: 1,
            settle_delay: Duration::from_millis(300),
        }
    }
}

fn env_number(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}
