//! Error types for the collection scanner

use std::error::Error;
use thiserror::Error;

use crate::resolve::PlaceholderKind;

/// Errors raised while fetching pages, scanning a collection or resolving selections
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport-level HTTP failure
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP request to '{url}' returned status {status}")]
    HttpStatus {
        url: String,
        status: u16,
    },

    /// Network timeout with retry suggestion
    #[error("Request to '{url}' timed out after {duration_secs}s (try increasing timeout or check network)")]
    NetworkTimeout {
        url: String,
        duration_secs: u64,
    },

    /// Retry exhaustion with context
    #[error("Maximum retry attempts ({max_retries}) exceeded for '{url}': {last_error}")]
    MaxRetriesExceeded {
        url: String,
        max_retries: usize,
        last_error: String,
    },

    /// URL parsing errors with helpful suggestions
    #[error("Invalid URL '{url}': {suggestion}")]
    InvalidUrl {
        url: String,
        suggestion: String,
        #[source]
        source: url::ParseError,
    },

    /// Unsupported URL schemes
    #[error("Unsupported URL scheme '{scheme}' in '{url}' (supported: http, https)")]
    UnsupportedUrl {
        url: String,
        scheme: String,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// A selector picked an index outside of the presented options
    #[error("Invalid {kind} selection {index}: expected a value between 0 and {}", .options.saturating_sub(1))]
    InvalidSelection {
        kind: PlaceholderKind,
        index: usize,
        options: usize,
    },

    /// Reading operator input failed
    #[error("Failed to read operator input")]
    Input {
        #[source]
        source: std::io::Error,
    },

    /// Operator input ended before every selection was made
    #[error("Input closed before all selections were made")]
    InputClosed,

    /// The three-line config fragment could not be parsed back
    #[error("Malformed config fragment: {0}")]
    MalformedConfig(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

impl ScrapeError {
    /// Build an `InvalidUrl` error for the given input
    pub fn invalid_url<S: Into<String>>(url: S, source: url::ParseError) -> Self {
        let suggestion = match source {
            url::ParseError::EmptyHost => "URL must have a valid hostname",
            url::ParseError::InvalidPort => "Port number must be between 1 and 65535",
            url::ParseError::RelativeUrlWithoutBase => "URL must be absolute (include http:// or https://)",
            _ => "Check URL format and try again",
        }
        .to_string();

        ScrapeError::InvalidUrl {
            url: url.into(),
            suggestion,
            source,
        }
    }

    /// Check if error is recoverable (should retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            ScrapeError::HttpRequest { source, .. } => {
                source.status().map_or(true, |status| status.is_server_error() || status.as_u16() == 429)
            }
            ScrapeError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            ScrapeError::NetworkTimeout { .. } => true,
            _ => false,
        }
    }

    /// Whether the error came from fetching a page
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ScrapeError::HttpRequest { .. }
                | ScrapeError::HttpStatus { .. }
                | ScrapeError::NetworkTimeout { .. }
                | ScrapeError::MaxRetriesExceeded { .. }
        )
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            ScrapeError::HttpRequest { .. } => "http_request",
            ScrapeError::HttpStatus { .. } => "http_status",
            ScrapeError::NetworkTimeout { .. } => "network_timeout",
            ScrapeError::MaxRetriesExceeded { .. } => "max_retries_exceeded",
            ScrapeError::InvalidUrl { .. } => "invalid_url",
            ScrapeError::UnsupportedUrl { .. } => "unsupported_url",
            ScrapeError::Configuration { .. } => "configuration",
            ScrapeError::InvalidSelection { .. } => "invalid_selection",
            ScrapeError::Input { .. } => "input",
            ScrapeError::InputClosed => "input_closed",
            ScrapeError::MalformedConfig(_) => "malformed_config",
        }
    }

    /// Get severity level for error prioritization
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScrapeError::HttpRequest { .. }
            | ScrapeError::HttpStatus { .. }
            | ScrapeError::NetworkTimeout { .. }
            | ScrapeError::MaxRetriesExceeded { .. } => ErrorSeverity::Medium,
            ScrapeError::MalformedConfig(_) => ErrorSeverity::Low,
            ScrapeError::InvalidUrl { .. }
            | ScrapeError::UnsupportedUrl { .. }
            | ScrapeError::Configuration { .. } => ErrorSeverity::High,
            ScrapeError::InvalidSelection { .. }
            | ScrapeError::Input { .. }
            | ScrapeError::InputClosed => ErrorSeverity::Critical,
        }
    }

    /// Create a detailed error report for debugging
    pub fn detailed_report(&self) -> String {
        let mut report = format!("Error: {}\n", self);
        report.push_str(&format!("Category: {}\n", self.category()));
        report.push_str(&format!("Severity: {:?}\n", self.severity()));
        report.push_str(&format!("Recoverable: {}\n", self.is_recoverable()));

        if let Some(source) = self.source() {
            report.push_str(&format!("Root cause: {}\n", source));
        }

        report
    }
}

/// Error severity levels for prioritization
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}
