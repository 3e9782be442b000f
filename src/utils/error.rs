//! Error types for the crawlhub pipeline
//!
//! This module defines the per-stage error types: fetching, parsing and
//! configuration, plus the per-source [`CrawlerError`] that wraps them.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
///
/// Every variant is treated as transient by the retry policy.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Server responded with status {status} for {url}")]
    Status { status: u16, url: String },

    /// Request timeout
    #[error("Request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport failure not originating from reqwest
    #[error("Transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Map a reqwest error, folding client-side timeouts into [`FetchError::Timeout`]
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { after: timeout }
        } else {
            Self::Http(err)
        }
    }

    /// Whether this failure is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Errors that can occur while turning a payload into records
#[derive(Error, Debug)]
pub enum ParseError {
    /// The expected document root is absent
    #[error("Missing root element: expected {expected}")]
    MissingRoot { expected: String },

    /// Malformed XML
    #[error("Malformed XML: {0}")]
    Xml(String),

    /// Malformed JSON
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed but does not have the expected shape
    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),

    /// The remote API reported an error inside an otherwise valid document
    #[error("Remote API reported an error: {0}")]
    RemoteError(String),
}

/// Configuration and parameter errors, raised before any network call
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required parameter is missing or empty
    #[error("Source '{source_name}' is missing required parameter '{field}'")]
    MissingParameter { source_name: String, field: String },

    /// A parameter has an invalid value
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },

    /// No configured source with that name
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// The configuration could not be loaded
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::MissingParameter`]
    pub fn missing(source_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingParameter {
            source_name: source_name.into(),
            field: field.into(),
        }
    }

    /// Shorthand for [`ConfigError::Invalid`]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of one source crawl
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// Fetching failed after the retry budget was spent
    #[error("Fetch failed for query '{query}' after {attempts} attempt(s): {source}")]
    Fetch {
        query: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CrawlerError {
    /// Number of fetch attempts recorded with this error
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Fetch { attempts, .. } => *attempts,
            _ => 0,
        }
    }
}
