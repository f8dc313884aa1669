//! Error types for tenderscrape.
//!
//! Every fallible operation in the library returns [`ScrapeError`]. Most
//! variants are contained locally (a failed page is skipped, a failed field
//! falls back to the sentinel); only configuration and storage errors reach
//! the binaries.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tenderscrape operations.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport-level failure (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} for {url}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// All retry attempts for a page were used up.
    #[error("Failed to fetch {url} after {attempts} attempts")]
    FetchExhausted {
        /// The requested URL.
        url: String,
        /// Number of attempts made.
        attempts: usize,
    },

    /// A URL could not be parsed or resolved.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A CSS selector could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    Selector {
        /// The offending selector text.
        selector: String,
        /// Parser message.
        reason: String,
    },

    /// The backing database has not been created yet.
    #[error("database {} not found; run the scraper first", path.display())]
    StorageUnavailable {
        /// Path of the expected database file.
        path: PathBuf,
    },

    /// Any other database fault.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// CSV serialization failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The output destination cannot be used.
    #[error("Invalid output destination: {0}")]
    InvalidOutput(String),

    /// The configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Creates a selector error from a selector and its parse failure.
    #[must_use]
    pub fn selector(selector: impl Into<String>, reason: impl ToString) -> Self {
        Self::Selector {
            selector: selector.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the failure may succeed on a later attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }

    /// Whether this is the "database not created yet" condition.
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}
