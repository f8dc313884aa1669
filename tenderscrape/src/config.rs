//! Configuration types for crawling, fetching and extraction.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::errors::ScrapeError;
use crate::extract::{default_rules, FieldRule};

/// Top-level scraper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site root used to resolve relative links.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the paginated search page, relative to `base_url`.
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Path segment identifying tender detail links.
    #[serde(default = "default_detail_segment")]
    pub detail_path_segment: String,
    /// Selector for tender summary blocks on a results page.
    #[serde(default = "default_summary_selector")]
    pub summary_selector: String,
    /// Delay between results pages in seconds.
    #[serde(default = "default_request_delay")]
    pub page_delay_seconds: f64,
    /// Delay after each detail page in seconds.
    #[serde(default = "default_request_delay")]
    pub detail_delay_seconds: f64,
    /// Fetch configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Extraction configuration.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

fn default_base_url() -> String {
    "https://rostender.info".to_string()
}

fn default_search_path() -> String {
    "/extsearch".to_string()
}

fn default_detail_segment() -> String {
    "/tender/".to_string()
}

fn default_summary_selector() -> String {
    "div.tender-info".to_string()
}

fn default_request_delay() -> f64 {
    0.5
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            detail_path_segment: default_detail_segment(),
            summary_selector: default_summary_selector(),
            page_delay_seconds: default_request_delay(),
            detail_delay_seconds: default_request_delay(),
            fetch: FetchConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Creates a new scraper configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ScrapeError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the site root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the retry budget.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.fetch.retry.max_attempts = attempts;
        self
    }

    /// Zeroes every delay. Used by tests and dry runs against local fixtures.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.page_delay_seconds = 0.0;
        self.detail_delay_seconds = 0.0;
        self.fetch.retry.retry_delay_seconds = 0.0;
        self
    }

    /// Parsed site root.
    pub fn base(&self) -> Result<Url, ScrapeError> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Absolute address of the first results page.
    pub fn search_url(&self) -> Result<Url, ScrapeError> {
        Ok(self.base()?.join(&self.search_path)?)
    }

    /// Gets the page delay as Duration.
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        seconds(self.page_delay_seconds)
    }

    /// Gets the detail delay as Duration.
    #[must_use]
    pub fn detail_delay(&self) -> Duration {
        seconds(self.detail_delay_seconds)
    }

    /// Rejects values the crawler cannot work with.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        self.search_url()?;
        if self.detail_path_segment.is_empty() {
            return Err(ScrapeError::config("detail_path_segment must not be empty"));
        }
        if self.fetch.retry.max_attempts == 0 {
            return Err(ScrapeError::config("fetch.retry.max_attempts must be at least 1"));
        }
        for (name, value) in [
            ("page_delay_seconds", self.page_delay_seconds),
            ("detail_delay_seconds", self.detail_delay_seconds),
            ("fetch.timeout_seconds", self.fetch.timeout_seconds),
            ("fetch.retry.retry_delay_seconds", self.fetch.retry.retry_delay_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScrapeError::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for HTTP fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Retry configuration.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout() -> f64 {
    10.0
}

fn default_user_agent() -> String {
    concat!("tenderscrape/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
        }
    }
}

impl FetchConfig {
    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        seconds(self.timeout_seconds)
    }
}

/// Retry configuration for failed requests.
///
/// The default is a fixed delay: five attempts, two seconds apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Delay between attempts in seconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: f64,
}

fn default_max_attempts() -> usize {
    5
}

fn default_retry_delay() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_seconds: default_retry_delay(),
        }
    }
}

impl RetryConfig {
    /// Gets the pause between attempts as Duration.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        seconds(self.retry_delay_seconds)
    }
}

/// Configuration for detail page extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Ordered locator chains, one rule per field.
    #[serde(default = "default_rules")]
    pub rules: Vec<FieldRule>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
