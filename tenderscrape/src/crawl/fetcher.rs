//! Page fetching with a bounded retry budget.

use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::{FetchConfig, RetryConfig};
use crate::errors::ScrapeError;

/// A single GET round trip returning the response body.
///
/// Implementations report non-success statuses as errors; retrying is
/// the [`Fetcher`]'s job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the decoded body.
    async fn get(&self, url: &Url) -> Result<String, ScrapeError>;
}

/// [`Transport`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a client with the configured timeout and user agent.
    pub fn new(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, ScrapeError> {
        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            duration_ms = start.elapsed().as_millis(),
            "Fetched page"
        );
        Ok(body)
    }
}

/// Retrying wrapper around a [`Transport`].
#[derive(Debug)]
pub struct Fetcher<T> {
    transport: T,
    retry: RetryConfig,
}

impl<T: Transport> Fetcher<T> {
    /// Creates a fetcher with the given retry policy.
    #[must_use]
    pub fn new(transport: T, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `url`, retrying any failure up to the attempt budget.
    ///
    /// Makes at most `max_attempts` requests and sleeps the configured
    /// delay between consecutive attempts, never after the last one.
    pub async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        let attempts = self.retry.max_attempts.max(1);

        for attempt in 0..attempts {
            match self.transport.get(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        transient = e.is_transient(),
                        error = %e,
                        "Fetch attempt failed"
                    );
                }
            }

            if attempt + 1 < attempts {
                tokio::time::sleep(self.retry.retry_delay()).await;
            }
        }

        error!(url = %url, attempts, "Giving up on page");
        Err(ScrapeError::FetchExhausted {
            url: url.to_string(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn url() -> Url {
        Url::parse("https://tenders.test/tender/1").unwrap()
    }

    fn retry(max_attempts: usize) -> RetryConfig {
        RetryConfig {
            max_attempts,
            retry_delay_seconds: 0.0,
            ..Default::default()
        }
    }

    fn unavailable() -> ScrapeError {
        ScrapeError::Status {
            url: "https://tenders.test/tender/1".to_string(),
            status: 503,
        }
    }

    #[tokio::test]
    async fn test_fetch_first_try() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok("<html></html>".to_string()));

        let fetcher = Fetcher::new(transport, retry(5));
        assert_eq!(fetcher.fetch(&url()).await.unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_recovers_after_failures() {
        let mut seq = Sequence::new();
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(unavailable()));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("ok".to_string()));

        let fetcher = Fetcher::new(transport, retry(5));
        assert_eq!(fetcher.fetch(&url()).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_fetch_exhausts_budget() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(5)
            .returning(|_| Err(unavailable()));

        let fetcher = Fetcher::new(transport, retry(5));
        let err = fetcher.fetch(&url()).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::FetchExhausted { attempts: 5, .. }
        ));
    }

    #[tokio::test]
    async fn test_zero_budget_still_tries_once() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Err(unavailable()));

        let fetcher = Fetcher::new(transport, retry(0));
        assert!(fetcher.fetch(&url()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_between_attempts_only() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(3)
            .returning(|_| Err(unavailable()));

        let config = RetryConfig {
            max_attempts: 3,
            retry_delay_seconds: 2.0,
            ..Default::default()
        };
        let fetcher = Fetcher::new(transport, config);

        let start = tokio::time::Instant::now();
        let _ = fetcher.fetch(&url()).await;
        assert_eq!(start.elapsed().as_secs(), 4);
    }

    #[test]
    fn test_http_transport_builds_from_config() {
        assert!(HttpTransport::new(&FetchConfig::default()).is_ok());
        let config = FetchConfig::default()
            .with_timeout(3.0)
            .with_user_agent("tenderscrape-test/1.0");
        assert!(HttpTransport::new(&config).is_ok());
    }
}
