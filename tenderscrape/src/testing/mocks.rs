//! In-memory transports for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use url::Url;

use crate::crawl::Transport;
use crate::errors::ScrapeError;

/// A transport serving canned bodies keyed by absolute URL.
///
/// Unknown URLs answer 404. URLs can be scripted to fail a number of
/// times before succeeding, or forever.
#[derive(Debug, Default)]
pub struct StaticTransport {
    pages: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<String>>,
}

impl StaticTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` at `url`.
    #[must_use]
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.lock().insert(url.into(), body.into());
        self
    }

    /// Fails the next `times` requests to `url` with a 503.
    #[must_use]
    pub fn with_failures(self, url: impl Into<String>, times: usize) -> Self {
        self.failures.lock().insert(url.into(), times);
        self
    }

    /// Fails every request to `url`.
    #[must_use]
    pub fn failing(self, url: impl Into<String>) -> Self {
        self.with_failures(url, usize::MAX)
    }

    /// Every requested URL, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of requests made to `url`.
    #[must_use]
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|called| *called == url).count()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &Url) -> Result<String, ScrapeError> {
        let key = url.to_string();
        self.calls.lock().push(key.clone());

        if let Some(remaining) = self.failures.lock().get_mut(&key) {
            if *remaining > 0 {
                if *remaining != usize::MAX {
                    *remaining -= 1;
                }
                return Err(ScrapeError::Status {
                    url: key,
                    status: 503,
                });
            }
        }

        self.pages
            .lock()
            .get(&key)
            .cloned()
            .ok_or(ScrapeError::Status {
                url: key,
                status: 404,
            })
    }
}
