//! Results page traversal.

use scraper::Html;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::fetcher::{Fetcher, Transport};
use super::links::LinkCollector;

/// Why link collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The requested number of links was collected.
    TargetReached,
    /// A results page contained no links at all.
    Exhausted {
        /// The empty page.
        page: u32,
    },
    /// A results page only repeated links seen earlier.
    NoNewLinks {
        /// The repeating page.
        page: u32,
    },
    /// A results page could not be fetched within the retry budget.
    FetchFailed {
        /// The failing page.
        page: u32,
    },
}

/// Links gathered from the results pages.
#[derive(Debug, Clone)]
pub struct LinkHarvest {
    /// Unique detail links, first-seen order, at most the target.
    pub links: Vec<Url>,
    /// Number of results pages fetched successfully.
    pub pages_fetched: u32,
    /// Why traversal ended.
    pub stop: StopReason,
}

/// Address of results page `page`.
///
/// Page 1 is the search address itself. Later pages set the `page` query
/// parameter, replacing any existing one and keeping every other pair.
#[must_use]
pub fn page_url(search_url: &Url, page: u32) -> Url {
    if page <= 1 {
        return search_url.clone();
    }

    let retained: Vec<(String, String)> = search_url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = search_url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string());
    url
}

/// Walks results pages until enough links are collected.
pub struct Paginator<'a, T> {
    fetcher: &'a Fetcher<T>,
    collector: &'a LinkCollector,
    search_url: Url,
    page_delay: Duration,
}

impl<'a, T: Transport> Paginator<'a, T> {
    /// Creates a paginator over `search_url`.
    #[must_use]
    pub fn new(fetcher: &'a Fetcher<T>, collector: &'a LinkCollector, search_url: Url) -> Self {
        Self {
            fetcher,
            collector,
            search_url,
            page_delay: Duration::ZERO,
        }
    }

    /// Sets the pause between consecutive results pages.
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Collects up to `target` unique detail links.
    ///
    /// Stops at the target, at a page with no links, at a page that adds no
    /// new links, or at a page that cannot be fetched. Whatever was collected
    /// before a failure is kept.
    pub async fn collect_links(&self, target: usize) -> LinkHarvest {
        let mut links = Vec::new();
        let mut seen = HashSet::new();
        let mut pages_fetched = 0;
        let mut page = 1;

        if target == 0 {
            return LinkHarvest {
                links,
                pages_fetched,
                stop: StopReason::TargetReached,
            };
        }

        let stop = loop {
            let url = page_url(&self.search_url, page);
            info!(page, url = %url, "Fetching results page");

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(page, error = %e, "Stopping at unreachable results page");
                    break StopReason::FetchFailed { page };
                }
            };
            pages_fetched += 1;

            let found = self.collector.collect(&Html::parse_document(&body));
            if found.is_empty() {
                debug!(page, "Results page has no links");
                break StopReason::Exhausted { page };
            }

            let before = links.len();
            for link in found {
                if links.len() >= target {
                    break;
                }
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
            let added = links.len() - before;
            debug!(page, added, total = links.len(), "Collected links");

            if links.len() >= target {
                break StopReason::TargetReached;
            }
            if added == 0 {
                break StopReason::NoNewLinks { page };
            }

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
            page += 1;
        };

        info!(links = links.len(), pages_fetched, ?stop, "Link collection finished");
        LinkHarvest {
            links,
            pages_fetched,
            stop,
        }
    }
}
