//! End-to-end scrape: results pages, then detail pages.

use scraper::Html;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use super::fetcher::{Fetcher, HttpTransport, Transport};
use super::links::LinkCollector;
use super::pagination::{LinkHarvest, Paginator, StopReason};
use crate::config::ScraperConfig;
use crate::errors::ScrapeError;
use crate::extract::DetailExtractor;
use crate::record::TenderRecord;

/// Outcome of a full scrape.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    /// Extracted records, in link order.
    pub records: Vec<TenderRecord>,
    /// Results pages fetched.
    pub pages_fetched: u32,
    /// Detail pages that could not be fetched.
    pub skipped: Vec<String>,
    /// Why link collection ended.
    pub stop: StopReason,
}

/// Collects detail links and turns each detail page into a record.
#[derive(Debug)]
pub struct TenderScraper<T> {
    fetcher: Fetcher<T>,
    collector: LinkCollector,
    extractor: DetailExtractor,
    search_url: Url,
    page_delay: Duration,
    detail_delay: Duration,
}

impl TenderScraper<HttpTransport> {
    /// Creates a scraper that talks to the network.
    pub fn with_http(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        Self::new(config, HttpTransport::new(&config.fetch)?)
    }
}

impl<T: Transport> TenderScraper<T> {
    /// Creates a scraper over an arbitrary transport.
    pub fn new(config: &ScraperConfig, transport: T) -> Result<Self, ScrapeError> {
        config.validate()?;
        Ok(Self {
            fetcher: Fetcher::new(transport, config.fetch.retry.clone()),
            collector: LinkCollector::new(config)?,
            extractor: DetailExtractor::from_config(&config.extraction),
            search_url: config.search_url()?,
            page_delay: config.page_delay(),
            detail_delay: config.detail_delay(),
        })
    }

    /// The transport in use.
    #[must_use]
    pub fn transport(&self) -> &T {
        self.fetcher.transport()
    }

    /// Collects up to `target` unique detail links.
    pub async fn collect_links(&self, target: usize) -> LinkHarvest {
        Paginator::new(&self.fetcher, &self.collector, self.search_url.clone())
            .with_page_delay(self.page_delay)
            .collect_links(target)
            .await
    }

    /// Fetches one detail page and extracts its record.
    pub async fn scrape_detail(&self, url: &Url) -> Result<TenderRecord, ScrapeError> {
        let body = self.fetcher.fetch(url).await?;
        let record = self.extractor.extract(&Html::parse_document(&body), url.as_str());
        Ok(record)
    }

    /// Scrapes up to `max` tenders.
    ///
    /// Detail pages that cannot be fetched are skipped and reported; they
    /// never abort the run.
    pub async fn scrape(&self, max: usize) -> ScrapeReport {
        let harvest = self.collect_links(max).await;
        let total = harvest.links.len();
        let mut records = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        for (index, url) in harvest.links.iter().enumerate() {
            info!(current = index + 1, total, url = %url, "Scraping tender");
            match self.scrape_detail(url).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(url = %url, error = %e, "Skipping tender");
                    skipped.push(url.to_string());
                }
            }

            if !self.detail_delay.is_zero() {
                tokio::time::sleep(self.detail_delay).await;
            }
        }

        info!(
            records = records.len(),
            skipped = skipped.len(),
            pages = harvest.pages_fetched,
            "Scrape finished"
        );
        ScrapeReport {
            records,
            pages_fetched: harvest.pages_fetched,
            skipped,
            stop: harvest.stop,
        }
    }
}
