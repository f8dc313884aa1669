//! Detail link collection from a results page.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::config::ScraperConfig;
use crate::errors::ScrapeError;
use crate::extract::parse_selector;

/// Extracts absolute detail page links from a parsed results page.
///
/// Summary blocks are the primary source. When a page has none, every
/// anchor whose target contains the detail path segment is used instead.
#[derive(Debug, Clone)]
pub struct LinkCollector {
    base: Url,
    summary: Selector,
    heading_anchor: Selector,
    anchor: Selector,
    detail_segment: String,
}

impl LinkCollector {
    /// Builds a collector from configuration.
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            base: config.base()?,
            summary: parse_selector(&config.summary_selector)?,
            heading_anchor: parse_selector(
                "h1 a[href], h2 a[href], h3 a[href], h4 a[href], h5 a[href], h6 a[href]",
            )?,
            anchor: parse_selector("a[href]")?,
            detail_segment: config.detail_path_segment.clone(),
        })
    }

    /// Collects unique links in document order.
    ///
    /// Summary blocks without an anchor contribute nothing; the anchor
    /// fallback only runs when the page has no summary blocks at all.
    pub fn collect(&self, doc: &Html) -> Vec<Url> {
        let mut seen = HashSet::new();
        let blocks: Vec<ElementRef<'_>> = doc.select(&self.summary).collect();

        if !blocks.is_empty() {
            return blocks
                .into_iter()
                .filter_map(|block| self.summary_anchor(block))
                .filter_map(|href| self.resolve(href))
                .filter(|url| seen.insert(url.clone()))
                .collect();
        }

        let fallback: Vec<Url> = doc
            .select(&self.anchor)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| href.contains(&self.detail_segment))
            .filter_map(|href| self.resolve(href))
            .filter(|url| seen.insert(url.clone()))
            .collect();

        if !fallback.is_empty() {
            debug!(count = fallback.len(), "No summary blocks, used anchor fallback");
        }
        fallback
    }

    fn summary_anchor<'a>(&self, block: ElementRef<'a>) -> Option<&'a str> {
        block
            .select(&self.heading_anchor)
            .next()
            .or_else(|| block.select(&self.anchor).next())
            .and_then(|a| a.value().attr("href"))
    }

    fn resolve(&self, href: &str) -> Option<Url> {
        match self.base.join(href.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!(href, error = %e, "Skipping unresolvable link");
                None
            }
        }
    }
}
