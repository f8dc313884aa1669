//! Crawling: fetching, link collection and pagination.

mod fetcher;
mod links;
mod pagination;
mod scrape;

#[cfg(test)]
mod integration_tests;

pub use fetcher::{Fetcher, HttpTransport, Transport};
pub use links::LinkCollector;
pub use pagination::{page_url, LinkHarvest, Paginator, StopReason};
pub use scrape::{ScrapeReport, TenderScraper};
