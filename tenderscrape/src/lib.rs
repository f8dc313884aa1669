//! # Tenderscrape
//!
//! A crawler for the rostender.info public procurement listing.
//!
//! Tenderscrape walks the paginated search results, collects links to tender
//! detail pages and turns each detail page into a flat [`TenderRecord`]:
//!
//! - **Bounded fetching**: every request retries up to a fixed budget
//! - **Total extraction**: missing fields become `"N/A"`, never errors
//! - **Declarative rules**: per-field locator chains, overridable from config
//! - **Pluggable output**: CSV export or a SQLite store read by the HTTP API
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tenderscrape::prelude::*;
//!
//! let config = ScraperConfig::new();
//! let scraper = TenderScraper::with_http(&config)?;
//! let report = scraper.scrape(20).await;
//!
//! let sink = OutputTarget::from_path("tenders.db")?.open().await?;
//! sink.write(&report.records).await?;
//! ```
//!
//! [`TenderRecord`]: record::TenderRecord

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod crawl;
pub mod errors;
pub mod extract;
pub mod observability;
pub mod record;
pub mod sink;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ExtractionConfig, FetchConfig, RetryConfig, ScraperConfig};
    pub use crate::crawl::{
        page_url, Fetcher, HttpTransport, LinkCollector, LinkHarvest, Paginator, ScrapeReport,
        StopReason, TenderScraper, Transport,
    };
    pub use crate::errors::ScrapeError;
    pub use crate::extract::{default_rules, DetailExtractor, FieldRule, Locator};
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::record::{TenderField, TenderRecord, NOT_AVAILABLE};
    pub use crate::sink::{CsvSink, OutputTarget, StoredTender, TenderSink, TenderStore};
}
