//! Detail page extraction.

use scraper::Html;
use tracing::debug;

use super::rules::{default_rules, FieldRule};
use crate::config::ExtractionConfig;
use crate::record::TenderRecord;

/// Turns a parsed detail page into a [`TenderRecord`].
///
/// Extraction is total: every field that no rule resolves keeps the
/// sentinel value, and the record is always complete.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    rules: Vec<FieldRule>,
}

impl Default for DetailExtractor {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl DetailExtractor {
    /// Creates an extractor from an explicit rule table.
    #[must_use]
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Creates an extractor from configuration.
    #[must_use]
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.rules.clone())
    }

    /// The rule table in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Extracts a record from `doc`, which was fetched from `source_url`.
    pub fn extract(&self, doc: &Html, source_url: &str) -> TenderRecord {
        let mut record = TenderRecord::unresolved(source_url);

        for rule in &self.rules {
            match rule.resolve(doc, source_url) {
                Some(value) => record.set(rule.field, value),
                None => debug!(field = %rule.field, url = %source_url, "Field not found"),
            }
        }

        debug!(
            url = %source_url,
            resolved = record.resolved_count(),
            "Extracted tender details"
        );
        record
    }

    /// Parses raw HTML and extracts a record from it.
    pub fn extract_html(&self, html: &str, source_url: &str) -> TenderRecord {
        self.extract(&Html::parse_document(html), source_url)
    }
}
