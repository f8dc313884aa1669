//! Detail page extraction.
//!
//! This module provides:
//! - Declarative field locators with fallback chains
//! - The default rule table for tender detail pages
//! - The total extractor producing complete records

mod extractor;
mod locator;
mod rules;

pub use extractor::DetailExtractor;
pub use locator::{element_text, parse_selector, Locator};
pub use rules::{default_rules, FieldRule};
