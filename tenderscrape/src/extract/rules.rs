//! Per-field locator chains.

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::locator::Locator;
use crate::record::TenderField;

/// The ordered fallback chain for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// The field this rule fills.
    pub field: TenderField,
    /// Locators tried in order until one yields non-empty text.
    pub locators: Vec<Locator>,
}

impl FieldRule {
    /// Creates a rule from a field and its locators.
    #[must_use]
    pub fn new(field: TenderField, locators: Vec<Locator>) -> Self {
        Self { field, locators }
    }

    /// Resolves the field, or `None` when every locator comes up empty.
    ///
    /// A locator that errors is logged and skipped; the rest still run.
    pub fn resolve(&self, doc: &Html, source_url: &str) -> Option<String> {
        self.locators.iter().find_map(|locator| match locator.locate(doc) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    field = %self.field,
                    locator = locator.kind(),
                    url = %source_url,
                    error = %e,
                    "Field locator failed"
                );
                None
            }
        })
    }
}

/// The built-in rule table for tender detail pages.
#[must_use]
pub fn default_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            TenderField::Number,
            vec![Locator::NumberWithDate {
                number: "div.tender-info-header-number".to_string(),
                date: "div.tender-info-header-start_date".to_string(),
            }],
        ),
        FieldRule::new(
            TenderField::Customer,
            vec![
                Locator::following_label("div", "Покупатель", "div"),
                Locator::following_label("div", "Покупатель", "span"),
                Locator::css("div.customer-name"),
            ],
        ),
        FieldRule::new(
            TenderField::Subject,
            vec![
                Locator::css(r#"h1[data-id="name"]"#),
                Locator::css("h1.tender-header__h4"),
            ],
        ),
        FieldRule::new(
            TenderField::Price,
            vec![Locator::sibling_of_label(
                "span",
                "Начальная цена",
                "span.tender-body__field",
            )],
        ),
        FieldRule::new(
            TenderField::EndDate,
            vec![Locator::LabelledBlock {
                label: "span".to_string(),
                contains: "Окончание".to_string(),
                block: "div.tender-body__block".to_string(),
                field: "span.tender-body__field".to_string(),
                date: "span.black".to_string(),
                time: "span.tender__countdown-container".to_string(),
            }],
        ),
        FieldRule::new(
            TenderField::Location,
            vec![Locator::css(r#"div[data-id="place"]"#)],
        ),
        FieldRule::new(
            TenderField::Okpd2,
            vec![
                Locator::following_label("div", "ОКПД2", "div"),
                Locator::following_label("div", "ОКПД2", "span"),
            ],
        ),
    ]
}
