//! Field locators: small declarative strategies that pull one value out of a
//! parsed detail page.
//!
//! Each locator either finds non-empty text (`Ok(Some(_))`), finds nothing
//! (`Ok(None)`), or fails because one of its selectors does not parse
//! (`Err(_)`). Locators never panic on malformed markup.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::errors::ScrapeError;

/// A single strategy for locating a field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// Text of the first element matching `selector`.
    Css {
        /// CSS selector.
        selector: String,
    },
    /// A number element, joined with a creation date element when present.
    ///
    /// Without a date the number is kept only if it contains a digit.
    NumberWithDate {
        /// Selector for the number element.
        number: String,
        /// Selector for the date element.
        date: String,
    },
    /// Text of the first `target` element after a label, in document order.
    FollowingLabel {
        /// Selector for label candidates.
        label: String,
        /// Substring the label's own text must contain.
        contains: String,
        /// Selector the value element must match.
        target: String,
    },
    /// Text of the first later sibling of a label matching `sibling`.
    SiblingOfLabel {
        /// Selector for label candidates.
        label: String,
        /// Substring the label's own text must contain.
        contains: String,
        /// Selector the sibling must match.
        sibling: String,
    },
    /// Date and time pair from the block enclosing a label.
    ///
    /// The block is the label's closest ancestor matching `block`; a label
    /// outside any such block resolves to nothing.
    LabelledBlock {
        /// Selector for label candidates.
        label: String,
        /// Substring the label's own text must contain.
        contains: String,
        /// Selector for the enclosing block.
        block: String,
        /// Selector for the value container inside the block.
        field: String,
        /// Selector for the date part inside the container.
        date: String,
        /// Selector for the time part inside the container.
        time: String,
    },
}

impl Locator {
    /// Shorthand for [`Locator::Css`].
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css {
            selector: selector.into(),
        }
    }

    /// Shorthand for [`Locator::FollowingLabel`].
    #[must_use]
    pub fn following_label(
        label: impl Into<String>,
        contains: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::FollowingLabel {
            label: label.into(),
            contains: contains.into(),
            target: target.into(),
        }
    }

    /// Shorthand for [`Locator::SiblingOfLabel`].
    #[must_use]
    pub fn sibling_of_label(
        label: impl Into<String>,
        contains: impl Into<String>,
        sibling: impl Into<String>,
    ) -> Self {
        Self::SiblingOfLabel {
            label: label.into(),
            contains: contains.into(),
            sibling: sibling.into(),
        }
    }

    /// Short name used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Css { .. } => "css",
            Self::NumberWithDate { .. } => "number_with_date",
            Self::FollowingLabel { .. } => "following_label",
            Self::SiblingOfLabel { .. } => "sibling_of_label",
            Self::LabelledBlock { .. } => "labelled_block",
        }
    }

    /// Runs the locator against a document.
    pub fn locate(&self, doc: &Html) -> Result<Option<String>, ScrapeError> {
        let value = match self {
            Self::Css { selector } => {
                let selector = parse_selector(selector)?;
                doc.select(&selector).next().map(element_text)
            }
            Self::NumberWithDate { number, date } => {
                let number = parse_selector(number)?;
                let date = parse_selector(date)?;
                locate_number(doc, &number, &date)
            }
            Self::FollowingLabel {
                label,
                contains,
                target,
            } => {
                let label = parse_selector(label)?;
                let target = parse_selector(target)?;
                find_label(doc, &label, contains).and_then(|found| {
                    following(doc, found)
                        .find(|el| target.matches(el))
                        .map(element_text)
                })
            }
            Self::SiblingOfLabel {
                label,
                contains,
                sibling,
            } => {
                let label = parse_selector(label)?;
                let sibling = parse_selector(sibling)?;
                find_label(doc, &label, contains).and_then(|found| {
                    found
                        .next_siblings()
                        .filter_map(ElementRef::wrap)
                        .find(|el| sibling.matches(el))
                        .map(element_text)
                })
            }
            Self::LabelledBlock {
                label,
                contains,
                block,
                field,
                date,
                time,
            } => {
                let selectors = BlockSelectors {
                    label: parse_selector(label)?,
                    block: parse_selector(block)?,
                    field: parse_selector(field)?,
                    date: parse_selector(date)?,
                    time: parse_selector(time)?,
                };
                locate_block(doc, &selectors, contains)
            }
        };
        Ok(value.filter(|text| !text.is_empty()))
    }
}

struct BlockSelectors {
    label: Selector,
    block: Selector,
    field: Selector,
    date: Selector,
    time: Selector,
}

fn locate_number(doc: &Html, number: &Selector, date: &Selector) -> Option<String> {
    let number = doc.select(number).next().map(element_text)?;
    let date = doc
        .select(date)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    match date {
        Some(date) => Some(format!("{number} {date}")),
        None if number.chars().any(|c| c.is_ascii_digit()) => Some(number),
        None => None,
    }
}

fn locate_block(doc: &Html, selectors: &BlockSelectors, contains: &str) -> Option<String> {
    let label = find_label(doc, &selectors.label, contains)?;
    let block = label
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| selectors.block.matches(el))?;
    let field = block.select(&selectors.field).next()?;

    let part = |selector: &Selector| {
        field
            .select(selector)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
    };

    match (part(&selectors.date), part(&selectors.time)) {
        (Some(date), Some(time)) => Some(format!("{date} {time}")),
        (Some(date), None) => Some(date),
        _ => None,
    }
}

/// Parses a CSS selector into a [`ScrapeError`] on failure.
pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::selector(selector, e))
}

/// Visible text of an element, trimmed at both ends.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of an element's direct text children only.
#[must_use]
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| &**text))
        .collect()
}

/// First element matching `label` whose own text contains `needle`.
///
/// Matching is a case-sensitive substring test.
fn find_label<'a>(doc: &'a Html, label: &Selector, needle: &str) -> Option<ElementRef<'a>> {
    doc.select(label).find(|el| own_text(*el).contains(needle))
}

/// Every element after `anchor` in document order, including its descendants.
fn following<'a>(doc: &'a Html, anchor: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    let anchor_id = anchor.id();
    doc.tree
        .root()
        .descendants()
        .skip_while(move |node| node.id() != anchor_id)
        .skip(1)
        .filter_map(ElementRef::wrap)
}
