//! The tender record model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker stored in any field that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// An extractable field of a tender record.
///
/// `url` is not listed: it is always known up front and never extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenderField {
    /// Tender identifier, optionally followed by its creation date.
    Number,
    /// Purchasing entity.
    Customer,
    /// Procurement title.
    Subject,
    /// Starting price, verbatim.
    Price,
    /// Submission deadline.
    EndDate,
    /// Place of delivery.
    Location,
    /// OKPD2 classification code.
    Okpd2,
}

impl TenderField {
    /// All extractable fields in column order.
    pub const ALL: [Self; 7] = [
        Self::Number,
        Self::Customer,
        Self::Subject,
        Self::Price,
        Self::EndDate,
        Self::Location,
        Self::Okpd2,
    ];

    /// Database column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Customer => "customer",
            Self::Subject => "subject",
            Self::Price => "price",
            Self::EndDate => "end_date",
            Self::Location => "location",
            Self::Okpd2 => "okpd2",
        }
    }

    /// Display label used as the CSV header, as shown on the site.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Number => "Номер и дата создания тендера",
            Self::Customer => "Покупатель",
            Self::Subject => "Предмет тендера",
            Self::Price => "Цена",
            Self::EndDate => "Окончание (МСК)",
            Self::Location => "Место поставки",
            Self::Okpd2 => "okpd2",
        }
    }
}

impl fmt::Display for TenderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One extracted tender.
///
/// Always carries all eight fields; unresolved ones hold [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TenderRecord {
    /// Detail page address.
    pub url: String,
    /// Tender number and creation date.
    pub number: String,
    /// Purchasing entity.
    pub customer: String,
    /// Procurement title.
    pub subject: String,
    /// Starting price.
    pub price: String,
    /// Submission deadline.
    pub end_date: String,
    /// Place of delivery.
    pub location: String,
    /// OKPD2 classification code.
    pub okpd2: String,
}

impl TenderRecord {
    /// Label of the URL column in CSV exports.
    pub const URL_LABEL: &'static str = "Ссылка";

    /// Creates a record for `url` with every other field unresolved.
    #[must_use]
    pub fn unresolved(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            number: NOT_AVAILABLE.to_string(),
            customer: NOT_AVAILABLE.to_string(),
            subject: NOT_AVAILABLE.to_string(),
            price: NOT_AVAILABLE.to_string(),
            end_date: NOT_AVAILABLE.to_string(),
            location: NOT_AVAILABLE.to_string(),
            okpd2: NOT_AVAILABLE.to_string(),
        }
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, field: TenderField) -> &str {
        match field {
            TenderField::Number => &self.number,
            TenderField::Customer => &self.customer,
            TenderField::Subject => &self.subject,
            TenderField::Price => &self.price,
            TenderField::EndDate => &self.end_date,
            TenderField::Location => &self.location,
            TenderField::Okpd2 => &self.okpd2,
        }
    }

    pub(crate) fn set(&mut self, field: TenderField, value: String) {
        let slot = match field {
            TenderField::Number => &mut self.number,
            TenderField::Customer => &mut self.customer,
            TenderField::Subject => &mut self.subject,
            TenderField::Price => &mut self.price,
            TenderField::EndDate => &mut self.end_date,
            TenderField::Location => &mut self.location,
            TenderField::Okpd2 => &mut self.okpd2,
        };
        *slot = value;
    }

    /// Whether a field holds an extracted value.
    #[must_use]
    pub fn is_resolved(&self, field: TenderField) -> bool {
        self.get(field) != NOT_AVAILABLE
    }

    /// Number of extracted fields that were resolved.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        TenderField::ALL
            .iter()
            .filter(|field| self.is_resolved(**field))
            .count()
    }

    /// All eight values in column order, `url` first.
    #[must_use]
    pub fn values(&self) -> [&str; 8] {
        [
            &self.url,
            &self.number,
            &self.customer,
            &self.subject,
            &self.price,
            &self.end_date,
            &self.location,
            &self.okpd2,
        ]
    }

    /// CSV header labels matching [`TenderRecord::values`].
    #[must_use]
    pub fn labels() -> [&'static str; 8] {
        let mut labels = [Self::URL_LABEL; 8];
        for (slot, field) in labels.iter_mut().skip(1).zip(TenderField::ALL) {
            *slot = field.label();
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unresolved_record_has_sentinels() {
        let record = TenderRecord::unresolved("https://example.com/tender/1");
        assert_eq!(record.url, "https://example.com/tender/1");
        for field in TenderField::ALL {
            assert_eq!(record.get(field), NOT_AVAILABLE);
            assert!(!record.is_resolved(field));
        }
        assert_eq!(record.resolved_count(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut record = TenderRecord::unresolved("u");
        record.set(TenderField::Price, "100 руб.".to_string());
        record.set(TenderField::EndDate, "01.01.2025".to_string());

        assert_eq!(record.get(TenderField::Price), "100 руб.");
        assert_eq!(record.end_date, "01.01.2025");
        assert_eq!(record.resolved_count(), 2);
    }

    #[test]
    fn test_labels_line_up_with_values() {
        let labels = TenderRecord::labels();
        assert_eq!(labels[0], "Ссылка");
        assert_eq!(labels[1], "Номер и дата создания тендера");
        assert_eq!(labels[7], "okpd2");

        let mut record = TenderRecord::unresolved("u");
        record.set(TenderField::Customer, "Покупатель 1".to_string());
        assert_eq!(record.values()[2], "Покупатель 1");
        assert_eq!(labels[2], "Покупатель");
    }

    #[test]
    fn test_field_serializes_as_column_name() {
        let json = serde_json::to_string(&TenderField::EndDate).unwrap();
        assert_eq!(json, "\"end_date\"");
        assert_eq!(TenderField::EndDate.to_string(), "end_date");
    }
}
