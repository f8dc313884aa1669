//! CSV export.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::TenderSink;
use crate::errors::ScrapeError;
use crate::record::TenderRecord;

/// Writes records to a CSV file, replacing any previous content.
///
/// The header row uses the site's display labels.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Creates a sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The destination file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_records(&self, records: &[TenderRecord]) -> Result<(), ScrapeError> {
        let mut writer = ::csv::Writer::from_path(&self.path)?;
        writer.write_record(TenderRecord::labels())?;
        for record in records {
            writer.write_record(record.values())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl TenderSink for CsvSink {
    async fn write(&self, records: &[TenderRecord]) -> Result<usize, ScrapeError> {
        if records.is_empty() {
            warn!(path = %self.path.display(), "No records to write to CSV");
            return Ok(0);
        }

        self.write_records(records)?;
        info!(path = %self.path.display(), count = records.len(), "Saved records to CSV");
        Ok(records.len())
    }
}
