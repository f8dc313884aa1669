//! Persistence for extracted records.
//!
//! Two sinks exist: a CSV export and a SQLite store. [`OutputTarget`]
//! picks one from the output path's extension.

mod csv;
mod sqlite;

pub use self::csv::CsvSink;
pub use self::sqlite::{StoredTender, TenderStore, UpsertSummary};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::errors::ScrapeError;
use crate::record::TenderRecord;

/// Destination for a batch of records.
#[async_trait]
pub trait TenderSink: Send + Sync {
    /// Writes `records` and returns how many were persisted.
    ///
    /// An empty batch writes nothing and returns 0.
    async fn write(&self, records: &[TenderRecord]) -> Result<usize, ScrapeError>;
}

/// Output destination chosen from a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Delimited text export.
    Csv(PathBuf),
    /// SQLite database.
    Sqlite(PathBuf),
}

impl OutputTarget {
    /// Classifies `path` by extension.
    ///
    /// `.csv` selects CSV, `.db` and `.sqlite` select SQLite. Matching is
    /// case-insensitive; anything else falls back to CSV with a warning.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScrapeError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ScrapeError::InvalidOutput(
                "output path must not be empty".to_string(),
            ));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        Ok(match extension.as_deref() {
            Some("csv") => Self::Csv(path.to_path_buf()),
            Some("db" | "sqlite") => Self::Sqlite(path.to_path_buf()),
            _ => {
                warn!(path = %path.display(), "Unknown output extension, writing CSV");
                Self::Csv(path.to_path_buf())
            }
        })
    }

    /// The destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Csv(path) | Self::Sqlite(path) => path,
        }
    }

    /// Opens the sink for this destination.
    pub async fn open(&self) -> Result<Box<dyn TenderSink>, ScrapeError> {
        Ok(match self {
            Self::Csv(path) => Box::new(CsvSink::new(path)),
            Self::Sqlite(path) => Box::new(TenderStore::create(path).await?),
        })
    }
}
