//! SQLite store for tender records.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use super::TenderSink;
use crate::errors::ScrapeError;
use crate::record::TenderRecord;

/// SQL schema for the tenders table.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS tenders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT,
    number TEXT,
    customer TEXT,
    subject TEXT,
    price TEXT,
    end_date TEXT,
    location TEXT,
    okpd2 TEXT
)
";

const INSERT_SQL: &str = r"
INSERT OR REPLACE INTO tenders (url, number, customer, subject, price, end_date, location, okpd2)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";

const LIST_SQL: &str = r"
SELECT id,
       COALESCE(url, 'N/A') AS url,
       COALESCE(number, 'N/A') AS number,
       COALESCE(customer, 'N/A') AS customer,
       COALESCE(subject, 'N/A') AS subject,
       COALESCE(price, 'N/A') AS price,
       COALESCE(end_date, 'N/A') AS end_date,
       COALESCE(location, 'N/A') AS location,
       COALESCE(okpd2, 'N/A') AS okpd2
FROM tenders
ORDER BY id
LIMIT ? OFFSET ?
";

/// A persisted record with its row id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StoredTender {
    /// Row identity, assigned on insert.
    pub id: i64,
    /// The stored fields.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: TenderRecord,
}

/// Counts from a batch upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Rows written.
    pub written: usize,
    /// Rows rejected by the database.
    pub failed: usize,
}

/// Handle to the tenders database.
#[derive(Debug, Clone)]
pub struct TenderStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl TenderStore {
    /// Opens the database for writing, creating the file and table if needed.
    pub async fn create(path: &Path) -> Result<Self, ScrapeError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(30));
        let store = Self::connect(path, options).await?;

        sqlx::query(SCHEMA_SQL).execute(&store.pool).await?;
        Ok(store)
    }

    /// Opens an existing database read-only.
    ///
    /// Fails with [`ScrapeError::StorageUnavailable`] when the file does
    /// not exist; the file is never created here.
    pub async fn open_existing(path: &Path) -> Result<Self, ScrapeError> {
        if !path.is_file() {
            return Err(ScrapeError::StorageUnavailable {
                path: path.to_path_buf(),
            });
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .busy_timeout(Duration::from_secs(5));
        Self::connect(path, options).await
    }

    async fn connect(path: &Path, options: SqliteConnectOptions) -> Result<Self, ScrapeError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    /// The database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts each record as a new row.
    ///
    /// Rows are written independently; a rejected row is logged and counted
    /// and does not stop the rest.
    pub async fn upsert_all(&self, records: &[TenderRecord]) -> UpsertSummary {
        let mut summary = UpsertSummary::default();

        for record in records {
            let [url, number, customer, subject, price, end_date, location, okpd2] = record.values();
            let result = sqlx::query(INSERT_SQL)
                .bind(url)
                .bind(number)
                .bind(customer)
                .bind(subject)
                .bind(price)
                .bind(end_date)
                .bind(location)
                .bind(okpd2)
                .execute(&self.pool)
                .await;

            match result {
                Ok(_) => summary.written += 1,
                Err(e) => {
                    error!(url, error = %e, "Failed to store tender");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Lists stored tenders in row order.
    ///
    /// An offset past the last row yields an empty list. A database without
    /// the tenders table counts as unavailable.
    pub async fn list_tenders(&self, limit: u32, offset: u32) -> Result<Vec<StoredTender>, ScrapeError> {
        sqlx::query_as::<_, StoredTender>(LIST_SQL)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| self.classify(e))
    }

    /// Number of stored rows.
    pub async fn count(&self) -> Result<i64, ScrapeError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tenders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.classify(e))?;
        Ok(count)
    }

    /// Closes the pool.
    pub async fn close(self) {
        self.pool.close().await;
    }

    fn classify(&self, error: sqlx::Error) -> ScrapeError {
        match &error {
            sqlx::Error::Database(db) if db.message().contains("no such table") => {
                ScrapeError::StorageUnavailable {
                    path: self.path.clone(),
                }
            }
            _ => ScrapeError::Storage(error),
        }
    }
}

#[async_trait]
impl TenderSink for TenderStore {
    async fn write(&self, records: &[TenderRecord]) -> Result<usize, ScrapeError> {
        if records.is_empty() {
            warn!(path = %self.path.display(), "No records to write to SQLite");
            return Ok(0);
        }

        let summary = self.upsert_all(records).await;
        info!(
            path = %self.path.display(),
            written = summary.written,
            failed = summary.failed,
            "Saved records to SQLite"
        );
        Ok(summary.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(n: u32) -> TenderRecord {
        TenderRecord {
            url: format!("http://example.com/{n}"),
            number: format!("T-00{n} 0{n}.01.2024"),
            customer: format!("Customer {n}"),
            subject: format!("Subject {n}"),
            price: format!("{n}000"),
            end_date: format!("0{n}.02.2024 10:00"),
            location: format!("Location {n}"),
            okpd2: "12.34.56".to_string(),
        }
    }

    async fn seeded(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("tenders.db");
        let store = TenderStore::create(&path).await.unwrap();
        store.write(&[record(1), record(2), record(3)]).await.unwrap();
        store.close().await;
        path
    }

    #[tokio::test]
    async fn test_list_with_limit_and_offset() {
        let dir = tempfile::tempdir().unwrap();
        let store = TenderStore::open_existing(&seeded(&dir).await).await.unwrap();

        let rows = store.list_tenders(2, 1).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 2);
        assert_eq!(rows[0].record, record(2));
        assert_eq!(rows[1].record.url, "http://example.com/3");
    }

    #[tokio::test]
    async fn test_list_defaults_return_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = TenderStore::open_existing(&seeded(&dir).await).await.unwrap();

        let rows = store.list_tenders(10, 0).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].record.url, "http://example.com/1");
    }

    #[tokio::test]
    async fn test_offset_past_end_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TenderStore::open_existing(&seeded(&dir).await).await.unwrap();

        assert!(store.list_tenders(10, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_database_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        let err = TenderStore::open_existing(&path).await.unwrap_err();

        assert!(err.is_storage_unavailable());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_table_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.db");
        TenderStore::connect(
            &path,
            SqliteConnectOptions::new().filename(&path).create_if_missing(true),
        )
        .await
        .unwrap()
        .close()
        .await;

        let store = TenderStore::open_existing(&path).await.unwrap();
        let err = store.list_tenders(10, 0).await.unwrap_err();
        assert!(err.is_storage_unavailable());
    }

    #[tokio::test]
    async fn test_repeated_runs_append_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenders.db");

        for _ in 0..2 {
            let store = TenderStore::create(&path).await.unwrap();
            let summary = store.upsert_all(&[record(1)]).await;
            assert_eq!(summary, UpsertSummary { written: 1, failed: 0 });
            store.close().await;
        }

        let store = TenderStore::open_existing(&path).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TenderStore::create(&dir.path().join("tenders.db")).await.unwrap();

        assert_eq!(store.write(&[]).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stored_tender_serializes_flat() {
        let tender = StoredTender {
            id: 7,
            record: record(1),
        };
        let json = serde_json::to_value(&tender).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["url"], "http://example.com/1");
        assert_eq!(json["okpd2"], "12.34.56");
    }
}
