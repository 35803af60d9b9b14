use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tracing::{debug, info};

use super::{InsertOutcome, SeenStore};
use crate::error::Result;
use crate::models::ListingRecord;

const CREATE_LISTINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS listings (
        id TEXT PRIMARY KEY,
        title TEXT,
        price TEXT,
        url TEXT,
        image_url TEXT,
        added_at TIMESTAMP
    )
"#;

#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: String,
    title: Option<String>,
    price: Option<String>,
    url: Option<String>,
    image_url: Option<String>,
    added_at: Option<DateTime<Utc>>,
}

impl From<ListingRow> for ListingRecord {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            title: row.title.unwrap_or_default(),
            price: row.price.unwrap_or_default(),
            url: row.url.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
            added_at: row.added_at,
        }
    }
}

/// SQLite-backed seen-set. A connection is opened per operation and closed
/// before returning; no handle outlives a call.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }

    /// Number of persisted listings.
    pub async fn count(&self) -> Result<i64> {
        let mut conn = self.connect().await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM listings")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await?;
        Ok(count)
    }

    /// Look up a stored listing by id.
    pub async fn get(&self, id: &str) -> Result<Option<ListingRecord>> {
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, ListingRow>(
            "SELECT id, title, price, url, image_url, added_at FROM listings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;
        Ok(row.map(ListingRecord::from))
    }

    /// Size of the database file on disk, in bytes.
    pub async fn file_size(&self) -> Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }
}

#[async_trait]
impl SeenStore for SqliteStore {
    async fn initialize(&self) -> Result<()> {
        info!("Setting up database at {}", self.path.display());
        let mut conn = self.connect().await?;
        sqlx::query(CREATE_LISTINGS).execute(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }

    async fn existing_ids(&self) -> Result<HashSet<String>> {
        let mut conn = self.connect().await?;
        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM listings")
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;
        info!("Found {} existing listings in database", ids.len());
        Ok(ids.into_iter().collect())
    }

    async fn insert_if_absent(&self, record: &ListingRecord) -> Result<InsertOutcome> {
        let added_at = Utc::now();
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO listings (id, title, price, url, image_url, added_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(&record.price)
        .bind(&record.url)
        .bind(&record.image_url)
        .bind(added_at)
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        if result.rows_affected() > 0 {
            Ok(InsertOutcome::Inserted(added_at))
        } else {
            debug!("Listing already exists: {}", record.id);
            Ok(InsertOutcome::AlreadyPresent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;

    fn store_in(dir: &tempfile::TempDir) -> SqliteStore {
        SqliteStore::new(dir.path().join("listings.db"))
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.initialize().await.unwrap();
        store.initialize().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.file_size().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn second_insert_keeps_first_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.initialize().await.unwrap();

        let first = ListingRecord::new("12345", "BMW 240", "€12000", "/obiava-12345-bmw");
        let changed = ListingRecord::new("12345", "BMW 240 updated", "€9000", "/obiava-12345-new");

        let outcome = store.insert_if_absent(&first).await.unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));
        assert_eq!(
            store.insert_if_absent(&changed).await.unwrap(),
            InsertOutcome::AlreadyPresent
        );

        let stored = store.get("12345").await.unwrap().unwrap();
        assert_eq!(stored.title, "BMW 240");
        assert_eq!(stored.price, "€12000");
        assert_eq!(stored.url, "/obiava-12345-bmw");
        assert!(stored.added_at.is_some());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ids_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = store_in(&dir);
            store.initialize().await.unwrap();
            store
                .insert_if_absent(&ListingRecord::new("1", "a", "N/A", "/obiava-1"))
                .await
                .unwrap();
        }

        let reopened = store_in(&dir);
        let ids = reopened.existing_ids().await.unwrap();
        assert!(ids.contains("1"));
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn unreadable_store_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        let store = SqliteStore::new(&path);
        let err = store.existing_ids().await.unwrap_err();
        assert!(matches!(err, ScoutError::Storage(_)));
        assert!(err.is_fatal());
    }
}
