use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::ListingRecord;

mod sqlite;
pub use sqlite::SqliteStore;

/// Result of an insert-if-absent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written with this `added_at`.
    Inserted(DateTime<Utc>),
    /// The id was already present; nothing changed.
    AlreadyPresent,
}

/// Durable set of listing ids seen by earlier runs, plus the records themselves.
///
/// Inserts are atomic per record. The snapshot returned by `existing_ids` is not
/// isolated from other writers, so runs must not overlap.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Create the backing schema if it does not exist yet. Safe to repeat.
    async fn initialize(&self) -> Result<()>;

    /// Every id persisted so far, including previous runs.
    async fn existing_ids(&self) -> Result<HashSet<String>>;

    /// Persist `record` under its id unless that id is already known.
    /// `added_at` is assigned here; the record's own value is ignored.
    async fn insert_if_absent(&self, record: &ListingRecord) -> Result<InsertOutcome>;
}
