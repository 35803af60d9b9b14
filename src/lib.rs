pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod scrapers;
pub mod storage;

pub use config::Config;
pub use error::{Result, ScoutError};
pub use models::ListingRecord;
pub use notify::{MessageChannel, Notifier};
pub use pipeline::{IngestionPipeline, RunReport};
pub use scrapers::ListingSource;
pub use storage::{SeenStore, SqliteStore};
