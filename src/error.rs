use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    /// Missing or unusable configuration (credentials, numeric settings).
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch listing page: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("Listing page returned status {0}")]
    FetchStatus(reqwest::StatusCode),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// One listing element could not be turned into a record.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// One message chunk could not be delivered.
    #[error("Notification dispatch failed: {0}")]
    NotifyDispatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScoutError>;

impl ScoutError {
    /// Fatal errors abort the run; the rest are logged and the enclosing loop continues.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ScoutError::Extraction(_) | ScoutError::NotifyDispatch(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_item_errors_are_recoverable() {
        assert!(!ScoutError::Extraction("no link".into()).is_fatal());
        assert!(!ScoutError::NotifyDispatch("timeout".into()).is_fatal());
    }

    #[test]
    fn run_level_errors_are_fatal() {
        assert!(ScoutError::Config("TELEGRAM_BOT_TOKEN missing".into()).is_fatal());
        assert!(ScoutError::FetchStatus(reqwest::StatusCode::BAD_GATEWAY).is_fatal());
        assert!(ScoutError::Storage(sqlx::Error::PoolClosed).is_fatal());
    }
}
