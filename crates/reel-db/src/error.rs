//! Metadata store error types.

use thiserror::Error;

/// Result type for metadata store operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur against the metadata store.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Failed to configure metadata store: {0}")]
    ConfigError(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptRecord(msg.into())
    }
}
