//! Error types for the store crate.

use thiserror::Error;

/// Result type alias using the store error type.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for playground store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
