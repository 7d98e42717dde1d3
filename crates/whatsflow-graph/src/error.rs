//! Error types for the graph crate.

use thiserror::Error;

/// Result type alias using the graph error type.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error type for graph document operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge endpoint named a node the document does not have.
    #[error("graph has no node '{0}'")]
    UnknownNode(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
