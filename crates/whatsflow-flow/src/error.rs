//! Error types for the flow crate.

use thiserror::Error;
use whatsflow_types::ScreenId;

/// Result type alias using the flow error type.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Error type for flow document operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The document is not valid JSON or does not match the flow schema.
    #[error("Failed to parse flow JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A screen id was referenced that does not exist in the document.
    #[error("Screen not found: {0}")]
    ScreenNotFound(ScreenId),

    /// The document has no screens.
    #[error("Flow document has no screens")]
    Empty,

    /// IO error while reading or writing a document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
