//! Error type for loading, validating, and saving settings.

use std::path::PathBuf;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// What can go wrong while handling configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A config file (or its parent directory) could not be written.
    #[error("cannot write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid TOML, or not the shape this crate expects.
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The in-memory config could not be rendered back to TOML.
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed fine but fails validation.
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}
