//! Error types for the scheduler model and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating scheduler configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration JSON is malformed or has the wrong shape.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration parsed but violates a scheduling constraint.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Unknown event category label.
    #[error("unknown event category '{0}'")]
    UnknownCategory(String),

    /// Unknown projection offset label.
    #[error("unknown offset '{0}'")]
    UnknownOffset(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
