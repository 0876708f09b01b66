//! Error types for the treequote binary.

use std::path::PathBuf;

use thiserror::Error;
use treequote_engine::PricingError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The engine rejected the inputs.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Failed to read an input file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a record file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write command output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON did not match the expected record shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record referenced something that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration could not be used.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CliError>;
