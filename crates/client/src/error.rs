//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Cannot read schema file {}: {source}", path.display())]
    SchemaFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Dynamap(#[from] dynamap::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
