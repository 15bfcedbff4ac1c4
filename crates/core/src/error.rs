use thiserror::Error;

/// Failures surfaced by a [`StoreExecutor`](crate::StoreExecutor).
///
/// Executors map their transport-specific errors into these variants. They are
/// never retried by dynamap.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Resource in use: {0}")]
    ResourceInUse(String),
    #[error("Request throttled: {0}")]
    Throttled(String),
    #[error("Conditional check failed: {0}")]
    ConditionFailed(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Request failed: {0}")]
    Request(String),
}

/// Errors that can occur while mapping entities to the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Malformed cursor: {0}")]
    MalformedCursor(String),
    #[error("Schema mismatch: expected table '{expected}', found '{found}'")]
    SchemaMismatch { expected: String, found: String },
    #[error("Store request failed: {0}")]
    Store(#[from] StoreError),
    #[error("No fields to update on table '{table}'")]
    NoFieldsToUpdate { table: String },
    #[error("Invalid key field '{field}': {reason}")]
    InvalidKey { field: String, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for mapper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for executor calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
