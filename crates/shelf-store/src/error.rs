//! Store error types.

use thiserror::Error;

/// Errors that can occur when reading or writing a record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing database or file could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    Query(String),

    /// Failed to encode or decode a record.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem error while persisting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be decoded.
    #[error("Corrupt record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Query(e.to_string())
    }
}
