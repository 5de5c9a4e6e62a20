//! Listing error types.

use thiserror::Error;

/// Errors that can occur while handling listing payloads.
///
/// The statistics engine itself never fails; these cover the edges where
/// external input enters the domain.
#[derive(Error, Debug)]
pub enum ListingError {
    /// Listing is missing its url.
    #[error("Listing is missing a url")]
    MissingUrl,

    /// Ingest batch has no keyword.
    #[error("Ingest batch is missing a keyword")]
    MissingKeyword,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for ListingError {
    fn from(e: serde_json::Error) -> Self {
        ListingError::SerializationError(e.to_string())
    }
}
