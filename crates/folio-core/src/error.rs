//! Error types for folio.

use thiserror::Error;

/// Result type alias using folio's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for folio operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Citation not found
    #[error("Citation not found: {0}")]
    CitationNotFound(uuid::Uuid),

    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Citation number already taken; the create path retries before
    /// surfacing this.
    #[error("Citation number conflict: {0}")]
    NumberConflict(i32),

    /// Search operation failed
    #[error("Search error: {0}")]
    Search(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
