//! Error types for Kiwi

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Whether this error means the backing store could not be reached.
    ///
    /// Callers should retry these (with backoff) rather than drop the write.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Error::Pool(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
