//! Error types for dnagreet-core

use thiserror::Error;

/// Main error type for the dnagreet-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Visit store cannot be read or written
    #[error("visit store unavailable: {0}")]
    StoreUnavailable(String),

    /// Logging setup error
    #[error("logging error: {0}")]
    Logging(String),
}

/// Result type alias for dnagreet-core
pub type Result<T> = std::result::Result<T, Error>;
