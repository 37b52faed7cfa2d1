//! Error types for tzdb-import

use thiserror::Error;

/// Common result type for importer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Importer error types
///
/// Fetch failures never appear here: the TimeZoneDB client converts them to
/// `Result<_, String>` at the fetch boundary and the orchestrator records
/// them in the error_log table. Only database driver failures, IO failures,
/// and configuration problems abort a run.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
