//! Error types for the penyata-core library.

use thiserror::Error;

/// Main error type for the penyata library.
#[derive(Error, Debug)]
pub enum PenyataError {
    /// Text acquisition error.
    #[error("acquisition error: {0}")]
    Acquire(#[from] AcquireError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to obtaining text from a source document.
#[derive(Error, Debug)]
pub enum AcquireError {
    /// The document could not be read from disk.
    #[error("failed to read document: {0}")]
    DocumentRead(#[from] std::io::Error),

    /// The declared format has no text acquisition strategy.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The external conversion tool failed or produced nothing.
    #[error("text conversion tool failed: {0}")]
    Tool(String),
}

/// Result type for the penyata library.
pub type Result<T> = std::result::Result<T, PenyataError>;
