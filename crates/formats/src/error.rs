//! Error types for format readers

use thiserror::Error;

/// Format reader errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Missing header row: {0}")]
    MissingHeader(String),
}

/// Result type alias for format operations
pub type Result<T> = std::result::Result<T, Error>;
