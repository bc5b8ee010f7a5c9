//! Error types for the core loading engine

use thiserror::Error;

/// Core loading errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(#[from] rowcast_formats::Error),

    #[error("Filter error: {0}")]
    Filter(#[from] rowcast_filters::Error),

    #[error("Row at line {line} has {got} fields, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("Unknown field '{field}'. Valid fields are: {available:?}")]
    UnknownField {
        field: String,
        available: Vec<String>,
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
