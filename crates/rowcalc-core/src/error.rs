//! Error types for rowcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rowcalc-core
#[derive(Debug, Error)]
pub enum Error {
    /// Column not found by name
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column length does not match the table's row count
    #[error("Column '{name}' has {actual} values, table has {expected} rows")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Derived-column alias already registered
    #[error("Derived column already exists: {0}")]
    DuplicateAlias(String),

    /// Derived-column alias not registered
    #[error("Unknown derived column: {0}")]
    UnknownAlias(String),

    /// Value cannot be cast to the requested column type
    #[error("Cannot cast value {value} to {target}")]
    UnsupportedCast { value: String, target: String },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
