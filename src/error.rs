//! Error types for the bank_unifier library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting bank statements.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown source format name.
    #[error("Unknown format {0}")]
    UnknownFormat(String),

    /// Unknown output CSV dialect name.
    #[error("Unknown csv dialect {0}")]
    UnknownDialect(String),

    /// A single input row could not be parsed; aborts the whole file.
    #[error("Parser error in row {row}: {source}")]
    Row {
        /// 1-based row number, counting the skipped header row.
        row: usize,
        source: RowError,
    },

    /// Source file could not be opened.
    #[error("Unable to open {} for reading: {source}", path.display())]
    SourceUnreadable { path: PathBuf, source: io::Error },

    /// Destination file could not be opened.
    #[error("Unable to open {} for writing: {source}", path.display())]
    DestinationUnwritable { path: PathBuf, source: io::Error },

    /// Positional read past the end of the store.
    #[error("Record index {index} out of range (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a single row failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("expected {expected} columns, found {found}")]
    MissingColumns { expected: usize, found: usize },

    #[error("date {value:?} does not match pattern {pattern:?}")]
    InvalidDate { value: String, pattern: &'static str },

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),
}
