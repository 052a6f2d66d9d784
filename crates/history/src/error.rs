//! Error types for watch-history ingest.

use thiserror::Error;

/// Errors that can occur while reading a watch-history export.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// I/O error occurred while reading the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV itself could not be read
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// No recognizable title column in the header row
    #[error("No title column found; expected one of {expected}")]
    MissingTitleColumn { expected: &'static str },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, HistoryError>;
