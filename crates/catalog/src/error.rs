//! Error types for the catalog crate.

use thiserror::Error;

/// Errors that can occur while loading the candidate catalog.
///
/// Individual malformed records are skipped during loading, not reported
/// here; these variants cover failures that make the whole catalog
/// unusable (missing file, broken JSON).
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error occurred while reading the catalog file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The catalog file is not valid JSON
    #[error("Invalid catalog JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The catalog parsed but is not usable (e.g. not an array of records)
    #[error("Invalid catalog data: {0}")]
    InvalidData(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
