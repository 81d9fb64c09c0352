//! Error types for the fact store.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A year has no dimension row.
    #[error("No year dimension row for {0}")]
    YearNotFound(i32),

    /// A (gender, race) pair has no demographic dimension row.
    #[error("No demographic dimension row for gender '{gender}' and race '{race}'")]
    DemographicNotFound {
        /// Gender code that was looked up.
        gender: String,
        /// Race code that was looked up.
        race: String,
    },
}
