//! Error types for ingestion.

use thiserror::Error;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur while reading and normalizing spreadsheets.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Workbook could not be opened or parsed.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// The workbook has no usable sheet.
    #[error("Missing sheet: {0}")]
    MissingSheet(String),

    /// The sheet does not have the expected shape.
    #[error("Unexpected sheet shape: {0}")]
    Shape(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
