//! Error types for ROI computation.

use thiserror::Error;

/// Result type for ROI operations.
pub type Result<T> = std::result::Result<T, RoiError>;

/// Errors that can occur during ROI computation.
#[derive(Debug, Error)]
pub enum RoiError {
    /// Loan principal was negative.
    #[error("Negative loan principal: {0}")]
    NegativePrincipal(f64),

    /// Loan terms are outside their valid domain.
    #[error("Invalid loan terms: {0}")]
    InvalidTerms(String),
}
