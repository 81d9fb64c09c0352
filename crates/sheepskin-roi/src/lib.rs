#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod amortize;
pub mod error;
pub mod metrics;

pub use amortize::LoanTerms;
pub use error::{Result, RoiError};
pub use metrics::{CohortInput, RoiMetrics};
