#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{CostEntry, FactEntry, FactStore, RoiSummaryRow, SurveyBlock, SurveyLoadReport};
