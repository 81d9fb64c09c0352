#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod resolve;

pub use catalog::{Demographic, EducationLevel, Gender, RaceEthnicity};
pub use resolve::{DemographicMatch, resolve_cost_level, resolve_demographic, resolve_level};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
