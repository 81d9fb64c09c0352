#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod error;
pub mod normalize;
pub mod segment;
pub mod sheet;

pub use classify::{ClassifiedTable, classify};
pub use error::{IngestError, Result};
pub use normalize::{
    CostRecord, FactRow, SurveyFacts, normalize_costs, normalize_survey, year_columns,
};
pub use segment::{SubTable, segment};
pub use sheet::{Cell, SheetGrid, read_cost_sheet, read_survey_sheet};
