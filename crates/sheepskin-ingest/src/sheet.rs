//! Workbook reading into a typed cell grid.
//!
//! Two source shapes are supported. The earnings/attainment survey
//! sheet uses the full sheet minus two header rows, one known noise
//! row and the year-less columns; the `‡` suppression marker maps to
//! an empty cell. The cost sheet's usable data is a fixed sub-range:
//! 42 rows starting at data row 90, first two columns only.

use crate::error::{IngestError, Result};
use calamine::{DataType, Reader, Xlsx, open_workbook};
use std::path::Path;

/// Number of leading header rows to skip on the survey sheet.
const SURVEY_HEADER_ROWS: usize = 2;

/// Index of the known noise row among the survey data rows.
const SURVEY_NOISE_ROW: usize = 3;

/// First data row of the cost sheet's usable sub-range.
const COST_FIRST_ROW: usize = 90;

/// Number of rows in the cost sheet's usable sub-range.
const COST_ROW_COUNT: usize = 42;

/// Cell suppression marker used by the source tables.
const SUPPRESSED: &str = "‡";

/// One spreadsheet cell, reduced to the three states the pipeline
/// distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A text label.
    Text(String),

    /// A numeric value.
    Number(f64),

    /// Blank, suppressed, or otherwise unusable.
    Empty,
}

impl Cell {
    /// Whether the cell holds no usable value.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The cell's text, if it is a label.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The cell's numeric value. Text parses as a number when it can;
    /// blank or unparseable cells yield `None` (the missing-data case
    /// the store later substitutes with zero).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Empty => None,
        }
    }
}

/// A sheet reduced to a header row and a grid of typed cells.
///
/// Column 0 holds row labels; columns 1..N hold per-year values.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    /// Column headers (year labels for the survey sheet, empty for the
    /// headerless cost sub-range).
    pub headers: Vec<String>,

    /// Data rows.
    pub rows: Vec<Vec<Cell>>,
}

impl SheetGrid {
    /// Build a grid directly (used by tests and by the readers below).
    pub const fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// The label cell of a row, or `""` when blank.
    pub fn label(row: &[Cell]) -> &str {
        row.first().and_then(Cell::as_text).unwrap_or("")
    }
}

/// Read the earnings/attainment survey sheet.
///
/// Skips the two header rows, takes the next row as column headers,
/// drops the known noise row, and keeps only the label column plus
/// columns with a clean year header (non-blank, no `.` disambiguation
/// suffix from repeated years).
pub fn read_survey_sheet(path: &Path) -> Result<SheetGrid> {
    let range = read_first_sheet(path)?;
    let mut rows = range.rows().skip(SURVEY_HEADER_ROWS);

    let header_row = rows
        .next()
        .ok_or_else(|| IngestError::Shape("survey sheet has no header row".into()))?;
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    // Label column plus columns with a usable year header.
    let keep: Vec<usize> = (0..headers.len())
        .filter(|&idx| idx == 0 || (!headers[idx].is_empty() && !headers[idx].contains('.')))
        .collect();

    let data: Vec<Vec<Cell>> = rows
        .enumerate()
        .filter(|(idx, _)| *idx != SURVEY_NOISE_ROW)
        .map(|(_, row)| {
            keep.iter()
                .map(|&idx| to_cell(row.get(idx)))
                .collect::<Vec<Cell>>()
        })
        .collect();

    let kept_headers: Vec<String> = keep.iter().map(|&idx| headers[idx].clone()).collect();
    Ok(SheetGrid::new(kept_headers, data))
}

/// Read the cost sheet's fixed sub-range (rows 90-131 after the header
/// row, first two columns).
pub fn read_cost_sheet(path: &Path) -> Result<SheetGrid> {
    let range = read_first_sheet(path)?;

    let data: Vec<Vec<Cell>> = range
        .rows()
        .skip(1) // header row
        .skip(COST_FIRST_ROW)
        .take(COST_ROW_COUNT)
        .map(|row| vec![to_cell(row.first()), to_cell(row.get(1))])
        .collect();

    if data.is_empty() {
        return Err(IngestError::Shape(format!(
            "cost sheet has no rows in the {COST_FIRST_ROW}..{} sub-range",
            COST_FIRST_ROW + COST_ROW_COUNT
        )));
    }

    Ok(SheetGrid::new(Vec::new(), data))
}

fn read_first_sheet(path: &Path) -> Result<calamine::Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::MissingSheet("workbook has no sheets".into()))?;
    workbook
        .worksheet_range(&name)
        .ok_or_else(|| IngestError::MissingSheet(name.clone()))?
        .map_err(IngestError::from)
}

fn to_cell(cell: Option<&DataType>) -> Cell {
    match cell {
        Some(DataType::String(value)) => {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed == SUPPRESSED {
                Cell::Empty
            } else {
                Cell::Text(value.clone())
            }
        }
        Some(DataType::Float(value)) => Cell::Number(*value),
        Some(DataType::Int(value)) => Cell::Number(*value as f64),
        Some(DataType::Empty) | Some(DataType::Error(_)) | None => Cell::Empty,
        Some(other) => Cell::Text(other.to_string()),
    }
}

/// Header cell to text; integral floats render without the `.0` so a
/// year header compares and parses cleanly.
fn header_text(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.trim().to_string(),
        DataType::Float(value) if value.fract() == 0.0 => format!("{}", *value as i64),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_as_number() {
        assert_eq!(Cell::Number(42.5).as_number(), Some(42.5));
        assert_eq!(Cell::Text("37250".into()).as_number(), Some(37_250.0));
        assert_eq!(Cell::Text("n/a".into()).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_label_of_blank_row() {
        let row = vec![Cell::Empty, Cell::Number(1.0)];
        assert_eq!(SheetGrid::label(&row), "");
        let row = vec![Cell::Text("Total".into())];
        assert_eq!(SheetGrid::label(&row), "Total");
    }

    #[test]
    fn test_suppression_marker_maps_to_empty() {
        let cell = to_cell(Some(&DataType::String("‡".into())));
        assert_eq!(cell, Cell::Empty);
        let cell = to_cell(Some(&DataType::String("  ‡ ".into())));
        assert_eq!(cell, Cell::Empty);
    }

    #[test]
    fn test_header_text_strips_float_suffix() {
        assert_eq!(header_text(&DataType::Float(2019.0)), "2019");
        assert_eq!(header_text(&DataType::String(" 2019 ".into())), "2019");
        assert_eq!(header_text(&DataType::Empty), "");
    }
}
