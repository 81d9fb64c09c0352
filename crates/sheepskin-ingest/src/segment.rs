//! Blank-row segmentation of a sheet grid into sub-tables.
//!
//! A row is a split point when every column from index 2 onward is
//! blank. A pending buffer is only emitted as a sub-table once it has
//! accumulated more than [`MIN_SUBTABLE_ROWS`] rows; shorter buffers
//! are header or footnote noise and are discarded. The trailing buffer
//! at end of sheet is flushed under the same threshold.

use crate::sheet::{Cell, SheetGrid};

/// Minimum row count (exclusive) for a buffer to count as data.
pub const MIN_SUBTABLE_ROWS: usize = 10;

/// A contiguous row range recovered from the sheet.
///
/// The first cell (the anchor) has every character outside
/// `[A-Za-z0-9_]` replaced by `_`; downstream classification and
/// demographic resolution key off it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubTable {
    /// The sub-table's rows, column 0 holding labels.
    pub rows: Vec<Vec<Cell>>,
}

impl SubTable {
    /// Number of rows.
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the sub-table has no rows.
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The label cell of row `idx`, or `""` when blank or out of range.
    pub fn label(&self, idx: usize) -> &str {
        self.rows.get(idx).map(|row| SheetGrid::label(row)).unwrap_or("")
    }

    /// The sanitized anchor label (first cell of the first row).
    pub fn anchor(&self) -> &str {
        self.label(0)
    }
}

/// Split a grid into sub-tables at blank rows.
pub fn segment(grid: &SheetGrid) -> Vec<SubTable> {
    let mut tables = Vec::new();
    let mut buffer: Vec<Vec<Cell>> = Vec::new();

    for row in &grid.rows {
        if is_split_row(row) {
            if buffer.len() > MIN_SUBTABLE_ROWS {
                tables.push(finish(std::mem::take(&mut buffer)));
            }
            // The split row itself starts the next buffer; it carries
            // the next block's anchor label.
            buffer.clear();
            buffer.push(row.clone());
        } else {
            buffer.push(row.clone());
        }
    }

    if buffer.len() > MIN_SUBTABLE_ROWS {
        tables.push(finish(buffer));
    }

    tables
}

/// A split row is blank in every column from index 2 onward.
fn is_split_row(row: &[Cell]) -> bool {
    row.iter().skip(2).all(Cell::is_empty)
}

fn finish(mut rows: Vec<Vec<Cell>>) -> SubTable {
    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
        let raw = match first {
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => value.to_string(),
            Cell::Empty => String::new(),
        };
        *first = Cell::Text(sanitize_anchor(&raw));
    }
    SubTable { rows }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
fn sanitize_anchor(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_row(label: &str, values: usize) -> Vec<Cell> {
        let mut row = vec![Cell::Text(label.to_string())];
        row.extend((0..values).map(|v| Cell::Number(v as f64)));
        row
    }

    fn blank_row(label: &str, width: usize) -> Vec<Cell> {
        let mut row = vec![Cell::Text(label.to_string()), Cell::Number(0.0)];
        row.extend((0..width.saturating_sub(2)).map(|_| Cell::Empty));
        row
    }

    fn grid(rows: Vec<Vec<Cell>>) -> SheetGrid {
        SheetGrid::new(Vec::new(), rows)
    }

    #[test]
    fn test_two_blocks_split_by_blank_row() {
        let mut rows = Vec::new();
        for i in 0..15 {
            rows.push(data_row(&format!("a{i}"), 5));
        }
        rows.push(blank_row("Header, next block", 6));
        for i in 0..15 {
            rows.push(data_row(&format!("b{i}"), 5));
        }

        let tables = segment(&grid(rows));
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 15);
        // The split row joins the second block, ahead of its 15 data rows.
        assert_eq!(tables[1].len(), 16);
    }

    #[test]
    fn test_short_block_is_discarded() {
        let mut rows = Vec::new();
        for i in 0..5 {
            rows.push(data_row(&format!("a{i}"), 5));
        }
        assert!(segment(&grid(rows)).is_empty());
    }

    #[test]
    fn test_trailing_block_flushed_at_threshold() {
        let mut rows = vec![blank_row("Anchor", 6)];
        for i in 0..10 {
            rows.push(data_row(&format!("a{i}"), 5));
        }
        // 11 rows total: above the threshold, flushed at end of sheet.
        let tables = segment(&grid(rows));
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 11);

        // Exactly 10 rows is not enough.
        let mut rows = vec![blank_row("Anchor", 6)];
        for i in 0..9 {
            rows.push(data_row(&format!("a{i}"), 5));
        }
        assert!(segment(&grid(rows)).is_empty());
    }

    #[test]
    fn test_anchor_is_sanitized() {
        let mut rows = vec![blank_row("White, total (percent)", 6)];
        for i in 0..11 {
            rows.push(data_row(&format!("a{i}"), 5));
        }
        let tables = segment(&grid(rows));
        assert_eq!(tables[0].anchor(), "White__total__percent_");
    }

    #[test]
    fn test_rows_shorter_than_three_columns_split() {
        // With nothing at column 2 or beyond, the row is vacuously blank there.
        let rows = vec![vec![Cell::Text("label".into()), Cell::Number(1.0)]; 12];
        let tables = segment(&grid(rows));
        // Every row is a split row, so no buffer ever exceeds one row.
        assert!(tables.is_empty());
    }
}
