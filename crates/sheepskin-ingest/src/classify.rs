//! Classification of sub-tables into earnings and attainment parts.
//!
//! The survey sheet interleaves two semantic roles per demographic
//! block: median-annual-earnings rows on top and percentage-attainment
//! rows below, separated by a "Percent, all education levels" marker
//! row. Each classified sub-table keeps its two parts together in one
//! record, so the earnings/attainment correspondence is structural
//! rather than an implicit positional contract between two lists.

use crate::segment::SubTable;

/// Marker label that opens the attainment half of a block.
const ATTAINMENT_MARKER: &str = "percent, all education levels";

/// Earnings heading checked when no marker is present.
const EARNINGS_HEADING: &str = "median annual earnings";

/// A sub-table split into its semantic parts.
///
/// Either part may be absent: a markerless table is wholly one role,
/// and parts of fewer than two rows are dropped as header noise.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTable {
    /// The sanitized anchor label of the source sub-table; names the
    /// demographic slice the block describes.
    pub anchor: String,

    /// Median-annual-earnings rows, if any.
    pub earnings: Option<SubTable>,

    /// Percentage-attainment rows, if any.
    pub attainment: Option<SubTable>,
}

/// Classify segmented sub-tables.
///
/// A table containing the attainment marker at row `m` splits into an
/// earnings part `[0, m)` and an attainment part `[m, end)`. Without a
/// marker, the first three labels decide the whole table's role;
/// earnings is the conservative default since earnings tables vastly
/// outnumber ambiguous ones in the source corpus.
pub fn classify(tables: Vec<SubTable>) -> Vec<ClassifiedTable> {
    tables
        .into_iter()
        .filter(|table| table.len() >= 2)
        .map(classify_one)
        .collect()
}

fn classify_one(table: SubTable) -> ClassifiedTable {
    let anchor = table.anchor().to_string();

    if let Some(marker_idx) = find_marker(&table) {
        let earnings_rows = table.rows[..marker_idx].to_vec();
        let attainment_rows = table.rows[marker_idx..].to_vec();
        return ClassifiedTable {
            anchor,
            earnings: keep_part(earnings_rows),
            attainment: keep_part(attainment_rows),
        };
    }

    let heading: String = (0..3)
        .map(|idx| table.label(idx).to_lowercase())
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if heading.contains(EARNINGS_HEADING) {
        ClassifiedTable {
            anchor,
            earnings: Some(table),
            attainment: None,
        }
    } else if heading.contains("percent") {
        ClassifiedTable {
            anchor,
            earnings: None,
            attainment: Some(table),
        }
    } else {
        ClassifiedTable {
            anchor,
            earnings: Some(table),
            attainment: None,
        }
    }
}

fn find_marker(table: &SubTable) -> Option<usize> {
    (0..table.len()).find(|&idx| {
        table
            .label(idx)
            .trim()
            .to_lowercase()
            .contains(ATTAINMENT_MARKER)
    })
}

/// A part survives only with more than one row.
fn keep_part(rows: Vec<Vec<crate::sheet::Cell>>) -> Option<SubTable> {
    if rows.len() > 1 {
        Some(SubTable { rows })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;

    fn data_row(label: &str) -> Vec<Cell> {
        vec![
            Cell::Text(label.to_string()),
            Cell::Number(1.0),
            Cell::Number(2.0),
        ]
    }

    fn table(labels: &[&str]) -> SubTable {
        SubTable {
            rows: labels.iter().map(|label| data_row(label)).collect(),
        }
    }

    #[test]
    fn test_marker_split_lengths() {
        let mut labels = vec!["Total"];
        labels.extend(["a", "b", "c", "d"]);
        labels.push("Percent, all education levels, total");
        labels.extend(["e", "f", "g"]);
        let original_len = labels.len();

        let classified = classify(vec![table(&labels)]);
        assert_eq!(classified.len(), 1);
        let pair = &classified[0];

        let earnings = pair.earnings.as_ref().unwrap();
        let attainment = pair.attainment.as_ref().unwrap();
        assert_eq!(earnings.len(), 5);
        assert_eq!(attainment.len(), original_len - 5);
        assert_eq!(attainment.label(0), "Percent, all education levels, total");
        // Concatenating the two parts reconstructs the original row count.
        assert_eq!(earnings.len() + attainment.len(), original_len);
    }

    #[test]
    fn test_single_row_part_is_dropped() {
        // Marker at index 1: the earnings part has only the anchor row.
        let classified = classify(vec![table(&[
            "Total",
            "Percent, all education levels, total",
            "a",
            "b",
        ])]);
        assert!(classified[0].earnings.is_none());
        assert_eq!(classified[0].attainment.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_markerless_earnings_heading() {
        let classified = classify(vec![table(&[
            "Male",
            "Median annual earnings, all education levels",
            "High school completion",
            "Bachelor's degree",
        ])]);
        assert!(classified[0].earnings.is_some());
        assert!(classified[0].attainment.is_none());
    }

    #[test]
    fn test_markerless_percent_heading() {
        let classified = classify(vec![table(&[
            "Female",
            "Percent with bachelor's degree",
            "Some college, no degree",
        ])]);
        assert!(classified[0].earnings.is_none());
        assert!(classified[0].attainment.is_some());
    }

    #[test]
    fn test_markerless_default_is_earnings() {
        let classified = classify(vec![table(&["Total", "x", "y"])]);
        assert!(classified[0].earnings.is_some());
        assert!(classified[0].attainment.is_none());
    }

    #[test]
    fn test_tiny_tables_are_skipped() {
        let classified = classify(vec![table(&["Total"])]);
        assert!(classified.is_empty());
    }

    #[test]
    fn test_anchor_preserved() {
        let classified = classify(vec![table(&["White__total", "a", "b"])]);
        assert_eq!(classified[0].anchor, "White__total");
    }
}
