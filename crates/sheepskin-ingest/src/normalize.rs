//! Wide-to-long normalization of classified tables into fact rows.
//!
//! The survey sheet is wide: one column per year. Normalization emits
//! one fact row per (education level, year) cell, carrying the value
//! as `Option<f64>` — absence stays distinct from a real zero until
//! the store boundary decides what to persist.

use crate::classify::ClassifiedTable;
use crate::segment::SubTable;
use crate::sheet::SheetGrid;
use sheepskin::{Demographic, DemographicMatch, EducationLevel};
use sheepskin::{resolve_cost_level, resolve_demographic, resolve_level};
use tracing::{debug, warn};

/// One long-form fact cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactRow {
    /// Resolved education level.
    pub level: EducationLevel,

    /// Calendar year.
    pub year: i32,

    /// Cell value; `None` when the source cell is blank, suppressed
    /// or unparseable.
    pub value: Option<f64>,
}

/// Normalized facts for one demographic block.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyFacts {
    /// The block's demographic cohort.
    pub demographic: Demographic,

    /// Whether the cohort came from the by-elimination male fallback
    /// rather than an explicit rule match.
    pub demographic_fallback: bool,

    /// Earnings fact rows.
    pub earnings: Vec<FactRow>,

    /// Attainment fact rows.
    pub attainment: Vec<FactRow>,
}

/// One extracted cost observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRecord {
    /// Resolved education level.
    pub level: EducationLevel,

    /// Calendar year (fiscal labels resolve to the ending year).
    pub year: i32,

    /// Per-full-time-student expenditure, unscaled.
    pub cost: f64,
}

/// The year columns of a survey grid: (column index, calendar year)
/// for every header that is a plain year, built once per sheet.
pub fn year_columns(grid: &SheetGrid) -> Vec<(usize, i32)> {
    grid.headers
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(idx, header)| header.parse::<i32>().ok().map(|year| (idx, year)))
        .collect()
}

/// Normalize classified survey tables into long-form fact rows.
///
/// Rows whose label resolves to no education level are skipped, never
/// guessed. Blocks whose anchor matches no demographic rule fall back
/// to (Male, Union) — the source tables only leave male cohorts
/// unlabeled — and each fallback is logged.
pub fn normalize_survey(years: &[(usize, i32)], tables: &[ClassifiedTable]) -> Vec<SurveyFacts> {
    if tables.is_empty() {
        warn!("survey sheet produced no classified tables");
        return Vec::new();
    }

    tables
        .iter()
        .map(|pair| {
            let matched = resolve_demographic(&pair.anchor);
            if matched == DemographicMatch::Unmatched {
                warn!(anchor = %pair.anchor, "no demographic rule matched; assuming (Male, Union)");
            }
            let demographic = matched.or_male_fallback();

            // The earnings part's row 0 is the demographic anchor, not
            // data; the attainment part starts at its marker row, which
            // is itself a data row ("Percent, all education levels").
            let earnings = pair
                .earnings
                .as_ref()
                .map(|part| flatten_part(part, years, 1))
                .unwrap_or_default();
            let attainment = pair
                .attainment
                .as_ref()
                .map(|part| flatten_part(part, years, 0))
                .unwrap_or_default();

            SurveyFacts {
                demographic,
                demographic_fallback: matched == DemographicMatch::Unmatched,
                earnings,
                attainment,
            }
        })
        .collect()
}

fn flatten_part(part: &SubTable, years: &[(usize, i32)], first_row: usize) -> Vec<FactRow> {
    let mut out = Vec::new();
    for row in part.rows.iter().skip(first_row) {
        let label = SheetGrid::label(row);
        let Some(level) = resolve_level(label) else {
            debug!(label, "row label resolves to no education level; skipping");
            continue;
        };
        for &(col_idx, year) in years {
            let value = row.get(col_idx).and_then(|cell| cell.as_number());
            out.push(FactRow { level, year, value });
        }
    }
    out
}

/// Extract cost records from the cost sheet's two-column sub-range.
///
/// Section header rows (blank second column) set the current education
/// level; data rows pair a fiscal-year label with a cost value under
/// that level. Rows under an unrecognized section header are dropped.
pub fn normalize_costs(grid: &SheetGrid) -> Vec<CostRecord> {
    let mut out = Vec::new();
    let mut current: Option<EducationLevel> = None;

    for row in &grid.rows {
        let label = SheetGrid::label(row);
        let value_cell = row.get(1);

        if value_cell.is_none_or(|cell| cell.is_empty()) {
            current = resolve_cost_level(label);
            if current.is_none() && !label.is_empty() {
                debug!(label, "unrecognized cost section header");
            }
            continue;
        }

        let Some(level) = current else {
            continue;
        };
        let Some(year) = parse_fiscal_year(label) else {
            debug!(label, "unparseable fiscal-year label; skipping");
            continue;
        };
        let Some(cost) = value_cell.and_then(|cell| cell.as_number()) else {
            warn!(label, "cost cell is not numeric; skipping");
            continue;
        };

        out.push(CostRecord { level, year, cost });
    }

    out
}

/// Resolve a fiscal-year label like `2019-20` to its ending calendar
/// year: first two digits × 100 + last two digits.
fn parse_fiscal_year(label: &str) -> Option<i32> {
    let trimmed = label.trim();
    if trimmed.len() < 4 {
        return None;
    }
    let century: i32 = trimmed.get(..2)?.parse().ok()?;
    let tail: i32 = trimmed.get(trimmed.len() - 2..)?.parse().ok()?;
    Some(century * 100 + tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;
    use sheepskin::{Gender, RaceEthnicity};

    fn row(label: &str, values: &[Option<f64>]) -> Vec<Cell> {
        let mut cells = vec![Cell::Text(label.to_string())];
        cells.extend(
            values
                .iter()
                .map(|value| value.map_or(Cell::Empty, Cell::Number)),
        );
        cells
    }

    fn survey_grid() -> SheetGrid {
        SheetGrid::new(
            vec!["Label".into(), "2019".into(), "2020".into()],
            Vec::new(),
        )
    }

    fn pair(anchor: &str, earnings_labels: &[&str]) -> ClassifiedTable {
        let mut rows = vec![row(anchor, &[None, None])];
        rows.extend(
            earnings_labels
                .iter()
                .map(|label| row(label, &[Some(40_000.0), Some(41_000.0)])),
        );
        ClassifiedTable {
            anchor: anchor.to_string(),
            earnings: Some(SubTable { rows }),
            attainment: None,
        }
    }

    #[test]
    fn test_year_columns_skip_non_year_headers() {
        let grid = SheetGrid::new(
            vec!["Label".into(), "2019".into(), "notes".into(), "2020".into()],
            Vec::new(),
        );
        assert_eq!(year_columns(&grid), vec![(1, 2019), (3, 2020)]);
    }

    #[test]
    fn test_normalize_emits_one_row_per_level_year() {
        let years = year_columns(&survey_grid());
        let facts = normalize_survey(
            &years,
            &[pair("Total", &["High school completion", "Bachelor's degree"])],
        );
        assert_eq!(facts.len(), 1);
        let block = &facts[0];
        assert_eq!(block.demographic, Demographic::total());
        assert!(!block.demographic_fallback);
        assert_eq!(block.earnings.len(), 4);
        assert_eq!(
            block.earnings[0],
            FactRow {
                level: EducationLevel::HighSchool,
                year: 2019,
                value: Some(40_000.0),
            }
        );
    }

    #[test]
    fn test_unresolved_level_rows_are_skipped() {
        let years = year_columns(&survey_grid());
        let facts = normalize_survey(
            &years,
            &[pair("Total", &["Mystery credential", "Bachelor's degree"])],
        );
        // Only the bachelor's row survives.
        assert_eq!(facts[0].earnings.len(), 2);
        assert!(
            facts[0]
                .earnings
                .iter()
                .all(|fact| fact.level == EducationLevel::Bachelors)
        );
    }

    #[test]
    fn test_missing_values_stay_none() {
        let years = year_columns(&survey_grid());
        let mut table = pair("Total", &[]);
        table.earnings.as_mut().unwrap().rows.push(row(
            "Bachelor's degree",
            &[None, Some(52_000.0)],
        ));
        let facts = normalize_survey(&years, &[table]);
        assert_eq!(facts[0].earnings[0].value, None);
        assert_eq!(facts[0].earnings[1].value, Some(52_000.0));
    }

    #[test]
    fn test_male_fallback_is_flagged() {
        let years = year_columns(&survey_grid());
        let facts = normalize_survey(&years, &[pair("Male", &["Bachelor's degree"])]);
        assert!(facts[0].demographic_fallback);
        assert_eq!(
            facts[0].demographic,
            Demographic::new(Gender::Male, RaceEthnicity::Union)
        );
    }

    #[test]
    fn test_attainment_part_starts_at_marker_row() {
        let years = year_columns(&survey_grid());
        let attainment_rows = vec![
            row(
                "Percent, all education levels, total",
                &[Some(91.0), Some(92.0)],
            ),
            row("Bachelor's degree or higher", &[Some(39.0), Some(40.0)]),
        ];
        let table = ClassifiedTable {
            anchor: "Total".into(),
            earnings: None,
            attainment: Some(SubTable {
                rows: attainment_rows,
            }),
        };
        let facts = normalize_survey(&years, &[table]);
        assert_eq!(facts[0].attainment.len(), 4);
        // The marker row itself resolves to the all-levels aggregate.
        assert_eq!(facts[0].attainment[0].level, EducationLevel::AllLevels);
        assert_eq!(
            facts[0].attainment[2].level,
            EducationLevel::BachelorsOrHigher
        );
    }

    #[test]
    fn test_cost_extraction_with_sections() {
        let grid = SheetGrid::new(
            Vec::new(),
            vec![
                row("All institutions", &[None]),
                row("2018-19", &[Some(14_000.0)]),
                row("2019-20", &[Some(14_500.0)]),
                row("4-year institutions", &[None]),
                row("2019-20", &[Some(16_000.0)]),
                row("2-year institutions", &[None]),
                row("2019-20", &[Some(9_000.0)]),
            ],
        );
        let records = normalize_costs(&grid);
        assert_eq!(
            records,
            vec![
                CostRecord {
                    level: EducationLevel::AllLevels,
                    year: 2019,
                    cost: 14_000.0,
                },
                CostRecord {
                    level: EducationLevel::AllLevels,
                    year: 2020,
                    cost: 14_500.0,
                },
                CostRecord {
                    level: EducationLevel::Bachelors,
                    year: 2020,
                    cost: 16_000.0,
                },
                CostRecord {
                    level: EducationLevel::Associate,
                    year: 2020,
                    cost: 9_000.0,
                },
            ]
        );
    }

    #[test]
    fn test_rows_under_unknown_section_are_dropped() {
        let grid = SheetGrid::new(
            Vec::new(),
            vec![
                row("Footnote section", &[None]),
                row("2019-20", &[Some(1.0)]),
            ],
        );
        assert!(normalize_costs(&grid).is_empty());
    }

    #[test]
    fn test_fiscal_year_parsing() {
        assert_eq!(parse_fiscal_year("2019-20"), Some(2020));
        assert_eq!(parse_fiscal_year("2005-06"), Some(2006));
        assert_eq!(parse_fiscal_year(" 2012-13 "), Some(2013));
        assert_eq!(parse_fiscal_year("total"), None);
        assert_eq!(parse_fiscal_year(""), None);
    }
}
