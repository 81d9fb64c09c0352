//! Stage orchestration: spreadsheet file in, fact store out.
//!
//! Each function here is one logical stage of the batch pipeline. A
//! stage either commits as a whole or rolls back (the store wraps its
//! writes in one transaction per stage); a failed stage aborts the run
//! and leaves earlier committed stages in place.

use indicatif::{ProgressBar, ProgressStyle};
use sheepskin_ingest::{
    classify, normalize_costs, normalize_survey, read_cost_sheet, read_survey_sheet, segment,
    year_columns,
};
use sheepskin_roi::{LoanTerms, RoiMetrics};
use sheepskin_store::{CostEntry, FactEntry, FactStore, SurveyBlock, SurveyLoadReport};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Error type for pipeline stages.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PipelineError {
    /// Spreadsheet reading or normalization failed.
    #[error("Ingest error: {0}")]
    Ingest(#[from] sheepskin_ingest::IngestError),

    /// Fact store access failed.
    #[error("Store error: {0}")]
    Store(#[from] sheepskin_store::StoreError),

    /// ROI computation failed.
    #[error("ROI error: {0}")]
    Roi(#[from] sheepskin_roi::RoiError),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Default database location under the platform data directory.
pub(crate) fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sheepskin")
        .join("facts.db")
}

/// Open the store, creating the parent directory if needed.
pub(crate) fn open_store(db: &Path) -> Result<FactStore, PipelineError> {
    if let Some(parent) = db.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(FactStore::new(db)?)
}

/// Stage: create the schema and seed the dimension catalogs.
pub(crate) fn init(store: &mut FactStore) -> Result<(), PipelineError> {
    store.create_schema()?;
    store.seed_dimensions()?;
    Ok(())
}

/// Stage: ingest the cost sheet and rebuild the cost facts.
pub(crate) fn load_costs(store: &mut FactStore, file: &Path) -> Result<usize, PipelineError> {
    let grid = read_cost_sheet(file)?;
    let entries: Vec<CostEntry> = normalize_costs(&grid)
        .into_iter()
        .map(|record| CostEntry {
            level: record.level,
            year: record.year,
            cost: record.cost,
        })
        .collect();

    if entries.is_empty() {
        warn!(file = %file.display(), "cost sheet yielded no usable rows");
    }
    Ok(store.load_cost_facts(&entries)?)
}

/// Stage: ingest the earnings/attainment survey sheet and rebuild the
/// earnings and attainment facts.
pub(crate) fn load_survey(
    store: &mut FactStore,
    file: &Path,
) -> Result<SurveyLoadReport, PipelineError> {
    let grid = read_survey_sheet(file)?;
    let years = year_columns(&grid);
    let tables = classify(segment(&grid));
    if tables.is_empty() {
        warn!(file = %file.display(), "survey sheet yielded no sub-tables");
    }

    let progress = ProgressBar::new(tables.len() as u64).with_style(
        ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
            .expect("static template")
            .progress_chars("=> "),
    );
    progress.set_message("normalizing blocks");

    let blocks: Vec<SurveyBlock> = normalize_survey(&years, &tables)
        .into_iter()
        .map(|facts| {
            progress.inc(1);
            SurveyBlock {
                demographic: facts.demographic,
                earnings: facts.earnings.iter().map(to_entry).collect(),
                attainment: facts.attainment.iter().map(to_entry).collect(),
            }
        })
        .collect();
    progress.finish_and_clear();

    let year_list: Vec<i32> = years.iter().map(|&(_, year)| year).collect();
    Ok(store.load_survey_facts(&year_list, &blocks)?)
}

fn to_entry(fact: &sheepskin_ingest::FactRow) -> FactEntry {
    FactEntry {
        level: fact.level,
        year: fact.year,
        value: fact.value,
    }
}

/// Stage: recompute ROI metrics from the persisted cost and earnings
/// facts and replace the ROI fact table.
pub(crate) fn compute_roi(store: &mut FactStore, terms: &LoanTerms) -> Result<usize, PipelineError> {
    let inputs = store.cohort_rows()?;
    let mut metrics = Vec::with_capacity(inputs.len());
    for input in &inputs {
        metrics.push(RoiMetrics::compute(input, terms)?);
    }
    let kept = store.replace_roi_facts(&metrics)?;
    info!(
        computed = metrics.len(),
        kept, "ROI metrics recomputed and upserted"
    );
    Ok(kept)
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ExportFormat {
    /// Comma-separated values.
    Csv,

    /// Pretty-printed JSON.
    Json,
}

/// Stage: write the per-level ROI summary to `output` (stdout when
/// absent).
pub(crate) fn export_summary(
    store: &FactStore,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<(), PipelineError> {
    let summary = store.roi_summary()?;

    let rendered = match format {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in &summary {
                writer.serialize(row)?;
            }
            let bytes = writer.into_inner().map_err(|err| err.into_error())?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        ExportFormat::Json => serde_json::to_string_pretty(&summary)?,
    };

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            info!(path = %path.display(), rows = summary.len(), "summary exported");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
