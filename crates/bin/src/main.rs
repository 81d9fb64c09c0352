//! Sheepskin CLI binary.
//!
//! Drives the education-ROI batch pipeline: schema/dimension setup,
//! cost and survey ingestion, ROI recomputation, and summary export.

mod pipeline;

use clap::{Parser, Subcommand};
use pipeline::ExportFormat;
use sheepskin_roi::LoanTerms;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheepskin")]
#[command(about = "Education ROI star-schema pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the SQLite fact store.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and seed the dimension catalogs
    Init,

    /// Ingest the per-student cost spreadsheet
    LoadCosts {
        /// Cost workbook (.xlsx)
        file: PathBuf,
    },

    /// Ingest the earnings/attainment survey spreadsheet
    LoadSurvey {
        /// Survey workbook (.xlsx)
        file: PathBuf,
    },

    /// Recompute loan-adjusted ROI metrics from persisted facts
    Roi {
        /// Annual interest rate in decimal form
        #[arg(long, default_value = "0.0668")]
        rate: f64,

        /// Loan term in years
        #[arg(long, default_value = "10")]
        term_years: u32,

        /// Share of education cost financed by the loan
        #[arg(long, default_value = "0.70")]
        coverage: f64,
    },

    /// Export the per-level ROI summary
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let db = cli.db.unwrap_or_else(pipeline::default_db_path);
    let mut store = pipeline::open_store(&db)?;

    match cli.command {
        Commands::Init => {
            pipeline::init(&mut store)?;
            println!("Initialized fact store at {}", db.display());
        }
        Commands::LoadCosts { file } => {
            let rows = pipeline::load_costs(&mut store, &file)?;
            println!("Loaded {rows} cost facts from {}", file.display());
        }
        Commands::LoadSurvey { file } => {
            let report = pipeline::load_survey(&mut store, &file)?;
            println!(
                "Loaded {} earnings and {} attainment facts from {}",
                report.earnings_rows,
                report.attainment_rows,
                file.display()
            );
            if report.skipped_blocks > 0 {
                println!("Skipped {} blocks (unresolved demographic)", report.skipped_blocks);
            }
        }
        Commands::Roi {
            rate,
            term_years,
            coverage,
        } => {
            let terms = LoanTerms::new(rate, term_years, coverage)?;
            let kept = pipeline::compute_roi(&mut store, &terms)?;
            println!("Computed ROI metrics for {kept} cohorts");
        }
        Commands::Export { format, output } => {
            pipeline::export_summary(&store, format, output.as_deref())?;
        }
    }

    Ok(())
}
