//! Checks that a reference embeddings file agrees with the nearest-neighbor
//! lookup: its first and last papers must each come back as their own
//! closest match.
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use papervec::telemetry::init_tracing;
use papervec::{validate_reference_file, ExactKnn, PipelineConfig};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "validate-embeddings",
    version,
    about = "Confirm the first and last rows of a paper embeddings file find themselves"
)]
struct Args {
    /// Tab-separated paper embeddings file with a header line
    #[arg(value_name = "PAPER_EMBEDDINGS_FILE")]
    embeddings: PathBuf,

    /// YAML pipeline configuration; only the `validation` section is used
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Column holding the paper id (overrides the config)
    #[arg(long, value_name = "N")]
    id_column: Option<usize>,

    /// Number of trailing vector columns (overrides the config)
    #[arg(long, value_name = "N")]
    dimension: Option<usize>,

    /// Maximum accepted distance (overrides the config)
    #[arg(long, value_name = "D")]
    threshold: Option<f64>,

    /// Logging verbosity level
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn run(args: &Args) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let mut layout = cfg.validation.layout();
    if let Some(id_column) = args.id_column {
        layout.id_column = id_column;
    }
    if let Some(dimension) = args.dimension {
        layout.dimension = dimension;
    }
    let threshold = args.threshold.unwrap_or(cfg.validation.distance_threshold);

    let knn = ExactKnn::from_reference_file(&args.embeddings, &layout)
        .with_context(|| format!("loading {}", args.embeddings.display()))?;
    let report = validate_reference_file(&args.embeddings, &knn, &layout, threshold)?;

    println!("{} rows confirmed", report.checks.len());
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&args.log_level, args.json_logs);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "validation_failure");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
