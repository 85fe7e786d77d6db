use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use papervec::telemetry::init_tracing;
use papervec::{DocumentFormat, ExactKnn, KnnLookup, Pipeline, PipelineConfig, PipelineError};
use serde_json::json;
use tracing::error;

/// Embed a scientific paper as the mean of its word vectors
#[derive(Parser, Debug)]
#[command(
    name = "papervec",
    version,
    about = "Embed a JATS XML or PDF paper as the mean of its word vectors",
    long_about = "Extracts the abstract and body text of a paper, lemmatizes it and averages \
                  the word vectors of every known, non-stop-word lemma.

EXAMPLES:
  Print the vector as JSON:
    papervec --config papervec.yaml PMC1234567.nxml

  Ten closest papers from a reference embeddings file:
    papervec --config papervec.yaml paper.pdf --neighbors data/paper_embeddings.tsv -k 10"
)]
struct Args {
    /// Document to embed (.xml, .nxml or .pdf)
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// YAML pipeline configuration; defaults apply when omitted
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Document format; inferred from the extension when omitted
    #[arg(long, value_name = "xml|pdf")]
    format: Option<DocumentFormat>,

    /// Reference embeddings file to search instead of printing the vector
    #[arg(long, value_name = "PATH")]
    neighbors: Option<PathBuf>,

    /// Number of neighbors to print
    #[arg(short = 'k', long = "top-k", value_name = "N", default_value_t = 10)]
    k: usize,

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
    let pipeline = Pipeline::from_config(&cfg)?;

    match &args.neighbors {
        Some(reference) => {
            let knn = ExactKnn::from_reference_file(reference, &cfg.validation.layout())
                .with_context(|| format!("loading reference embeddings {}", reference.display()))?;
            let embedding = pipeline.embed_file(&args.document, args.format)?;
            let hits = knn.nearest(&embedding.vector.view(), args.k)?;
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        None => {
            let embedding = pipeline.embed_file(&args.document, args.format)?;
            let out = json!({
                "dim": embedding.dim(),
                "token_count": embedding.token_count,
                "vector": embedding.to_vec(),
            });
            println!("{out}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let status = err
                .downcast_ref::<PipelineError>()
                .map_or(500, PipelineError::status_code);
            error!(error = %format!("{err:#}"), status, "papervec_failure");
            eprintln!("error: {err:#}");
            if status == 400 {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
