//! Headless batch prediction.
//!
//! Runs the same validation and encoding as the terminal UI's batch screen
//! and writes the annotated table.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin batch_predict -- policyholders.csv --output predictions.csv
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claimguard::adapters::sanitize::SanitizingMakeWriter;
use claimguard::application::{BatchPredictionService, InferenceContext};
use claimguard::config::{parse_delimiter, AppConfig};

#[derive(Parser)]
#[command(author, version, about = "Predict claim likelihood for every row of a file", long_about = None)]
struct Cli {
    /// Delimited file with a header row
    input: PathBuf,

    /// Where to write the annotated table (default: CLAIMGUARD_EXPORT_PATH or predictions.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model artifact directory (default: CLAIMGUARD_MODEL_PATH or models)
    #[arg(short, long)]
    models: Option<PathBuf>,

    /// Field delimiter of the input file, e.g. ';' or 'tab'
    #[arg(short, long)]
    delimiter: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    // Logs go to stderr so stdout stays clean for the summary.
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    if let Some(models) = cli.models {
        config.model_path = models;
    }
    if let Some(output) = cli.output {
        config.export_path = output;
    }
    if let Some(delimiter) = cli.delimiter.as_deref() {
        config.delimiter = parse_delimiter(delimiter)?;
    }

    let context = InferenceContext::load(&config.model_path, config.categorical_column.as_str())
        .with_context(|| format!("Failed to load model artifacts from {:?}", config.model_path))?;
    let service = BatchPredictionService::new(Arc::new(context));

    let result = service
        .predict_file(&cli.input, config.delimiter)
        .with_context(|| format!("Batch prediction failed for {:?}", cli.input))?;

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    service.export(&result, &config.export_path)?;
    println!(
        "{} rows predicted ({} likely to claim), written to {}",
        result.row_count(),
        result.positive_count,
        config.export_path.display()
    );
    Ok(())
}
