//! tsfetch CLI: fetch a daily time-series table and write it as CSV.
//!
//! Tries the primary source, then each secondary, then the embedded sample
//! data. Source failures never affect the exit code; only an invalid config
//! or a failed write exits non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tsfetch_core::data::HttpFetcher;
use tsfetch_core::{AttemptOutcome, FetchConfig, Pipeline, RunSummary};

#[derive(Parser)]
#[command(
    name = "tsfetch",
    about = "Fetch time-series data with source fallback and write scraped_data.csv"
)]
struct Cli {
    /// Optional TOML config overriding sources, timeout and output path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output CSV path. Defaults to scraped_data.csv.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds. Defaults to 30.
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the run summary as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => FetchConfig::from_file(path)?,
        None => FetchConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    config.validate()?;
    tracing::debug!(?config, "configuration");

    let fetcher = HttpFetcher::new(&config.user_agent);
    let pipeline = Pipeline::new(&fetcher, config.source_list(), config.timeout());

    let summary = pipeline
        .run(&config.output)
        .with_context(|| format!("error saving data to {}", config.output.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("=== Time Series Data ===");
    println!("Output:   {}", summary.output.display());
    match &summary.source {
        Some(url) => println!("Source:   {} ({})", url, summary.tier),
        None => println!("Source:   {}", summary.tier),
    }
    println!("Rows:     {}", summary.rows);
    println!("Columns:  {}", summary.columns.join(", "));
    println!("Hash:     {}", summary.data_hash);

    let failed = summary
        .attempts
        .iter()
        .filter(|a| matches!(a.outcome, AttemptOutcome::Failed { .. }))
        .count();
    if failed > 0 {
        println!();
        println!("--- Skipped sources ---");
        for attempt in &summary.attempts {
            if let AttemptOutcome::Failed { stage, reason } = &attempt.outcome {
                println!("{:<22} {:?}: {reason}", attempt.tier.to_string(), stage);
                println!("  {}", attempt.url);
            }
        }
    }
    if summary.source.is_none() {
        println!();
        println!("WARNING: all remote sources failed; wrote embedded SAMPLE data");
    }
    println!();
}
