use std::path::PathBuf;

use anyhow::{Context, Result};
use candle_augment_core::{augment_file, AugmentConfig, DEFAULT_STEP_SECONDS};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Append percentage change and lower wick columns to OHLCV candle CSV data",
    long_about = None
)]
struct Cli {
    /// Path to the input CSV file
    #[arg(long)]
    input: PathBuf,

    /// Optional path for the output CSV. If omitted, the input file is rewritten in place
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also add an ISO-8601 time_utc column derived from the timestamp column
    #[arg(long)]
    add_time_utc: bool,

    /// Drop the original numeric timestamp column from the output
    #[arg(long)]
    replace_timestamp: bool,

    /// ISO-8601 timestamp that seeds time_utc when the input has no timestamp column
    #[arg(long)]
    start_time_utc: Option<String>,

    /// Interval in seconds between candles when using --start-time-utc
    #[arg(long, default_value_t = DEFAULT_STEP_SECONDS)]
    step_seconds: i64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    let config = AugmentConfig::new(
        cli.add_time_utc,
        cli.replace_timestamp,
        cli.start_time_utc.as_deref(),
        cli.step_seconds,
    )
    .context("invalid --start-time-utc")?;

    let summary = augment_file(&cli.input, cli.output.as_deref(), &config)
        .with_context(|| format!("failed to augment {}", cli.input.display()))?;

    info!(rows = summary.rows, "done");
    Ok(())
}
