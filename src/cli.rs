use clap::Parser;
use std::path::PathBuf;

use crate::generator::{DEFAULT_OUTPUT, DEFAULT_ROWS, DEFAULT_SEED, DEFAULT_START};

/// Arguments of the batch job. Every flag is required.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rolling-signal",
    about = "Compute a rolling-mean signal rate over an OHLCV CSV and write a JSON report"
)]
pub struct JobArgs {
    /// Input CSV with a header row and a numeric `close` column
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// YAML config with `seed`, `window` and `version`
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Where the JSON report is written (overwritten)
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Log file, appended to
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: PathBuf,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "generate-data",
    about = "Write a synthetic minute-bar OHLCV dataset from a seeded random walk"
)]
pub struct GenerateArgs {
    /// Number of minute bars
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Seed for the random walk
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Destination CSV
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Timestamp of the first bar, `YYYY-MM-DD HH:MM:SS`
    #[arg(long, default_value = DEFAULT_START)]
    pub start: String,
}
