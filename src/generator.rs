//! Synthetic minute-bar data.
//!
//! Prices follow a Gaussian random walk. Each bar opens at the previous
//! close, moves by a `rand_distr::Normal` draw, and gets uniform wicks on
//! both sides.
//! Output is fully determined by the seed and row count: the RNG is built by
//! the caller and passed in, never shared through global state.

use crate::market_data::{OhlcvRow, rows_to_frame};
use crate::stats::round_to;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::fs::File;
use std::path::Path;

pub const DEFAULT_ROWS: usize = 10_000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_OUTPUT: &str = "data.csv";
pub const DEFAULT_START: &str = "2024-01-01 00:00:00";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PRICE_DECIMALS: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub start: NaiveDateTime,
    pub initial_price: f64,
    /// Standard deviation of the close-to-close change
    pub change_std: f64,
    /// Upper bound of each wick beyond the body
    pub max_wick: f64,
    pub min_volume_btc: f64,
    pub max_volume_btc: f64,
}

impl GeneratorConfig {
    pub fn with_rows(rows: usize) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            start: NaiveDateTime::parse_from_str(DEFAULT_START, TIMESTAMP_FORMAT)
                .unwrap_or_default(),
            initial_price: 42_000.0,
            change_std: 50.0,
            max_wick: 30.0,
            min_volume_btc: 10.0,
            max_volume_btc: 200.0,
        }
    }
}

pub fn parse_start(start: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(start, TIMESTAMP_FORMAT)
        .with_context(|| format!("Invalid start timestamp '{}', expected {}", start, TIMESTAMP_FORMAT))
}

/// The generator the dataset tools use for a given seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generate `config.rows` one-minute bars.
///
/// Written prices are rounded to cents while the walk continues from the
/// unrounded close, so rounding never compounds. Fails if `change_std` is
/// negative or NaN.
pub fn generate_bars<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> Result<Vec<OhlcvRow>> {
    let changes = Normal::new(0.0, config.change_std)
        .with_context(|| format!("Invalid price change deviation {}", config.change_std))?;
    let mut rows = Vec::with_capacity(config.rows);
    let mut price = config.initial_price;

    for i in 0..config.rows {
        let timestamp = config.start + Duration::minutes(i as i64);

        let change = changes.sample(rng);
        let open = price;
        let close = price + change;

        let high = open.max(close) + rng.random_range(0.0..config.max_wick);
        let low = open.min(close) - rng.random_range(0.0..config.max_wick);

        let volume_btc = rng.random_range(config.min_volume_btc..config.max_volume_btc);
        let volume_usd = volume_btc * close;

        rows.push(OhlcvRow {
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            open: round_to(open, PRICE_DECIMALS),
            high: round_to(high, PRICE_DECIMALS),
            low: round_to(low, PRICE_DECIMALS),
            close: round_to(close, PRICE_DECIMALS),
            volume_btc: round_to(volume_btc, PRICE_DECIMALS),
            volume_usd: round_to(volume_usd, PRICE_DECIMALS),
        });

        price = close;
    }

    Ok(rows)
}

/// Write bars as CSV with a header row, replacing any existing file.
pub fn write_csv(rows: &[OhlcvRow], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut frame = rows_to_frame(rows)?;
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
