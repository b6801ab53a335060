use crate::error::JobError;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs;
use std::path::Path;

pub const CLOSE_COLUMN: &str = "close";
pub const ROLLING_MEAN_COLUMN: &str = "rolling_mean";
pub const SIGNAL_COLUMN: &str = "signal";

/// Column order of the OHLCV files this crate reads and writes.
pub const OHLCV_COLUMNS: [&str; 7] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume_btc",
    "volume_usd",
];

/// One minute bar. Only `close` is consumed by the job.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvRow {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume_btc: f64,
    pub volume_usd: f64,
}

/// Cheap pre-flight check on the input path: it must exist and be non-empty.
///
/// This is a byte-size check only. A non-empty but malformed file passes and
/// fails later while the table is parsed.
pub fn validate_input_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(JobError::NotFound("Input CSV file not found.".to_string()).into());
    }

    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;
    if metadata.len() == 0 {
        return Err(JobError::EmptyInput.into());
    }

    Ok(())
}

/// Time-ordered price table backed by a polars `DataFrame`.
#[derive(Debug, Clone)]
pub struct PriceTable {
    frame: DataFrame,
}

impl PriceTable {
    /// Parse a CSV file with a header row.
    ///
    /// Column types are inferred from every row, so a `close` column that
    /// starts with whole numbers still reads as float when decimals follow.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to open {}", path.display()))?
            .finish()
            .with_context(|| format!("Failed to parse {} as CSV", path.display()))?;

        Self::from_frame(frame)
    }

    /// Wrap an already parsed frame, applying the same checks as [`PriceTable::load`].
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        if frame.height() == 0 {
            return Err(JobError::NoRows.into());
        }
        if frame.get_column_index(CLOSE_COLUMN).is_none() {
            return Err(JobError::MissingColumn(CLOSE_COLUMN.to_string()).into());
        }

        Ok(Self { frame })
    }

    pub fn from_rows(rows: &[OhlcvRow]) -> Result<Self> {
        Self::from_frame(rows_to_frame(rows)?)
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// `close` as floats; empty cells come back as `None`.
    pub fn close_prices(&self) -> Result<Vec<Option<f64>>> {
        let close = self
            .frame
            .column(CLOSE_COLUMN)?
            .as_materialized_series()
            .strict_cast(&DataType::Float64)
            .with_context(|| format!("Column '{}' must be numeric", CLOSE_COLUMN))?;

        Ok(close.f64()?.into_iter().collect())
    }

    /// Attach the two derived columns. Both must have one entry per row.
    pub fn with_derived_columns(
        mut self,
        rolling_mean: &[Option<f64>],
        signals: &[u8],
    ) -> Result<Self> {
        let signal_values: Vec<i32> = signals.iter().map(|&s| i32::from(s)).collect();

        self.frame
            .with_column(Series::new(ROLLING_MEAN_COLUMN.into(), rolling_mean))
            .context("Failed to append rolling mean column")?;
        self.frame
            .with_column(Series::new(SIGNAL_COLUMN.into(), signal_values))
            .context("Failed to append signal column")?;

        Ok(self)
    }
}

/// Build a frame with the standard OHLCV column layout.
pub fn rows_to_frame(rows: &[OhlcvRow]) -> Result<DataFrame> {
    let column = |f: fn(&OhlcvRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    let timestamps: Vec<&str> = rows.iter().map(|r| r.timestamp.as_str()).collect();

    let frame = df!(
        OHLCV_COLUMNS[0] => timestamps,
        OHLCV_COLUMNS[1] => column(|r| r.open),
        OHLCV_COLUMNS[2] => column(|r| r.high),
        OHLCV_COLUMNS[3] => column(|r| r.low),
        OHLCV_COLUMNS[4] => column(|r| r.close),
        OHLCV_COLUMNS[5] => column(|r| r.volume_btc),
        OHLCV_COLUMNS[6] => column(|r| r.volume_usd),
    )?;

    Ok(frame)
}
