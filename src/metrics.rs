use crate::config::JobConfig;
use crate::stats::{round_to, signal_rate};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Label of the single metric the job reports
pub const METRIC_NAME: &str = "signal_rate";

/// Version reported when a run fails before its config was read
pub const UNKNOWN_VERSION: &str = "unknown";

const VALUE_DECIMALS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

/// Summary written after a successful run. Field order is the document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessReport {
    pub version: String,
    pub rows_processed: usize,
    pub metric: String,
    pub value: f64,
    pub latency_ms: u64,
    pub seed: i64,
    pub status: ReportStatus,
}

/// Document written in place of the summary when any step fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub version: String,
    pub status: ReportStatus,
    pub error_message: String,
}

impl ErrorReport {
    pub fn new(version: Option<String>, error_message: impl Into<String>) -> Self {
        Self {
            version: version.unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            status: ReportStatus::Error,
            error_message: error_message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricsReport {
    Success(SuccessReport),
    Error(ErrorReport),
}

impl MetricsReport {
    pub fn status(&self) -> ReportStatus {
        match self {
            MetricsReport::Success(report) => report.status,
            MetricsReport::Error(report) => report.status,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            MetricsReport::Success(report) => &report.version,
            MetricsReport::Error(report) => &report.version,
        }
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .context("Failed to serialize metrics report")?;

        Ok(String::from_utf8(buf)?)
    }

    /// Write the report, replacing whatever is at `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write metrics to {}", path.display()))
    }
}

impl From<SuccessReport> for MetricsReport {
    fn from(report: SuccessReport) -> Self {
        MetricsReport::Success(report)
    }
}

impl From<ErrorReport> for MetricsReport {
    fn from(report: ErrorReport) -> Self {
        MetricsReport::Error(report)
    }
}

/// Turns the signal column into the success report.
pub struct MetricsAggregator {
    started: Instant,
}

impl MetricsAggregator {
    /// `started` is the moment the job began; latency is measured from it.
    pub fn new(started: Instant) -> Self {
        Self { started }
    }

    pub fn summarize(&self, config: &JobConfig, signals: &[u8]) -> Result<SuccessReport> {
        let rate = signal_rate(signals)?;

        Ok(SuccessReport {
            version: config.version.clone(),
            rows_processed: signals.len(),
            metric: METRIC_NAME.to_string(),
            value: round_to(rate, VALUE_DECIMALS),
            latency_ms: self.latency_ms(),
            seed: config.seed,
            status: ReportStatus::Success,
        })
    }

    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
