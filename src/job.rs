//! Batch job driver.
//!
//! Runs config, input validation, table load, rolling mean, signals and
//! metrics in a straight line. Every step returns `anyhow::Result`; the first
//! error ends the run and is turned into the error report in exactly one
//! place, [`JobDriver::run`]. There are no retries and no partial results.

use crate::cli::JobArgs;
use crate::config::{JobConfig, load_config};
use crate::error::{JobError, job_error_of};
use crate::logging;
use crate::market_data::{PriceTable, ROLLING_MEAN_COLUMN, validate_input_file};
use crate::metrics::{ErrorReport, MetricsAggregator, MetricsReport, SuccessReport};
use crate::signals::generate_signals;
use crate::stats::rolling_mean;
use anyhow::Result;
use log::{debug, error, info};
use std::time::Instant;

/// Terminal state of a run.
#[derive(Debug)]
pub enum JobOutcome {
    Succeeded(SuccessReport),
    Failed {
        report: ErrorReport,
        error: anyhow::Error,
    },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded(_))
    }

    /// Process exit status: 0 on success, 1 on any handled fault.
    pub fn exit_status(&self) -> u8 {
        match self {
            JobOutcome::Succeeded(_) => 0,
            JobOutcome::Failed { .. } => 1,
        }
    }

    /// The document that was written to the output path.
    pub fn report(&self) -> MetricsReport {
        match self {
            JobOutcome::Succeeded(report) => report.clone().into(),
            JobOutcome::Failed { report, .. } => report.clone().into(),
        }
    }

    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            JobOutcome::Succeeded(_) => None,
            JobOutcome::Failed { error, .. } => Some(error),
        }
    }
}

pub struct JobDriver {
    args: JobArgs,
    started: Instant,
    /// Version from the config, once it has been read
    version: Option<String>,
}

impl JobDriver {
    pub fn new(args: JobArgs) -> Self {
        Self::started_at(args, Instant::now())
    }

    /// Driver whose latency clock began at `started`.
    pub fn started_at(args: JobArgs, started: Instant) -> Self {
        Self {
            args,
            started,
            version: None,
        }
    }

    /// Run to completion. Always writes one report to the output path.
    pub fn run(mut self) -> JobOutcome {
        match self.execute() {
            Ok(report) => JobOutcome::Succeeded(report),
            Err(err) => self.fail(err),
        }
    }

    fn execute(&mut self) -> Result<SuccessReport> {
        logging::init_file_logger(&self.args.log_file)?;
        info!("Job started");

        let raw_config = load_config(&self.args.config)?;
        self.version = Some(raw_config.version());
        info!("Config loaded: {}", raw_config);
        let seed = raw_config.seed()?;

        validate_input_file(&self.args.input)?;
        let table = PriceTable::load(&self.args.input)?;
        info!("Data loaded: {} rows", table.len());

        let window = raw_config.window()?;
        let close = table.close_prices()?;
        let means = rolling_mean(&close, window);
        info!("Rolling mean calculated with window={}", window);

        let signals = generate_signals(&close, &means);
        let table = table.with_derived_columns(&means, &signals)?;
        info!("Signals generated");
        debug!(
            "{} of {} rows have no rolling mean",
            table.frame().column(ROLLING_MEAN_COLUMN)?.null_count(),
            table.len()
        );

        let config = JobConfig {
            seed,
            window,
            version: raw_config.version(),
        };
        let report = MetricsAggregator::new(self.started).summarize(&config, &signals)?;
        MetricsReport::from(report.clone()).write_to(&self.args.output)?;

        info!(
            "Metrics: signal_rate={}, rows_processed={}",
            report.value, report.rows_processed
        );
        info!("Job completed successfully in {}ms", report.latency_ms);

        Ok(report)
    }

    fn fail(self, err: anyhow::Error) -> JobOutcome {
        let message = format!("{:#}", err);
        debug!(
            "Run failed with {} error",
            job_error_of(&err).map(JobError::kind).unwrap_or("unclassified")
        );
        let report = ErrorReport::new(self.version, message.clone());

        if let Err(write_err) = MetricsReport::from(report.clone()).write_to(&self.args.output) {
            error!("Could not write error report: {:#}", write_err);
        }
        error!("Error occurred: {}", message);

        JobOutcome::Failed { report, error: err }
    }
}
