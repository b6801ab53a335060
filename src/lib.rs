pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod job;
pub mod logging;
pub mod market_data;
pub mod metrics;
pub mod signals;
pub mod stats;

pub use error::JobError;
pub use job::{JobDriver, JobOutcome};
