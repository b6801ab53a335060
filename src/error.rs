//! Error taxonomy for the batch job.
//!
//! Pipeline steps return `anyhow::Result` and raise these variants for the
//! faults the job checks for explicitly. Anything else (I/O, YAML syntax,
//! CSV parsing, numeric casts) travels as a plain `anyhow::Error`. The job
//! driver renders both the same way: one message string in the error report.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    /// Config or input file missing on disk.
    #[error("{0}")]
    NotFound(String),

    /// Required config field absent, or a field that cannot be used.
    #[error("{0}")]
    InvalidConfig(String),

    /// Input file exists but has zero bytes.
    #[error("Input CSV file is empty.")]
    EmptyInput,

    /// Input parsed to a table without data rows.
    #[error("Input CSV contains no rows.")]
    NoRows,

    /// A required column is absent from the header.
    #[error("Required column '{0}' not found in dataset.")]
    MissingColumn(String),
}

impl JobError {
    /// Short tag for log lines and tests
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::NotFound(_) => "not_found",
            JobError::InvalidConfig(_) => "invalid_config",
            JobError::EmptyInput => "empty_input",
            JobError::NoRows => "no_rows",
            JobError::MissingColumn(_) => "missing_column",
        }
    }
}

/// Typed kind of an error raised anywhere in the pipeline, if it has one.
pub fn job_error_of(err: &anyhow::Error) -> Option<&JobError> {
    err.downcast_ref::<JobError>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(
            JobError::MissingColumn("close".to_string()).to_string(),
            "Required column 'close' not found in dataset."
        );
        assert_eq!(JobError::EmptyInput.to_string(), "Input CSV file is empty.");
        assert_eq!(JobError::NoRows.to_string(), "Input CSV contains no rows.");
    }

    #[test]
    fn test_kind_survives_anyhow_wrapping() {
        let err: anyhow::Error = JobError::NoRows.into();
        assert_eq!(job_error_of(&err), Some(&JobError::NoRows));
        assert_eq!(job_error_of(&err).map(JobError::kind), Some("no_rows"));

        let plain = anyhow::anyhow!("permission denied");
        assert!(job_error_of(&plain).is_none());
    }
}
