use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use env_logger::{Builder, Env, Target};
use log::{Level, LevelFilter};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// One log line: `2024-01-01 09:30:00,123 - INFO - message`.
pub fn format_line(timestamp: DateTime<Local>, level: Level, message: impl Display) -> String {
    format!("{} - {} - {}", timestamp.format(TIMESTAMP_FORMAT), level, message)
}

/// Send INFO and above to `path`, appending to whatever the file already holds.
///
/// Only the first logger installed in a process takes effect. Later calls
/// still open (and so validate) the file, then leave the existing logger in
/// place.
pub fn init_file_logger(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let installed = Builder::new()
        .filter_level(LevelFilter::Info)
        .format(|buf, record| {
            writeln!(buf, "{}", format_line(Local::now(), record.level(), record.args()))
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init();

    if installed.is_err() {
        log::debug!("Logger already installed; {} not attached", path.display());
    }

    Ok(())
}

/// Stderr logging for the command-line tools, `info` unless RUST_LOG says otherwise.
pub fn init_stderr_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
