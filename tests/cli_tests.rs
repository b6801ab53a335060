// Runs the built binaries as subprocesses so every run gets its own logger,
// exit status and stdout.

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run_job(dir: &Path, input: &Path, config: &Path) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_rolling-signal"))
        .arg("--input")
        .arg(input)
        .arg("--config")
        .arg(config)
        .arg("--output")
        .arg(dir.join("metrics.json"))
        .arg("--log-file")
        .arg(dir.join("run.log"))
        .output()?;
    Ok(output)
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[test]
fn test_success_run_writes_report_and_log() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("data.csv");
    fs::write(&input, "timestamp,close\n2024-01-01 00:00:00,1\n2024-01-01 00:01:00,2\n2024-01-01 00:02:00,3\n2024-01-01 00:03:00,4\n2024-01-01 00:04:00,5\n")?;
    let config = dir.path().join("config.yaml");
    fs::write(&config, "seed: 42\nwindow: 2\nversion: v1\n")?;

    let output = run_job(dir.path(), &input, &config)?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = read_json(&dir.path().join("metrics.json"))?;
    assert_eq!(report["status"], "success");
    assert_eq!(report["value"], 0.8);
    assert_eq!(report["rows_processed"], 5);
    assert_eq!(report["seed"], 42);
    assert!(report["latency_ms"].as_u64().is_some());

    // stdout echoes the same document
    let echoed: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(echoed, report);

    let log = fs::read_to_string(dir.path().join("run.log"))?;
    for expected in [
        " - INFO - Job started",
        " - INFO - Config loaded: seed=42, window=2, version=v1",
        " - INFO - Data loaded: 5 rows",
        " - INFO - Rolling mean calculated with window=2",
        " - INFO - Signals generated",
        " - INFO - Metrics: signal_rate=0.8, rows_processed=5",
        " - INFO - Job completed successfully in ",
    ] {
        assert!(log.contains(expected), "log missing {expected:?}:\n{log}");
    }
    Ok(())
}

#[test]
fn test_zero_byte_input_never_logs_data_loaded() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("data.csv");
    fs::write(&input, "")?;
    let config = dir.path().join("config.yaml");
    fs::write(&config, "seed: 42\nwindow: 2\nversion: v1\n")?;

    let output = run_job(dir.path(), &input, &config)?;
    assert_eq!(output.status.code(), Some(1));

    let report = read_json(&dir.path().join("metrics.json"))?;
    assert_eq!(report["status"], "error");
    assert_eq!(report["version"], "v1");
    assert_eq!(report["error_message"], "Input CSV file is empty.");

    let log = fs::read_to_string(dir.path().join("run.log"))?;
    assert!(!log.contains("Data loaded"));
    assert!(log.contains(" - ERROR - Error occurred: Input CSV file is empty."));
    Ok(())
}

#[test]
fn test_missing_close_column_exit_status() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("data.csv");
    fs::write(&input, "timestamp,open\n2024-01-01 00:00:00,1\n")?;
    let config = dir.path().join("config.yaml");
    fs::write(&config, "seed: 1\nwindow: 3\nversion: v2\n")?;

    let output = run_job(dir.path(), &input, &config)?;
    assert_eq!(output.status.code(), Some(1));

    let report = read_json(&dir.path().join("metrics.json"))?;
    assert_eq!(
        report["error_message"],
        "Required column 'close' not found in dataset."
    );
    assert_eq!(report.as_object().map(|o| o.len()), Some(3));
    Ok(())
}

#[test]
fn test_log_file_is_appended() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("data.csv");
    fs::write(&input, "close\n1\n2\n3\n")?;
    let config = dir.path().join("config.yaml");
    fs::write(&config, "seed: 1\nwindow: 2\nversion: v1\n")?;

    run_job(dir.path(), &input, &config)?;
    run_job(dir.path(), &input, &config)?;

    let log = fs::read_to_string(dir.path().join("run.log"))?;
    assert_eq!(log.matches("Job started").count(), 2);
    Ok(())
}

#[test]
fn test_missing_flag_is_a_usage_error() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_rolling-signal"))
        .args(["--input", "data.csv", "--config", "config.yaml"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

#[test]
fn test_generated_dataset_feeds_the_job() -> Result<()> {
    let dir = tempdir()?;
    let data = dir.path().join("generated.csv");

    let generate = Command::new(env!("CARGO_BIN_EXE_generate-data"))
        .arg("--rows")
        .arg("300")
        .arg("--output")
        .arg(&data)
        .output()?;
    assert!(generate.status.success(), "stderr: {}", String::from_utf8_lossy(&generate.stderr));
    assert!(String::from_utf8_lossy(&generate.stdout).contains("created with 300 rows."));

    let csv = fs::read_to_string(&data)?;
    assert!(csv.starts_with("timestamp,open,high,low,close,volume_btc,volume_usd\n"));
    assert_eq!(csv.lines().count(), 301);

    let config = dir.path().join("config.yaml");
    fs::write(&config, "seed: 42\nwindow: 20\nversion: v1\n")?;
    let output = run_job(dir.path(), &data, &config)?;
    assert_eq!(output.status.code(), Some(0));

    let report = read_json(&dir.path().join("metrics.json"))?;
    assert_eq!(report["rows_processed"], 300);
    let value = report["value"].as_f64().unwrap_or(-1.0);
    assert!((0.0..=1.0).contains(&value));
    Ok(())
}
