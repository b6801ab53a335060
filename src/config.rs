use crate::error::JobError;
use anyhow::{Context, Result, anyhow};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Fields every job config must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 3] = ["seed", "window", "version"];

/// Job configuration as read from disk.
///
/// Loading only checks that the required keys are present. The typed values
/// of `seed` and `window` are resolved by the step that uses them, so a
/// malformed value surfaces at that step rather than at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct RawConfig {
    seed: Value,
    window: Value,
    version: Value,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    pub seed: i64,
    pub window: usize,
    pub version: String,
}

/// Load a job config from a YAML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<RawConfig> {
    RawConfig::load_from_file(path)
}

impl RawConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(JobError::NotFound("Configuration file not found.".to_string()).into());
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(config_str)
            .context("Failed to parse configuration file as YAML")?;

        match document {
            Value::Mapping(mapping) => Self::from_mapping(&mapping),
            other => Err(anyhow!(
                "Configuration must be a YAML mapping, found {}",
                value_kind(&other)
            )),
        }
    }

    pub fn from_mapping(mapping: &Mapping) -> Result<Self> {
        let field = |name: &str| -> Result<Value> {
            mapping.get(name).cloned().ok_or_else(|| {
                JobError::InvalidConfig(format!("Missing required config field: {}", name)).into()
            })
        };

        Ok(Self {
            seed: field(REQUIRED_FIELDS[0])?,
            window: field(REQUIRED_FIELDS[1])?,
            version: field(REQUIRED_FIELDS[2])?,
        })
    }

    /// Version label, rendered as text whatever scalar the file used.
    pub fn version(&self) -> String {
        render_scalar(&self.version)
    }

    pub fn seed(&self) -> Result<i64> {
        self.seed.as_i64().ok_or_else(|| {
            JobError::InvalidConfig(format!(
                "Config field 'seed' must be an integer, got {}",
                render_scalar(&self.seed)
            ))
            .into()
        })
    }

    /// Rolling window length. Zero, negative and non-integer windows are rejected.
    pub fn window(&self) -> Result<usize> {
        match self.window.as_i64() {
            Some(window) if window >= 1 => Ok(window as usize),
            _ => Err(JobError::InvalidConfig(format!(
                "Config field 'window' must be a positive integer, got {}",
                render_scalar(&self.window)
            ))
            .into()),
        }
    }

    pub fn resolve(&self) -> Result<JobConfig> {
        Ok(JobConfig {
            seed: self.seed()?,
            window: self.window()?,
            version: self.version(),
        })
    }
}

impl fmt::Display for RawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seed={}, window={}, version={}",
            render_scalar(&self.seed),
            render_scalar(&self.window),
            render_scalar(&self.version)
        )
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| value_kind(other).to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty document",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
