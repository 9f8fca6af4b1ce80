//! Layered configuration for Decima tools.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use serde_json::Value;

/// Prefix of environment variable overrides (`DECIMA__LOGGING__LEVEL=debug`).
pub const ENV_PREFIX: &str = "DECIMA";

/// Fully merged settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Log level and record format.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Rendering of computed values.
    #[serde(default)]
    pub output: OutputConfig,
    /// Indicator documents addressable by name.
    #[serde(default)]
    pub presets: BTreeMap<String, Value>,
}

impl AppConfig {
    /// Returns the indicator document registered under `name`.
    pub fn preset(&self, name: &str) -> Result<&Value> {
        self.presets.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.presets.keys().map(String::as_str).collect();
            anyhow!("unknown preset '{name}' (known: {})", known.join(", "))
        })
    }
}

/// Tracing setup applied by the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// Record format written to stderr.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Rendering of log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human readable lines.
    #[default]
    Pretty,
    /// One JSON object per record.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("unsupported log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Output formatting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Decimal places kept when printing results; full precision when unset.
    #[serde(default)]
    pub scale: Option<u32>,
}

/// Loads `default.toml` and the optional `<env>.toml` from `config_dir`, then
/// applies `DECIMA__*` environment overrides. Missing files are skipped.
pub fn load_config(config_dir: &Path, env: Option<&str>) -> Result<AppConfig> {
    let mut builder =
        Config::builder().add_source(File::from(config_dir.join("default.toml")).required(false));
    if let Some(env) = env {
        builder = builder
            .add_source(File::from(config_dir.join(format!("{env}.toml"))).required(false));
    }
    builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("failed to load configuration from {}", config_dir.display()))?
        .try_deserialize()
        .context("invalid configuration")
}
