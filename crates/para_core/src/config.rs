//! Core configuration model and JSON loaders.
//!
//! # Responsibility
//! - Describe logging and processing knobs with safe defaults.
//! - Load and validate configuration from JSON text or files.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - Loaded configs are validated before being handed to callers.

use crate::model::categorization::{
    DEFAULT_AUTO_CATEGORIZE_THRESHOLD, DEFAULT_CONFIDENT_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_MAX_PARALLEL_WORKERS: usize = 4;

/// Supported log verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` for debug builds, `info` for release builds.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::build_default()
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::Invalid(format!(
                "unsupported log level `{other}`; expected trace|debug|info|warn|error"
            ))),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, ConfigError> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(value: LogLevel) -> Self {
        value.as_str().to_string()
    }
}

/// File logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

/// Processing pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Minimum confidence reported as confident.
    pub confident_threshold: f64,
    /// Minimum confidence for automatic categorization without review.
    pub auto_categorize_threshold: f64,
    /// Worker cap for parallel batch processing.
    pub max_parallel_workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            confident_threshold: DEFAULT_CONFIDENT_THRESHOLD,
            auto_categorize_threshold: DEFAULT_AUTO_CATEGORIZE_THRESHOLD,
            max_parallel_workers: DEFAULT_MAX_PARALLEL_WORKERS,
        }
    }
}

impl ProcessingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("confident_threshold", self.confident_threshold),
            ("auto_categorize_threshold", self.auto_categorize_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }
        if self.max_parallel_workers == 0 {
            return Err(ConfigError::Invalid(
                "max_parallel_workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level core configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
    pub processing: ProcessingConfig,
}

impl CoreConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.logging.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        self.processing.validate()
    }
}

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(details) => write!(f, "invalid config: {details}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}
