//! Core logging bootstrap and safety policy.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Provide sanitized panic payload summaries for diagnostics.
//!
//! # Invariants
//! - Logging init is idempotent for the same directory and level.
//! - Re-initialization with a different directory or level is rejected.
//! - Logging initialization must not panic.
//! - Core events are metadata-only: ids, statuses, categories and timings,
//!   never thought titles or content.

use crate::config::{LogLevel, LoggingConfig};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "para";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: LogLevel,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Logging bootstrap failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// No `log_dir` configured.
    MissingLogDir,
    RelativeLogDir(PathBuf),
    CreateDir { path: PathBuf, details: String },
    Backend(String),
    /// Logging is already active with other settings.
    Conflict(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLogDir => write!(f, "log_dir must be configured to enable file logging"),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be an absolute path, got `{}`", path.display())
            }
            Self::CreateDir { path, details } => write!(
                f,
                "failed to create log directory `{}`: {details}",
                path.display()
            ),
            Self::Backend(details) => write!(f, "failed to start logger: {details}"),
            Self::Conflict(details) => write!(f, "{details}"),
        }
    }
}

impl Error for LoggingError {}

/// Initializes rolling file logging from config.
///
/// # Errors
/// - `MissingLogDir`/`RelativeLogDir` for unusable directories.
/// - `CreateDir`/`Backend` when the directory or logger cannot be set up.
/// - `Conflict` when logging is already active with other settings.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let log_dir = normalize_log_dir(config.log_dir.as_deref())?;
    let level = config.level;

    if let Some(state) = LOGGING_STATE.get() {
        return ensure_same_settings(state, level, &log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, LoggingError> {
        std::fs::create_dir_all(&log_dir).map_err(|err| LoggingError::CreateDir {
            path: log_dir.clone(),
            details: err.to_string(),
        })?;

        let logger = Logger::try_with_str(level.as_str())
            .map_err(|err| LoggingError::Backend(err.to_string()))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir.as_path())
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| LoggingError::Backend(err.to_string()))?;

        install_panic_hook_once();

        info!(
            "event=core_init module=core status=ok level={} log_dir={} version={}",
            level,
            log_dir.display(),
            env!("CARGO_PKG_VERSION")
        );

        Ok(LoggingState {
            level,
            log_dir: log_dir.clone(),
            _logger: logger,
        })
    })?;

    ensure_same_settings(state, level, &log_dir)
}

/// Returns `(level, log_dir)` when logging is active.
pub fn logging_status() -> Option<(LogLevel, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// Returns the default log level for current build mode.
pub fn default_log_level() -> LogLevel {
    LogLevel::build_default()
}

/// Summarizes a panic payload as a single sanitized line.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&message, MAX_PANIC_PAYLOAD_CHARS)
}

fn ensure_same_settings(
    state: &LoggingState,
    level: LogLevel,
    log_dir: &Path,
) -> Result<(), LoggingError> {
    if state.log_dir != log_dir {
        return Err(LoggingError::Conflict(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        )));
    }
    if state.level != level {
        return Err(LoggingError::Conflict(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        )));
    }
    Ok(())
}

fn normalize_log_dir(log_dir: Option<&Path>) -> Result<PathBuf, LoggingError> {
    let path = log_dir.ok_or(LoggingError::MissingLogDir)?;
    if path.as_os_str().is_empty() {
        return Err(LoggingError::MissingLogDir);
    }
    if !path.is_absolute() {
        return Err(LoggingError::RelativeLogDir(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.get().is_some() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Payload may contain user text; keep it single-line and capped.
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_message(panic_info.payload());
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));

    let _ = PANIC_HOOK_INSTALLED.set(());
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_log_dir, panic_message, sanitize_message,
        LoggingError,
    };
    use crate::config::{LogLevel, LoggingConfig};
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    // The logger outlives the test, so its directory must too.
    fn unique_temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "para-logging-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn normalize_log_dir_rejects_missing_and_relative_paths() {
        assert_eq!(normalize_log_dir(None), Err(LoggingError::MissingLogDir));
        let err = normalize_log_dir(Some(Path::new("logs/dev")))
            .expect_err("relative paths must be rejected");
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn sanitize_message_removes_newlines_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let static_payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(static_payload.as_ref()), "boom");

        let owned_payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bad\nthing"));
        assert_eq!(panic_message(owned_payload.as_ref()), "bad thing");

        let other_payload: Box<dyn std::any::Any + Send> = Box::new(42_u32);
        assert_eq!(
            panic_message(other_payload.as_ref()),
            "non-string panic payload"
        );
    }

    #[test]
    fn init_logging_is_idempotent_for_same_config_and_rejects_conflicts() {
        let first_dir = unique_temp_dir("idempotent");
        let second_dir = unique_temp_dir("different");
        let config = LoggingConfig {
            level: LogLevel::Info,
            log_dir: Some(first_dir.clone()),
        };

        init_logging(&config).expect("first init should succeed");
        init_logging(&config).expect("same config should be idempotent");

        let level_error = init_logging(&LoggingConfig {
            level: LogLevel::Debug,
            ..config.clone()
        })
        .expect_err("level conflict should fail");
        assert!(level_error.to_string().contains("refusing to switch"));

        let dir_error = init_logging(&LoggingConfig {
            log_dir: Some(second_dir),
            ..config.clone()
        })
        .expect_err("directory conflict should fail");
        assert!(dir_error.to_string().contains("refusing to switch"));

        let (active_level, active_dir) = logging_status().expect("logging should be active");
        assert_eq!(active_level, LogLevel::Info);
        assert_eq!(active_dir, first_dir);
    }
}
