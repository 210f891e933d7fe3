//! Logging sink configuration and subscriber installation.
//!
//! # Design
//! - One explicit `LoggingConfig` value constructed at process start and
//!   handed to `init_logging`; no module-level logger state.
//! - File sink is append-only; stderr mirrors errors; stdout mirrors
//!   non-error lines only when attached to a terminal.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::{LevelFilter, filter_fn};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{TelemetryError, TelemetryResult};
use crate::format::LineFormat;

/// Default logging level when the configuration does not set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging sink configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Append-only log file path.
    pub file: PathBuf,
    /// Minimum level written to the log file (e.g., `info`, `debug`).
    pub level: String,
    /// Mirror error lines to stderr.
    pub mirror_stderr: bool,
    /// Mirror non-error lines to stdout when stdout is a terminal.
    pub mirror_stdout_if_interactive: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("droneshed.log"),
            level: DEFAULT_LOG_LEVEL.to_string(),
            mirror_stderr: true,
            mirror_stdout_if_interactive: true,
        }
    }
}

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the level does not parse, the log file cannot be
/// opened for append, or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> TelemetryResult<()> {
    let max_level = LevelFilter::from_str(&config.level).map_err(|_| {
        TelemetryError::InvalidLevel {
            value: config.level.clone(),
        }
    })?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|source| TelemetryError::io("log.open", &config.file, source))?;

    let file_layer = fmt::layer()
        .event_format(LineFormat)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(max_level);

    let stderr_layer = config.mirror_stderr.then(|| {
        fmt::layer()
            .event_format(LineFormat)
            .with_ansi(false)
            .with_writer(io::stderr)
            .with_filter(LevelFilter::ERROR)
    });

    let mirror_stdout = config.mirror_stdout_if_interactive && io::stdout().is_terminal();
    let stdout_layer = mirror_stdout.then(|| {
        fmt::layer()
            .event_format(LineFormat)
            .with_ansi(false)
            .with_writer(io::stdout)
            // Errors already reach stderr; keep the terminal mirror clean.
            .with_filter(filter_fn(move |metadata| {
                *metadata.level() != Level::ERROR && *metadata.level() <= max_level
            }))
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|source| TelemetryError::Subscriber { source })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;
    use tracing::info;

    type TestResult<T> = Result<T>;

    #[test]
    fn rejects_unknown_level_before_touching_global_state() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        let err = init_logging(&config).expect_err("unknown level should fail");
        assert!(matches!(err, TelemetryError::InvalidLevel { .. }));
    }

    #[test]
    fn reports_unwritable_log_file() -> TestResult<()> {
        let temp = TempDir::new()?;
        let config = LoggingConfig {
            file: temp.path().join("missing").join("droneshed.log"),
            ..LoggingConfig::default()
        };
        let err = init_logging(&config).expect_err("unwritable path should fail");
        assert!(matches!(
            err,
            TelemetryError::Io {
                operation: "log.open",
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn installs_once_and_appends_to_file() -> TestResult<()> {
        let temp = TempDir::new()?;
        let log_path = temp.path().join("droneshed.log");
        let config = LoggingConfig {
            file: log_path.clone(),
            mirror_stderr: false,
            mirror_stdout_if_interactive: false,
            ..LoggingConfig::default()
        };

        init_logging(&config)?;
        info!("organize pass started");

        let contents = fs::read_to_string(&log_path)?;
        assert!(contents.contains(" - INFO - organize pass started"));

        // A second install must fail rather than silently replace the sink.
        let err = init_logging(&config).expect_err("second install should fail");
        assert!(matches!(err, TelemetryError::Subscriber { .. }));
        Ok(())
    }
}
