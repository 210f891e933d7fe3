//! # Design
//!
//! - Constant error messages with context fields for the failing operation.
//! - Preserve source errors without re-logging at call sites.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors produced while installing logging or registering counters.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// IO failures while opening the log file.
    #[error("telemetry io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configured log level did not parse.
    #[error("invalid log level")]
    InvalidLevel {
        /// Level string provided by the configuration.
        value: String,
    },
    /// The global tracing subscriber could not be installed.
    #[error("tracing subscriber install failed")]
    Subscriber {
        /// Underlying installation error.
        source: tracing_subscriber::util::TryInitError,
    },
    /// Counter registration failed.
    #[error("metrics registration failed")]
    Metrics {
        /// Counter being registered.
        counter: &'static str,
        /// Underlying prometheus error.
        source: prometheus::Error,
    },
}

impl TelemetryError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn metrics(counter: &'static str, source: prometheus::Error) -> Self {
        Self::Metrics { counter, source }
    }
}
