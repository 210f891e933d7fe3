//! # Design
//!
//! - Constant error messages with operation context; the detailed story is
//!   already in the log by the time one of these reaches `main`.
//! - Every variant maps to exit code 1.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading or validation failed.
    #[error("configuration load failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: droneshed_config::ConfigError,
    },
    /// Logging or metrics setup failed.
    #[error("telemetry setup failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: droneshed_telemetry::TelemetryError,
    },
    /// The organize pass failed.
    #[error("organize pass failed")]
    Organize {
        /// Operation identifier.
        operation: &'static str,
        /// Source organize error.
        source: droneshed_organize::OrganizeError,
    },
    /// The rotate pass failed.
    #[error("rotate pass failed")]
    Rotate {
        /// Operation identifier.
        operation: &'static str,
        /// Source rotate error.
        source: droneshed_rotate::RotateError,
    },
    /// A required directory was missing before the pass started.
    #[error("required directory missing")]
    Precondition {
        /// Path that failed the check.
        path: PathBuf,
        /// Machine-readable reason.
        reason: &'static str,
    },
    /// The configuration has no `rotate` section.
    #[error("rotate is not configured")]
    RotateUnconfigured,
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: droneshed_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: droneshed_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn organize(
        operation: &'static str,
        source: droneshed_organize::OrganizeError,
    ) -> Self {
        Self::Organize { operation, source }
    }

    pub(crate) const fn rotate(
        operation: &'static str,
        source: droneshed_rotate::RotateError,
    ) -> Self {
        Self::Rotate { operation, source }
    }

    pub(crate) fn precondition(path: impl Into<PathBuf>, reason: &'static str) -> Self {
        Self::Precondition {
            path: path.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn helpers_build_variants_with_sources() {
        let config = AppError::config(
            "config.load",
            droneshed_config::ConfigError::Io {
                operation: "config.read",
                path: PathBuf::from("/etc/droneshed.json"),
                source: io::Error::other("io"),
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert!(config.source().is_some());

        let precondition = AppError::precondition("/srv/footage", "output_root_missing");
        assert!(matches!(precondition, AppError::Precondition { .. }));
        assert!(precondition.source().is_none());
    }
}
