//! # Design
//!
//! - Constant error messages with operation/path context.
//! - Chown failures carry the `nix` source separately from plain IO.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for rotate operations.
pub type RotateResult<T> = Result<T, RotateError>;

/// Errors produced by the rotate pass.
#[derive(Debug, Error)]
pub enum RotateError {
    /// IO failures while interacting with the filesystem.
    #[error("rotate io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Ownership changes failed.
    #[cfg(unix)]
    #[error("rotate chown failure")]
    Chown {
        /// Path whose ownership could not be changed.
        path: PathBuf,
        /// Underlying nix error.
        source: nix::Error,
    },
    /// The operation is not available on this platform.
    #[error("rotate unsupported on this platform")]
    Unsupported {
        /// Operation that is unsupported.
        operation: &'static str,
    },
}

impl RotateError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[cfg(unix)]
    pub(crate) fn chown(path: impl Into<PathBuf>, source: nix::Error) -> Self {
        Self::Chown {
            path: path.into(),
            source,
        }
    }
}
