//! # Design
//!
//! - Constant error messages with operation/path context, as elsewhere in
//!   the workspace.
//! - Per-file outcomes of a pass are not errors; only failures that abort
//!   the whole pass (or construction) surface here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for organize operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Errors produced by the organize pass.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// IO failures while interacting with the filesystem.
    #[error("organize io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A filename pattern failed to compile.
    #[error("organize pattern failure")]
    Pattern {
        /// Pattern that failed to compile.
        pattern: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// The destination already contains a same-named file.
    #[error("destination file already exists")]
    DestinationExists {
        /// Path that would have been overwritten.
        path: PathBuf,
    },
}

impl OrganizeError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn pattern(pattern: &'static str, source: regex::Error) -> Self {
        Self::Pattern { pattern, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn io_helper_preserves_source() {
        let err = OrganizeError::io("move.copy", "/srv/footage/file", io::Error::other("io"));
        assert!(matches!(err, OrganizeError::Io { .. }));
        assert!(err.source().is_some());
    }
}
