//! Scoped permission tightening.
//!
//! # Design
//! - Acquisition captures the current ownership/mode and applies the
//!   tightened state; restoration happens exactly once, on `restore()` or
//!   on drop, so the file is put back on every exit path including panics.

use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use nix::unistd::{Gid, Uid, chown};
use tracing::warn;

use crate::error::{RotateError, RotateResult};

/// Ownership and permission bits of a file at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOwnership {
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
    /// Permission bits (lower nine).
    pub mode: u32,
}

impl FileOwnership {
    /// Read the current ownership and mode of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stat'ed.
    pub fn capture(path: &Path) -> RotateResult<Self> {
        let metadata =
            fs::metadata(path).map_err(|source| RotateError::io("guard.stat", path, source))?;
        Ok(Self {
            uid: metadata.uid(),
            gid: metadata.gid(),
            mode: metadata.mode() & 0o777,
        })
    }
}

/// Guard that holds a file in a tightened permission state and restores the
/// captured original when it goes out of scope.
#[derive(Debug)]
pub struct PermissionGuard {
    path: PathBuf,
    original: FileOwnership,
    restored: bool,
}

impl PermissionGuard {
    /// Capture the file's current state and apply `tightened`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stat'ed or the tightened
    /// state cannot be applied; no guard is created in that case and the
    /// file is left as found.
    pub fn acquire(path: &Path, tightened: FileOwnership) -> RotateResult<Self> {
        let original = FileOwnership::capture(path)?;
        apply(path, tightened)?;
        Ok(Self {
            path: path.to_path_buf(),
            original,
            restored: false,
        })
    }

    /// Ownership and mode recorded at acquisition.
    #[must_use]
    pub const fn original(&self) -> FileOwnership {
        self.original
    }

    /// Restore the original state, consuming the guard.
    ///
    /// # Errors
    ///
    /// Returns an error if the restoration fails; the drop handler will
    /// not retry after an explicit restore attempt.
    pub fn restore(mut self) -> RotateResult<()> {
        self.restored = true;
        apply(&self.path, self.original)
    }
}

impl Drop for PermissionGuard {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(err) = apply(&self.path, self.original) {
            warn!(
                path = %self.path.display(),
                error = ?err,
                "failed to restore file permissions"
            );
        }
    }
}

fn apply(path: &Path, state: FileOwnership) -> RotateResult<()> {
    chown(
        path,
        Some(Uid::from_raw(state.uid)),
        Some(Gid::from_raw(state.gid)),
    )
    .map_err(|source| RotateError::chown(path, source))?;
    fs::set_permissions(path, fs::Permissions::from_mode(state.mode))
        .map_err(|source| RotateError::io("guard.chmod", path, source))?;
    Ok(())
}
