//! Temporary library trees with a seeded staging directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use droneshed_config::{LibraryConfig, LibraryLayout};

/// A temporary media library rooted in a tempdir, staging directory included.
pub struct LibraryFixture {
    temp: TempDir,
    /// Library configuration pointing at the temporary root.
    pub library: LibraryConfig,
}

impl LibraryFixture {
    /// Library root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Staging directory path.
    #[must_use]
    pub fn staging(&self) -> PathBuf {
        self.library.staging_path()
    }
}

/// Create a temporary library with an empty `To Process` staging directory.
///
/// # Errors
///
/// Returns an error if the temporary tree cannot be created.
pub fn library(layout: LibraryLayout) -> Result<LibraryFixture> {
    let temp = tempfile::Builder::new().prefix("droneshed-").tempdir()?;
    let library = LibraryConfig {
        output_root: temp.path().to_path_buf(),
        staging_dir: "To Process".to_string(),
        layout,
    };
    fs::create_dir_all(library.staging_path())?;
    Ok(LibraryFixture { temp, library })
}

/// Stage a small file under the fixture's staging directory.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn stage(fixture: &LibraryFixture, name: &str) -> Result<PathBuf> {
    let path = fixture.staging().join(name);
    fs::write(&path, b"payload")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult<T> = Result<T>;

    #[test]
    fn fixture_creates_staging_under_root() -> TestResult<()> {
        let fixture = library(LibraryLayout::MediaKind)?;
        assert!(fixture.staging().is_dir());
        assert!(fixture.staging().starts_with(fixture.root()));
        Ok(())
    }

    #[test]
    fn staged_files_land_in_staging() -> TestResult<()> {
        let fixture = library(LibraryLayout::Flat)?;
        let path = stage(&fixture, "DJI_20230615142233_0001_D.MP4")?;
        assert!(path.is_file());
        assert_eq!(path.parent(), Some(fixture.staging().as_path()));
        Ok(())
    }
}
