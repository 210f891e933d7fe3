//! The staging-directory pass.
//!
//! # Design
//! - One synchronous pass, per-file isolation: a file's failure is logged
//!   and counted, never propagated to the rest of the batch.
//! - Already-moved files are simply absent from the next listing, so
//!   re-invocation is the retry mechanism.
//! - Concurrent invocations race benignly: the losing mover's rename fails
//!   on a vanished source and is logged like any other move failure.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

use droneshed_config::LibraryConfig;
use droneshed_telemetry::Metrics;

use crate::classify::{Classification, Classifier, destination_dir};
use crate::error::{OrganizeError, OrganizeResult};

/// Per-file totals for one pass over the staging directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Files moved into the library.
    pub moved: u64,
    /// Files whose names matched no known pattern.
    pub unrecognized: u64,
    /// Files recognised but unsupported under the configured layout.
    pub unsupported: u64,
    /// Files that failed directory creation or the move itself.
    pub failed: u64,
}

impl RunSummary {
    /// Whether the pass completed without any skipped or failed file.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.unrecognized == 0 && self.unsupported == 0 && self.failed == 0
    }

    const fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Moved => self.moved += 1,
            FileOutcome::Unrecognized => self.unrecognized += 1,
            FileOutcome::Unsupported => self.unsupported += 1,
            FileOutcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FileOutcome {
    Moved,
    Unrecognized,
    Unsupported,
    Failed,
}

impl FileOutcome {
    const fn label(self) -> &'static str {
        match self {
            Self::Moved => "moved",
            Self::Unrecognized => "unrecognized",
            Self::Unsupported => "unsupported",
            Self::Failed => "failed",
        }
    }
}

/// Service that classifies and relocates staged media files.
pub struct OrganizeService {
    classifier: Classifier,
    library: LibraryConfig,
    metrics: Metrics,
}

impl OrganizeService {
    /// Construct the service, compiling the filename patterns once.
    ///
    /// # Errors
    ///
    /// Returns an error if a filename pattern fails to compile.
    pub fn new(library: LibraryConfig, metrics: Metrics) -> OrganizeResult<Self> {
        Ok(Self {
            classifier: Classifier::new()?,
            library,
            metrics,
        })
    }

    /// Perform one pass over the staging directory.
    ///
    /// # Errors
    ///
    /// Returns an error only when the staging directory itself cannot be
    /// listed; per-file failures are logged, counted, and isolated.
    pub fn process_files(&self) -> OrganizeResult<RunSummary> {
        let staging = self.library.staging_path();

        let mut files = Vec::new();
        let entries = fs::read_dir(&staging)
            .map_err(|source| OrganizeError::io("staging.read_dir", &staging, source))?;
        for entry in entries {
            let entry = entry
                .map_err(|source| OrganizeError::io("staging.read_entry", &staging, source))?;
            let path = entry.path();
            // Sub-directories and symlinks to directories are not staged media.
            if path.is_file() {
                files.push(path);
            }
        }

        if files.is_empty() {
            info!(staging = %staging.display(), "no files to process");
            return Ok(RunSummary::default());
        }

        let mut summary = RunSummary::default();
        for path in &files {
            let outcome = match path.file_name().and_then(|name| name.to_str()) {
                Some(filename) => self.process_one(path, filename),
                None => {
                    error!(
                        file = %path.display(),
                        "skipping file with non-UTF-8 name"
                    );
                    FileOutcome::Unrecognized
                }
            };
            self.metrics.inc_file(outcome.label());
            summary.record(outcome);
        }

        Ok(summary)
    }

    fn process_one(&self, path: &Path, filename: &str) -> FileOutcome {
        let classification = self.classifier.classify(filename);
        if classification == Classification::Unrecognized {
            error!(file = filename, "skipping file not in expected format");
            return FileOutcome::Unrecognized;
        }

        let Some(target_dir) = destination_dir(
            &self.library.output_root,
            self.library.layout,
            &classification,
        ) else {
            error!(
                file = filename,
                layout = self.library.layout.as_str(),
                "layout does not accept pictures; leaving file in staging"
            );
            return FileOutcome::Unsupported;
        };

        if let Err(err) = self.ensure_directory(&target_dir) {
            error!(
                file = filename,
                path = %target_dir.display(),
                error = ?err,
                "failed to create destination directory"
            );
            return FileOutcome::Failed;
        }

        let destination = target_dir.join(filename);
        match Self::move_file(path, &destination) {
            Ok(()) => {
                info!(
                    file = filename,
                    destination = %target_dir.display(),
                    "moved file"
                );
                FileOutcome::Moved
            }
            Err(err) => {
                error!(
                    file = filename,
                    destination = %target_dir.display(),
                    error = ?err,
                    "failed to move file"
                );
                FileOutcome::Failed
            }
        }
    }

    fn ensure_directory(&self, dir: &Path) -> OrganizeResult<()> {
        if dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir)
            .map_err(|source| OrganizeError::io("destination.create_dir", dir, source))?;
        info!(path = %dir.display(), "created directory");
        self.metrics.inc_dir_created();
        Ok(())
    }

    fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
        if destination.exists() {
            return Err(OrganizeError::DestinationExists {
                path: destination.to_path_buf(),
            });
        }
        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(_rename_err) => {
                // Staging and library may sit on different devices; fall back
                // to copy-then-remove the way shutil-style movers do.
                fs::copy(source, destination)
                    .map_err(|source_err| OrganizeError::io("move.copy", destination, source_err))?;
                fs::remove_file(source)
                    .map_err(|source_err| OrganizeError::io("move.cleanup", source, source_err))?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use droneshed_config::LibraryLayout;
    use droneshed_test_support::fixtures::{self, LibraryFixture};
    use std::fs;

    type TestResult<T> = Result<T>;

    fn service(fixture: &LibraryFixture) -> TestResult<OrganizeService> {
        Ok(OrganizeService::new(fixture.library.clone(), Metrics::new()?)?)
    }

    #[test]
    fn moves_video_into_dated_tree() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::MediaKind)?;
        fixtures::stage(&fixture, "DJI_20230615142233_0001_D.MP4")?;

        let summary = service(&fixture)?.process_files()?;

        assert_eq!(summary.moved, 1);
        assert!(summary.is_clean());
        assert!(
            fixture
                .root()
                .join("media/video/2023/06/15/DJI_20230615142233_0001_D.MP4")
                .is_file()
        );
        assert!(!fixture.staging().join("DJI_20230615142233_0001_D.MP4").exists());
        Ok(())
    }

    #[test]
    fn moves_pictures_with_and_without_burst_segment() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::MediaKind)?;
        fixtures::stage(&fixture, "DJI_20230615142233_0001_D_042.JPG")?;
        fixtures::stage(&fixture, "DJI_20230615142233_0002_D_pano.JPG")?;

        let summary = service(&fixture)?.process_files()?;

        assert_eq!(summary.moved, 2);
        assert!(
            fixture
                .root()
                .join("media/picture/2023/06/15/042/DJI_20230615142233_0001_D_042.JPG")
                .is_file()
        );
        assert!(
            fixture
                .root()
                .join("media/picture/2023/06/15/DJI_20230615142233_0002_D_pano.JPG")
                .is_file()
        );
        Ok(())
    }

    #[test]
    fn malformed_file_is_isolated_from_the_batch() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::MediaKind)?;
        fixtures::stage(&fixture, "DJI_20230615142233_0001_D.MP4")?;
        fixtures::stage(&fixture, "IMG_1234.JPG")?;

        let summary = service(&fixture)?.process_files()?;

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.unrecognized, 1);
        assert_eq!(summary.failed, 0);
        assert!(fixture.staging().join("IMG_1234.JPG").is_file());
        assert!(!fixture.staging().join("DJI_20230615142233_0001_D.MP4").exists());
        Ok(())
    }

    #[test]
    fn second_run_is_a_no_op() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::MediaKind)?;
        fixtures::stage(&fixture, "DJI_20230615142233_0001_D.MP4")?;
        let service = service(&fixture)?;

        let first = service.process_files()?;
        assert_eq!(first.moved, 1);

        let second = service.process_files()?;
        assert_eq!(second, RunSummary::default());
        Ok(())
    }

    #[test]
    fn flat_layout_moves_videos_only() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::Flat)?;
        fixtures::stage(&fixture, "DJI_20230615142233_0001_D.MP4")?;
        fixtures::stage(&fixture, "DJI_20230615142233_0002_D_042.JPG")?;

        let summary = service(&fixture)?.process_files()?;

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.unsupported, 1);
        assert!(
            fixture
                .root()
                .join("2023/06/15/DJI_20230615142233_0001_D.MP4")
                .is_file()
        );
        assert!(
            fixture
                .staging()
                .join("DJI_20230615142233_0002_D_042.JPG")
                .is_file()
        );
        Ok(())
    }

    #[test]
    fn existing_destination_file_blocks_the_move() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::MediaKind)?;
        fixtures::stage(&fixture, "DJI_20230615142233_0001_D.MP4")?;

        let occupied = fixture.root().join("media/video/2023/06/15");
        fs::create_dir_all(&occupied)?;
        fs::write(occupied.join("DJI_20230615142233_0001_D.MP4"), b"already here")?;

        let summary = service(&fixture)?.process_files()?;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.moved, 0);
        assert!(fixture.staging().join("DJI_20230615142233_0001_D.MP4").is_file());
        let kept = fs::read(occupied.join("DJI_20230615142233_0001_D.MP4"))?;
        assert_eq!(kept, b"already here");
        Ok(())
    }

    #[test]
    fn sub_directories_are_ignored() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::MediaKind)?;
        fs::create_dir_all(fixture.staging().join("DJI_20230615142233_0001_D.MP4.dir"))?;

        let summary = service(&fixture)?.process_files()?;
        assert_eq!(summary, RunSummary::default());
        Ok(())
    }

    #[test]
    fn missing_staging_directory_fails_the_pass() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::MediaKind)?;
        fs::remove_dir_all(fixture.staging())?;

        let err = service(&fixture)?
            .process_files()
            .expect_err("missing staging should fail");
        assert!(matches!(
            err,
            OrganizeError::Io {
                operation: "staging.read_dir",
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn move_file_refuses_to_overwrite() -> TestResult<()> {
        let fixture = fixtures::library(LibraryLayout::MediaKind)?;
        let source = fixtures::stage(&fixture, "DJI_20230615142233_0001_D.MP4")?;
        let destination = fixture.root().join("taken");
        fs::write(&destination, b"occupied")?;

        let err = OrganizeService::move_file(&source, &destination)
            .expect_err("occupied destination should fail");
        assert!(matches!(err, OrganizeError::DestinationExists { .. }));
        assert!(source.is_file());
        Ok(())
    }
}
