//! Filename classification and destination computation.
//!
//! # Design
//! - Classification reads the filename only; file content is never opened.
//! - Patterns are case-sensitive and fully anchored; `DJI_..._D.MP4.part`
//!   must not classify as a video.
//! - Destination computation is a pure function of root, layout, and
//!   classification, so the path properties are testable without a
//!   filesystem.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

use droneshed_config::LibraryLayout;

use crate::error::{OrganizeError, OrganizeResult};

const VIDEO_PATTERN: &str = r"^DJI_(\d{8})\d{6}_\d{4}_D\.MP4$";
const PICTURE_PATTERN: &str = r"^DJI_(\d{8})\d{6}_\d{4}_D_.*\.JPG$";
const BURST_PATTERN: &str = r"^DJI_\d{8}\d{6}_\d{4}_D_(\d{3})\.JPG$";

/// Capture date embedded in a filename, split into path-ready segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureDate {
    /// Four-digit year.
    pub year: String,
    /// Two-digit month.
    pub month: String,
    /// Two-digit day.
    pub day: String,
}

impl CaptureDate {
    /// Split an 8-digit `YYYYMMDD` field.
    ///
    /// The digits are taken positionally with no calendar validation,
    /// matching the camera firmware contract this tool ingests.
    fn from_digits(digits: &str) -> Self {
        Self {
            year: digits[..4].to_string(),
            month: digits[4..6].to_string(),
            day: digits[6..8].to_string(),
        }
    }
}

/// Media classification derived from a staged filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Classification {
    /// A video clip (`_D.MP4`).
    Video {
        /// Capture date from the filename.
        date: CaptureDate,
    },
    /// A picture (`_D_*.JPG`), optionally part of a burst sequence.
    Picture {
        /// Capture date from the filename.
        date: CaptureDate,
        /// Three-digit burst index when the name matches the burst form.
        burst: Option<String>,
    },
    /// The filename matches no known pattern.
    Unrecognized,
}

/// Compiled filename patterns.
#[derive(Debug)]
pub struct Classifier {
    video: Regex,
    picture: Regex,
    burst: Regex,
}

impl Classifier {
    /// Compile the filename patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> OrganizeResult<Self> {
        Ok(Self {
            video: compile(VIDEO_PATTERN)?,
            picture: compile(PICTURE_PATTERN)?,
            burst: compile(BURST_PATTERN)?,
        })
    }

    /// Classify a filename.
    #[must_use]
    pub fn classify(&self, filename: &str) -> Classification {
        if let Some(captures) = self.video.captures(filename) {
            return Classification::Video {
                date: CaptureDate::from_digits(&captures[1]),
            };
        }

        if let Some(captures) = self.picture.captures(filename) {
            let burst = self
                .burst
                .captures(filename)
                .map(|refined| refined[1].to_string());
            return Classification::Picture {
                date: CaptureDate::from_digits(&captures[1]),
                burst,
            };
        }

        Classification::Unrecognized
    }
}

fn compile(pattern: &'static str) -> OrganizeResult<Regex> {
    Regex::new(pattern).map_err(|source| OrganizeError::pattern(pattern, source))
}

/// Destination directory for a classified file.
///
/// Returns `None` when the classification has no destination: unrecognized
/// names, and pictures under the [`LibraryLayout::Flat`] layout (the flat
/// tree carries videos only).
#[must_use]
pub fn destination_dir(
    root: &Path,
    layout: LibraryLayout,
    classification: &Classification,
) -> Option<PathBuf> {
    match (classification, layout) {
        (Classification::Video { date }, LibraryLayout::MediaKind) => Some(
            root.join("media")
                .join("video")
                .join(&date.year)
                .join(&date.month)
                .join(&date.day),
        ),
        (Classification::Video { date }, LibraryLayout::Flat) => {
            Some(root.join(&date.year).join(&date.month).join(&date.day))
        }
        (Classification::Picture { date, burst }, LibraryLayout::MediaKind) => {
            let dated = root
                .join("media")
                .join("picture")
                .join(&date.year)
                .join(&date.month)
                .join(&date.day);
            Some(burst.as_ref().map_or_else(|| dated.clone(), |id| dated.join(id)))
        }
        (Classification::Picture { .. }, LibraryLayout::Flat)
        | (Classification::Unrecognized, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    type TestResult<T> = Result<T>;

    fn date(year: &str, month: &str, day: &str) -> CaptureDate {
        CaptureDate {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
        }
    }

    #[test]
    fn classifies_video_with_embedded_date() -> TestResult<()> {
        let classifier = Classifier::new()?;
        assert_eq!(
            classifier.classify("DJI_20230615142233_0001_D.MP4"),
            Classification::Video {
                date: date("2023", "06", "15"),
            }
        );
        Ok(())
    }

    #[test]
    fn classifies_plain_and_burst_pictures() -> TestResult<()> {
        let classifier = Classifier::new()?;
        assert_eq!(
            classifier.classify("DJI_20230615142233_0001_D_pano.JPG"),
            Classification::Picture {
                date: date("2023", "06", "15"),
                burst: None,
            }
        );
        assert_eq!(
            classifier.classify("DJI_20230615142233_0001_D_042.JPG"),
            Classification::Picture {
                date: date("2023", "06", "15"),
                burst: Some("042".to_string()),
            }
        );
        Ok(())
    }

    #[test]
    fn four_digit_suffix_is_not_a_burst() -> TestResult<()> {
        let classifier = Classifier::new()?;
        assert_eq!(
            classifier.classify("DJI_20230615142233_0001_D_0042.JPG"),
            Classification::Picture {
                date: date("2023", "06", "15"),
                burst: None,
            }
        );
        Ok(())
    }

    #[test]
    fn rejects_near_misses() -> TestResult<()> {
        let classifier = Classifier::new()?;
        let misses = [
            "IMG_1234.JPG",
            "dji_20230615142233_0001_D.MP4",
            "DJI_20230615142233_0001_D.mp4",
            "DJI_20230615142233_0001_D.MP4.part",
            "DJI_2023061514223_0001_D.MP4",
            "DJI_20230615142233_001_D.MP4",
            "DJI_20230615142233_0001_E.MP4",
        ];
        for name in misses {
            assert_eq!(
                classifier.classify(name),
                Classification::Unrecognized,
                "{name} should not classify"
            );
        }
        Ok(())
    }

    #[test]
    fn video_destinations_follow_layout() {
        let video = Classification::Video {
            date: date("2023", "06", "15"),
        };
        assert_eq!(
            destination_dir(Path::new("/out"), LibraryLayout::MediaKind, &video),
            Some(PathBuf::from("/out/media/video/2023/06/15"))
        );
        assert_eq!(
            destination_dir(Path::new("/out"), LibraryLayout::Flat, &video),
            Some(PathBuf::from("/out/2023/06/15"))
        );
    }

    #[test]
    fn picture_destinations_include_burst_segment() {
        let plain = Classification::Picture {
            date: date("2023", "06", "15"),
            burst: None,
        };
        let burst = Classification::Picture {
            date: date("2023", "06", "15"),
            burst: Some("042".to_string()),
        };
        assert_eq!(
            destination_dir(Path::new("/out"), LibraryLayout::MediaKind, &plain),
            Some(PathBuf::from("/out/media/picture/2023/06/15"))
        );
        assert_eq!(
            destination_dir(Path::new("/out"), LibraryLayout::MediaKind, &burst),
            Some(PathBuf::from("/out/media/picture/2023/06/15/042"))
        );
    }

    #[test]
    fn flat_layout_has_no_picture_destination() {
        let picture = Classification::Picture {
            date: date("2023", "06", "15"),
            burst: Some("042".to_string()),
        };
        assert_eq!(
            destination_dir(Path::new("/out"), LibraryLayout::Flat, &picture),
            None
        );
        assert_eq!(
            destination_dir(Path::new("/out"), LibraryLayout::Flat, &Classification::Unrecognized),
            None
        );
    }
}
