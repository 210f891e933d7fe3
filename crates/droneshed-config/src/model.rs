//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers; IO lives in `loader.rs`, checks in `validate.rs`.
//! - Every field except `library.output_root` has a serde default, so an
//!   almost-empty config file is a valid one.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;

/// Root configuration for the droneshed toolkit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Media library layout and staging location.
    pub library: LibraryConfig,
    /// Logging sink settings.
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Optional logrotate wrapper settings; `rotate` is unavailable without it.
    #[serde(default)]
    pub rotate: Option<RotateConfig>,
}

/// Media library settings for the organize pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Absolute root of the media library.
    pub output_root: PathBuf,
    /// Name of the staging directory directly under `output_root`.
    #[serde(default = "defaults::staging_dir")]
    pub staging_dir: String,
    /// Destination tree layout.
    #[serde(default)]
    pub layout: LibraryLayout,
}

impl LibraryConfig {
    /// Full path of the staging directory scanned by the organize pass.
    #[must_use]
    pub fn staging_path(&self) -> PathBuf {
        self.output_root.join(&self.staging_dir)
    }
}

/// Destination tree layout variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LibraryLayout {
    /// `output_root/media/<video|picture>/YYYY/MM/DD[/NNN]`.
    #[default]
    MediaKind,
    /// `output_root/YYYY/MM/DD`, videos only.
    Flat,
}

impl LibraryLayout {
    /// Render the layout as its lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MediaKind => "media_kind",
            Self::Flat => "flat",
        }
    }
}

impl FromStr for LibraryLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "media_kind" => Ok(Self::MediaKind),
            "flat" => Ok(Self::Flat),
            other => Err(ConfigError::invalid(
                "library",
                "layout",
                Some(other.to_string()),
                "unknown_layout",
            )),
        }
    }
}

/// Logging sink settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Append-only log file path.
    #[serde(default = "defaults::log_file")]
    pub file: PathBuf,
    /// Minimum level written to the log file.
    #[serde(default = "defaults::log_level")]
    pub level: String,
    /// Mirror error lines to stderr.
    #[serde(default = "defaults::enabled")]
    pub mirror_stderr: bool,
    /// Mirror non-error lines to stdout when attached to a terminal.
    #[serde(default = "defaults::enabled")]
    pub mirror_stdout_if_interactive: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: defaults::log_file(),
            level: defaults::log_level(),
            mirror_stderr: defaults::enabled(),
            mirror_stdout_if_interactive: defaults::enabled(),
        }
    }
}

/// Settings for the logrotate permission wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotateConfig {
    /// Directory scanned for `.conf` files.
    pub conf_dir: PathBuf,
    /// External command invoked per configuration file.
    #[serde(default = "defaults::rotate_command")]
    pub command: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    type TestResult<T> = Result<T>;

    #[test]
    fn minimal_config_fills_defaults() -> TestResult<()> {
        let config: AppConfig =
            serde_json::from_str(r#"{"library": {"output_root": "/srv/footage"}}"#)?;

        assert_eq!(config.library.staging_dir, "To Process");
        assert_eq!(config.library.layout, LibraryLayout::MediaKind);
        assert_eq!(
            config.library.staging_path(),
            PathBuf::from("/srv/footage/To Process")
        );
        assert_eq!(config.logging.file, PathBuf::from("droneshed.log"));
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.mirror_stderr);
        assert!(config.logging.mirror_stdout_if_interactive);
        assert!(config.rotate.is_none());
        Ok(())
    }

    #[test]
    fn layout_parses_known_variants() -> TestResult<()> {
        assert_eq!("media_kind".parse::<LibraryLayout>()?, LibraryLayout::MediaKind);
        assert_eq!("flat".parse::<LibraryLayout>()?, LibraryLayout::Flat);
        assert!("nested".parse::<LibraryLayout>().is_err());
        Ok(())
    }

    #[test]
    fn rotate_section_defaults_command() -> TestResult<()> {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "library": {"output_root": "/srv/footage", "layout": "flat"},
                "rotate": {"conf_dir": "/etc/droneshed/rotate.d"}
            }"#,
        )?;

        let rotate = config.rotate.expect("rotate section should be present");
        assert_eq!(rotate.command, "logrotate");
        assert_eq!(config.library.layout, LibraryLayout::Flat);
        Ok(())
    }
}
