//! Field validation applied after a configuration file parses.
//!
//! # Design
//! - Fail fast with `ConfigError::InvalidField` carrying section/field/reason.
//! - Validation is structural only; existence of the directories is checked
//!   by the caller immediately before a pass runs.

use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::model::AppConfig;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Validate a parsed configuration.
///
/// # Errors
///
/// Returns `ConfigError::InvalidField` for the first field that fails.
pub fn validate(config: &AppConfig) -> ConfigResult<()> {
    validate_output_root(&config.library.output_root)?;
    validate_staging_dir(&config.library.staging_dir)?;
    validate_log_level(&config.logging.level)?;

    if let Some(rotate) = &config.rotate {
        if rotate.conf_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("rotate", "conf_dir", None, "empty"));
        }
        if rotate.command.trim().is_empty() {
            return Err(ConfigError::invalid(
                "rotate",
                "command",
                Some(rotate.command.clone()),
                "empty",
            ));
        }
    }

    Ok(())
}

fn validate_output_root(root: &Path) -> ConfigResult<()> {
    if root.as_os_str().is_empty() {
        return Err(ConfigError::invalid("library", "output_root", None, "empty"));
    }
    if !root.is_absolute() {
        return Err(ConfigError::invalid(
            "library",
            "output_root",
            Some(root.to_string_lossy().into_owned()),
            "not_absolute",
        ));
    }
    Ok(())
}

fn validate_staging_dir(name: &str) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::invalid(
            "library",
            "staging_dir",
            Some(name.to_string()),
            "empty",
        ));
    }
    // One path component directly under the root; no traversal.
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ConfigError::invalid(
            "library",
            "staging_dir",
            Some(name.to_string()),
            "not_a_single_component",
        ));
    }
    Ok(())
}

fn validate_log_level(level: &str) -> ConfigResult<()> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        return Ok(());
    }
    Err(ConfigError::invalid(
        "logging",
        "level",
        Some(level.to_string()),
        "unknown_level",
    ))
}
