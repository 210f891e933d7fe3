//! Configuration file loading.
//!
//! # Design
//! - One JSON file, resolved flag > environment > default path.
//! - Parse, then validate; callers never see an unvalidated `AppConfig`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::model::AppConfig;
use crate::validate::validate;

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "DRONESHED_CONFIG";

/// Configuration file path used when neither flag nor environment sets one.
pub const DEFAULT_CONFIG_PATH: &str = "droneshed.json";

/// Load and validate the configuration.
///
/// `explicit` is the `--config` flag when given; otherwise the
/// [`CONFIG_ENV`] variable, then [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns an error when the file cannot be read, does not parse as the
/// configuration model, or fails validation.
pub fn load(explicit: Option<&Path>) -> ConfigResult<AppConfig> {
    let path = resolve_path(explicit);
    load_file(&path)
}

fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || {
            env::var_os(CONFIG_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
        },
        Path::to_path_buf,
    )
}

fn load_file(path: &Path) -> ConfigResult<AppConfig> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::io("config.read", path, source))?;
    let config: AppConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::parse(path, source))?;
    validate(&config)?;
    Ok(config)
}
