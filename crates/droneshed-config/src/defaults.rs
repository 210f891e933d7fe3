//! Serde default values shared by the configuration model.

use std::path::PathBuf;

pub(crate) fn staging_dir() -> String {
    "To Process".to_string()
}

pub(crate) fn log_file() -> PathBuf {
    PathBuf::from("droneshed.log")
}

pub(crate) fn log_level() -> String {
    "info".to_string()
}

pub(crate) const fn enabled() -> bool {
    true
}

pub(crate) fn rotate_command() -> String {
    "logrotate".to_string()
}
