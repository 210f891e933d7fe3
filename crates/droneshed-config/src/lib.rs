#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::redundant_pub_crate
)]

//! Typed configuration for the droneshed toolkit.
//!
//! Layout: `model.rs` (data carriers), `loader.rs` (file IO), `validate.rs`
//! (field checks), `defaults.rs` (serde defaults), `error.rs` (error types).

mod defaults;
/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration data model.
pub mod model;
/// Configuration validation.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_ENV, DEFAULT_CONFIG_PATH, load};
pub use model::{AppConfig, LibraryConfig, LibraryLayout, LoggingSettings, RotateConfig};
