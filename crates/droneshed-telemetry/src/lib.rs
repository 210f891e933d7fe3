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
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Logging and run counters shared across the droneshed workspace.
//!
//! Layout: `init.rs` (sink configuration and subscriber install),
//! `format.rs` (the log line format), `metrics.rs` (run counters),
//! `error.rs` (error types).

/// Telemetry error types.
pub mod error;
/// Log line formatting.
pub mod format;
/// Logging sink configuration and installation.
pub mod init;
/// Run counters.
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use format::LineFormat;
pub use init::{DEFAULT_LOG_LEVEL, LoggingConfig, init_logging};
pub use metrics::Metrics;
