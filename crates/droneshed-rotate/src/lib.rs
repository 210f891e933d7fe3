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

//! Logrotate wrapper that tightens configuration file permissions for the
//! duration of the external invocation and restores them afterwards.
//!
//! Layout: `guard.rs` (scoped ownership/mode restoration), `service.rs`
//! (the per-file pass), `error.rs` (error types).

/// Rotate error types.
pub mod error;
/// Scoped permission tightening.
#[cfg(unix)]
pub mod guard;
/// The per-file rotate pass.
pub mod service;

pub use error::{RotateError, RotateResult};
#[cfg(unix)]
pub use guard::{FileOwnership, PermissionGuard};
pub use service::{RotateService, RotateSummary};
