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

//! File classification and relocation for drone/action-camera footage.
//!
//! Layout: `classify.rs` (filename grammar and destination computation),
//! `service.rs` (the staging-directory pass), `error.rs` (error types).

/// Filename classification and destination computation.
pub mod classify;
/// Organize error types.
pub mod error;
/// The staging-directory pass.
pub mod service;

pub use classify::{CaptureDate, Classification, Classifier, destination_dir};
pub use error::{OrganizeError, OrganizeResult};
pub use service::{OrganizeService, RunSummary};
