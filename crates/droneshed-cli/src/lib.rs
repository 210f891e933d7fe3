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

//! Command-line entrypoint for the droneshed toolkit.
//!
//! Layout: `cli.rs` (argument grammar), `bootstrap.rs` (configuration,
//! logging, and pass dispatch), `error.rs` (error types).

use std::process::ExitCode;

use clap::Parser;

/// Configuration, logging, and pass dispatch.
pub mod bootstrap;
/// Argument grammar.
pub mod cli;
/// Application error types.
pub mod error;

pub use cli::{Cli, Command};
pub use error::{AppError, AppResult};

/// Parse the arguments, run the requested pass, and map the outcome to a
/// process exit code.
#[must_use]
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match bootstrap::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Post-init failures also reach the log sinks; this line covers
            // the window before the subscriber is installed.
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
