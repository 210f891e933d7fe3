//! Run counters.
//!
//! # Design
//! - A private `prometheus` registry per process; counters are gathered and
//!   logged at the end of a pass rather than served (no network surface).

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use crate::error::{TelemetryError, TelemetryResult};

/// Counter registry shared by the organize and rotate passes.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    files: IntCounterVec,
    dirs_created: IntCounter,
    rotations: IntCounterVec,
}

impl Metrics {
    /// Construct and register the droneshed counters.
    ///
    /// # Errors
    ///
    /// Returns an error if counter registration fails.
    pub fn new() -> TelemetryResult<Self> {
        let registry = Registry::new();

        let files = IntCounterVec::new(
            Opts::new(
                "droneshed_files_total",
                "Staged files handled by the organize pass, by outcome.",
            ),
            &["outcome"],
        )
        .map_err(|source| TelemetryError::metrics("droneshed_files_total", source))?;
        registry
            .register(Box::new(files.clone()))
            .map_err(|source| TelemetryError::metrics("droneshed_files_total", source))?;

        let dirs_created = IntCounter::new(
            "droneshed_dirs_created_total",
            "Destination directories created by the organize pass.",
        )
        .map_err(|source| TelemetryError::metrics("droneshed_dirs_created_total", source))?;
        registry
            .register(Box::new(dirs_created.clone()))
            .map_err(|source| TelemetryError::metrics("droneshed_dirs_created_total", source))?;

        let rotations = IntCounterVec::new(
            Opts::new(
                "droneshed_rotate_runs_total",
                "Logrotate invocations, by outcome.",
            ),
            &["outcome"],
        )
        .map_err(|source| TelemetryError::metrics("droneshed_rotate_runs_total", source))?;
        registry
            .register(Box::new(rotations.clone()))
            .map_err(|source| TelemetryError::metrics("droneshed_rotate_runs_total", source))?;

        Ok(Self {
            registry,
            files,
            dirs_created,
            rotations,
        })
    }

    /// Record a per-file outcome of the organize pass.
    pub fn inc_file(&self, outcome: &str) {
        self.files.with_label_values(&[outcome]).inc();
    }

    /// Record a created destination directory.
    pub fn inc_dir_created(&self) {
        self.dirs_created.inc();
    }

    /// Record a per-file outcome of the rotate pass.
    pub fn inc_rotation(&self, outcome: &str) {
        self.rotations.with_label_values(&[outcome]).inc();
    }

    /// Current count for an organize outcome label.
    #[must_use]
    pub fn file_total(&self, outcome: &str) -> u64 {
        self.files.with_label_values(&[outcome]).get()
    }

    /// Render all non-zero counters as `name{label}=value` lines for logging.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for family in self.registry.gather() {
            for metric in family.get_metric() {
                let value = metric.get_counter().value();
                if value == 0.0 {
                    continue;
                }
                let labels: Vec<String> = metric
                    .get_label()
                    .iter()
                    .map(|pair| format!("{}={}", pair.name(), pair.value()))
                    .collect();
                if labels.is_empty() {
                    lines.push(format!("{}={value}", family.name()));
                } else {
                    lines.push(format!("{}{{{}}}={value}", family.name(), labels.join(",")));
                }
            }
        }
        lines.sort();
        lines
    }
}
