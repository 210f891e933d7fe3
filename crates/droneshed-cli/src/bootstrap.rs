//! Process wiring: configuration, logging, and pass dispatch.

use tracing::{error, info};

use droneshed_config::{AppConfig, LibraryConfig, loader};
use droneshed_organize::OrganizeService;
use droneshed_rotate::RotateService;
use droneshed_telemetry::{LoggingConfig, Metrics, init_logging};

use crate::cli::{Cli, Command};
use crate::error::{AppError, AppResult};

pub(crate) fn run(cli: &Cli) -> AppResult<()> {
    let config = loader::load(cli.config.as_deref())
        .map_err(|source| AppError::config("config.load", source))?;

    init_logging(&logging_config(&config))
        .map_err(|source| AppError::telemetry("logging.init", source))?;
    let metrics = Metrics::new().map_err(|source| AppError::telemetry("metrics.new", source))?;

    match cli.command {
        Command::Organize => run_organize(&config, &metrics),
        Command::Rotate => run_rotate(&config, &metrics),
    }
}

fn logging_config(config: &AppConfig) -> LoggingConfig {
    LoggingConfig {
        file: config.logging.file.clone(),
        level: config.logging.level.clone(),
        mirror_stderr: config.logging.mirror_stderr,
        mirror_stdout_if_interactive: config.logging.mirror_stdout_if_interactive,
    }
}

fn run_organize(config: &AppConfig, metrics: &Metrics) -> AppResult<()> {
    check_library(&config.library)?;

    let service = OrganizeService::new(config.library.clone(), metrics.clone())
        .map_err(|source| AppError::organize("organize.new", source))?;
    let summary = match service.process_files() {
        Ok(summary) => summary,
        Err(source) => {
            error!(error = ?source, "organize pass aborted");
            return Err(AppError::organize("organize.run", source));
        }
    };

    info!(
        moved = summary.moved,
        unrecognized = summary.unrecognized,
        unsupported = summary.unsupported,
        failed = summary.failed,
        "organize pass complete"
    );
    log_counters(metrics);
    Ok(())
}

fn check_library(library: &LibraryConfig) -> AppResult<()> {
    if !library.output_root.is_dir() {
        error!(path = %library.output_root.display(), "media library root not found");
        return Err(AppError::precondition(
            &library.output_root,
            "output_root_missing",
        ));
    }
    let staging = library.staging_path();
    if !staging.is_dir() {
        error!(path = %staging.display(), "staging directory not found");
        return Err(AppError::precondition(&staging, "staging_missing"));
    }
    Ok(())
}

fn run_rotate(config: &AppConfig, metrics: &Metrics) -> AppResult<()> {
    let Some(rotate) = config.rotate.clone() else {
        error!("rotate section missing from configuration");
        return Err(AppError::RotateUnconfigured);
    };
    if !rotate.conf_dir.is_dir() {
        error!(path = %rotate.conf_dir.display(), "rotate configuration directory not found");
        return Err(AppError::precondition(&rotate.conf_dir, "conf_dir_missing"));
    }

    let summary = match RotateService::new(rotate, metrics.clone()).run() {
        Ok(summary) => summary,
        Err(source) => {
            error!(error = ?source, "rotate pass aborted");
            return Err(AppError::rotate("rotate.run", source));
        }
    };

    info!(
        rotated = summary.rotated,
        failed = summary.failed,
        "rotate pass complete"
    );
    log_counters(metrics);
    Ok(())
}

fn log_counters(metrics: &Metrics) {
    for line in metrics.summary() {
        info!(counter = %line, "run counter");
    }
}
