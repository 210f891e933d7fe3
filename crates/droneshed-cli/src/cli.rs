//! Argument grammar for the `droneshed` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use droneshed_config::CONFIG_ENV;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(
    name = "droneshed",
    about = "Classifies drone footage into a dated library and wraps log rotation",
    version
)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,
    /// Pass to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available passes.
#[derive(Debug, Clone, Copy, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Classify and relocate files from the staging directory.
    Organize,
    /// Run the external rotation command with tightened file permissions.
    Rotate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_organize_with_config_flag() {
        let cli = Cli::try_parse_from(["droneshed", "--config", "/etc/droneshed.json", "organize"])
            .expect("arguments should parse");
        assert_eq!(cli.config, Some(PathBuf::from("/etc/droneshed.json")));
        assert_eq!(cli.command, Command::Organize);
    }

    #[test]
    fn parses_rotate_without_flags() {
        let cli = Cli::try_parse_from(["droneshed", "rotate"]).expect("arguments should parse");
        assert_eq!(cli.config, None);
        assert_eq!(cli.command, Command::Rotate);
    }

    #[test]
    fn rejects_missing_subcommand() {
        assert!(Cli::try_parse_from(["droneshed"]).is_err());
    }

    #[test]
    fn config_flag_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["droneshed", "organize", "--config", "alt.json"])
            .expect("global flag should parse in either position");
        assert_eq!(cli.config, Some(PathBuf::from("alt.json")));
    }
}
