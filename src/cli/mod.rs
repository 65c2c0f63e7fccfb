//! Command-line interface for mavin.
//!
//! # Commands
//!
//! - `generate` - generate every (or one) instance's repository: pinned when
//!   the instance names a `lock_file`, live otherwise
//! - `pin` - run the resolver and write the instance's lockfile
//! - `validate` - check lockfiles of pinned instances without writing anything
//!
//! # Global options
//!
//! - `--config <path>` - use this `mavin.toml` instead of searching upwards
//! - `--verbose` / `--quiet` - log level (`RUST_LOG` takes precedence)
//! - `--no-progress` - hide spinners
//!
//! # Examples
//!
//! ```bash
//! mavin generate
//! mavin pin --name maven
//! mavin validate --format json
//! ```

mod common;
mod generate;
mod pin;
mod validate;

pub use common::CommandContext;
pub use generate::GenerateCommand;
pub use pin::PinCommand;
pub use validate::{OutputFormat, ValidateCommand};

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Settings derived from global flags, shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    pub no_progress: bool,
    /// Suppress the human-readable summary
    pub quiet: bool,
    pub config_path: Option<PathBuf>,
}

/// Maven dependency graph compiler.
#[derive(Parser, Debug)]
#[command(
    name = "mavin",
    about = "Turn resolved Maven dependency trees into reproducible build targets",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to mavin.toml (default: search from the current directory upwards)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable progress spinners
    #[arg(
        long,
        global = true,
        env = "MAVIN_NO_PROGRESS",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate build targets for configured instances
    Generate(GenerateCommand),
    /// Resolve an instance and write its lockfile
    Pin(PinCommand),
    /// Check pinned instances' lockfiles without writing anything
    Validate(ValidateCommand),
}

impl Cli {
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            no_progress: self.no_progress,
            quiet: self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over the level implied by `--verbose`/`--quiet`.
    pub fn init_logging(config: &CliConfig) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        Self::init_logging(&config);
        self.execute_with_config(config).await
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Generate(cmd) => cmd.execute(&config).await,
            Commands::Pin(cmd) => cmd.execute(&config).await,
            Commands::Validate(cmd) => cmd.execute(&config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_with_globals() {
        let cli = Cli::try_parse_from([
            "mavin",
            "generate",
            "--name",
            "maven",
            "--config",
            "ws/mavin.toml",
            "--verbose",
        ])
        .unwrap();

        let config = cli.build_config();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.config_path, Some(PathBuf::from("ws/mavin.toml")));
        match cli.command {
            Commands::Generate(cmd) => assert_eq!(cmd.name.as_deref(), Some("maven")),
            other => panic!("Expected generate, got {other:?}"),
        }
    }

    #[test]
    fn test_quiet_config() {
        let cli = Cli::try_parse_from(["mavin", "--quiet", "pin"]).unwrap();
        let config = cli.build_config();
        assert_eq!(config.log_level, "error");
        assert!(config.quiet);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["mavin", "-v", "-q", "generate"]).is_err());
    }

    #[test]
    fn test_validate_format() {
        let cli = Cli::try_parse_from(["mavin", "validate", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Validate(cmd) => assert_eq!(cmd.format, OutputFormat::Json),
            other => panic!("Expected validate, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
