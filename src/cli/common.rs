//! Shared plumbing for command implementations.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use super::CliConfig;
use crate::config::{InstanceConfig, WorkspaceConfig, find_config_with_optional};
use crate::pipeline::GeneratedRepository;
use crate::resolver::CoursierResolver;
use crate::utils::ProgressBar;

/// A loaded workspace plus the global flags.
#[derive(Debug)]
pub struct CommandContext {
    pub workspace: WorkspaceConfig,
    pub no_progress: bool,
    pub quiet: bool,
}

impl CommandContext {
    /// Find, load and validate `mavin.toml`.
    pub fn load(config: &CliConfig) -> Result<Self> {
        let path = find_config_with_optional(config.config_path.clone())?;
        let workspace = WorkspaceConfig::load(&path)?;
        Ok(Self {
            workspace,
            no_progress: config.no_progress,
            quiet: config.quiet,
        })
    }

    /// The instances selected by `--name`.
    pub fn instances(&self, name: Option<&str>) -> Result<Vec<&InstanceConfig>> {
        Ok(self.workspace.select(name)?)
    }

    /// A resolver for live passes.
    pub fn resolver(&self) -> Result<CoursierResolver> {
        Ok(CoursierResolver::new(
            self.workspace.settings.resolver.clone(),
            self.workspace.cache_dir()?,
            self.workspace.resolver_timeout(),
        ))
    }

    pub fn output_dir(&self) -> Result<PathBuf> {
        self.workspace.output_dir()
    }

    pub fn spinner(&self, prefix: &str) -> ProgressBar {
        let spinner =
            if self.no_progress || self.quiet { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
        spinner.set_prefix(prefix);
        spinner
    }

    /// Print a line unless `--quiet`.
    pub fn say(&self, line: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", line.as_ref());
        }
    }

    /// One-line summary of a generated repository.
    pub fn report(&self, generated: &GeneratedRepository, files: &[PathBuf]) {
        let graph = &generated.graph;
        self.say(format!(
            "{} {} ({} imports, {} exports, {} aliases)",
            "✓".green(),
            generated.name.bold(),
            graph.imports().count(),
            graph.exports().count(),
            graph.aliases().len()
        ));
        for file in files {
            self.say(format!("  {}", file.display()));
        }
        if generated.stale {
            self.say(format!(
                "  {} lockfile is out of date with mavin.toml",
                "⚠".yellow()
            ));
        }
    }
}
