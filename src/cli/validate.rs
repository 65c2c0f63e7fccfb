//! `mavin validate`

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;

use super::{CliConfig, CommandContext};
use crate::pipeline::{assemble, load_lockfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Only validate this instance
    #[arg(long)]
    pub name: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Result for one instance, as reported with `--format json`.
#[derive(Debug, Serialize)]
struct InstanceReport {
    name: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    targets: Option<usize>,
    stale: bool,
}

impl ValidateCommand {
    /// Load and compile every selected pinned instance in memory.
    ///
    /// Live instances are skipped. The first failure aborts the command.
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config)?;
        let mut reports = Vec::new();

        for instance in ctx.instances(self.name.as_deref())? {
            let Some(lock_file) = ctx.workspace.lock_file_path(instance)? else {
                reports.push(InstanceReport {
                    name: instance.name.clone(),
                    status: "skipped",
                    targets: None,
                    stale: false,
                });
                continue;
            };

            let (lockfile, stale) = load_lockfile(&lock_file, instance)?;
            let generated = assemble(instance.name.clone(), instance, lockfile, true, stale)?;
            reports.push(InstanceReport {
                name: generated.name,
                status: "valid",
                targets: Some(generated.graph.labels().len()),
                stale,
            });
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            OutputFormat::Text => {
                for report in &reports {
                    match report.targets {
                        Some(targets) => ctx.say(format!(
                            "{} {} ({} targets){}",
                            "✓".green(),
                            report.name.bold(),
                            targets,
                            if report.stale { ", lockfile out of date" } else { "" }
                        )),
                        None => ctx.say(format!(
                            "{} {} (no lock_file, skipped)",
                            "-".dimmed(),
                            report.name
                        )),
                    }
                }
            }
        }

        Ok(())
    }
}
