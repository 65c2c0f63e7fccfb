//! `mavin pin`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{CliConfig, CommandContext};
use crate::config::InstanceConfig;
use crate::core::MavinError;
use crate::pipeline::{self, ResolutionMode};

#[derive(Args, Debug)]
pub struct PinCommand {
    /// Only pin this instance
    #[arg(long)]
    pub name: Option<String>,
}

impl PinCommand {
    /// Resolve each selected instance live, write its lockfile, then
    /// regenerate its pinned repository from that lockfile.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config)?;
        let instances = ctx.instances(self.name.as_deref())?;

        // Every selected instance must name a lockfile before anything runs
        let mut targets = Vec::with_capacity(instances.len());
        for instance in instances {
            let lock_file = ctx.workspace.lock_file_path(instance)?.ok_or_else(|| missing_lock_file(instance))?;
            targets.push((instance, lock_file));
        }

        let output_dir = ctx.output_dir()?;
        let resolver = ctx.resolver()?;
        let cache_dir = ctx.workspace.cache_dir()?;

        for (instance, lock_file) in targets {
            let spinner = ctx.spinner(&instance.name);
            spinner.set_message("Resolving artifacts");
            let result = pipeline::run(&ResolutionMode::Live, instance, &resolver, &cache_dir).await;
            spinner.finish_and_clear();
            let live = result?;

            live.lockfile.save(&lock_file)?;
            ctx.say(format!(
                "{} Pinned {} artifacts to {}",
                "✓".green(),
                live.lockfile.dependency_tree.len(),
                lock_file.display()
            ));

            let pinned = pipeline::run(
                &ResolutionMode::Pinned {
                    lock_file,
                },
                instance,
                &resolver,
                &cache_dir,
            )
            .await?;
            let files = pinned.write(&output_dir)?;
            ctx.report(&pinned, &files);
        }

        Ok(())
    }
}

fn missing_lock_file(instance: &InstanceConfig) -> MavinError {
    MavinError::ConfigError {
        message: format!(
            "Instance '{}' has no lock_file. Add lock_file = \"{}_install.json\" to it in mavin.toml before pinning",
            instance.name, instance.name
        ),
    }
}
