//! `mavin generate`

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::{CliConfig, CommandContext};
use crate::constants::LIVE_SNAPSHOT_FILE_NAME;
use crate::pipeline::{self, ResolutionMode};

#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Only generate this instance
    #[arg(long)]
    pub name: Option<String>,
}

impl GenerateCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config)?;
        let instances = ctx.instances(self.name.as_deref())?;
        let output_dir = ctx.output_dir()?;
        let resolver = ctx.resolver()?;
        let cache_dir = ctx.workspace.cache_dir()?;

        for instance in instances {
            let mode = ResolutionMode::for_instance(&ctx.workspace, instance)?;
            let spinner = ctx.spinner(&instance.name);
            spinner.set_message(if mode.is_pinned() {
                "Generating from lockfile"
            } else {
                "Resolving artifacts"
            });

            let result = pipeline::run(&mode, instance, &resolver, &cache_dir).await;
            spinner.finish_and_clear();
            let generated = result?;

            let mut files = generated.write(&output_dir)?;

            if !mode.is_pinned() {
                let snapshot = output_dir.join(&generated.name).join(LIVE_SNAPSHOT_FILE_NAME);
                generated.lockfile.save(&snapshot).with_context(|| {
                    format!("Failed to write the lockfile snapshot for '{}'", instance.name)
                })?;
                info!("Wrote lockfile snapshot {}", snapshot.display());
                files.push(snapshot);
            }

            ctx.report(&generated, &files);
        }

        Ok(())
    }
}
