//! mavin CLI entry point
//!
//! Parses arguments, runs the selected command, and turns failures into a
//! readable error with a suggested fix:
//! - `generate` - write build targets for configured instances
//! - `pin` - resolve an instance and write its lockfile
//! - `validate` - check pinned instances' lockfiles

use anyhow::Result;
use clap::Parser;
use mavin_cli::cli;
use mavin_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
