//! Builder for resolver subprocess invocations.
//!
//! Every invocation goes through [`ResolverCommand`] so timeouts, logging and
//! error mapping are handled the same way. Output is always captured; a
//! non-zero exit becomes [`MavinError::ResolverInvocationFailure`] carrying
//! the resolver's stderr verbatim.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::{DEFAULT_RESOLVER_TIMEOUT, SUPPORTED_PACKAGING_TYPES};
use crate::core::MavinError;

use super::ResolverRequest;

/// Artifact type that asks the resolver for source archives.
const SOURCES_ARTIFACT_TYPE: &str = "src";

/// Captured output of a successful invocation.
#[derive(Debug, Clone)]
pub struct ResolverOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Fluent builder for one resolver process.
///
/// ```rust,no_run
/// use mavin_cli::resolver::ResolverCommand;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = ResolverCommand::new("coursier")
///     .args(["fetch", "junit:junit:4.13.2"])
///     .timeout(Duration::from_secs(60))
///     .with_context("maven")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ResolverCommand {
    program: PathBuf,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout_duration: Duration,
    context: Option<String>,
}

impl ResolverCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            timeout_duration: DEFAULT_RESOLVER_TIMEOUT,
            context: None,
        }
    }

    /// The `fetch` invocation for `request`, writing its JSON report to `output_file`.
    pub fn fetch(program: impl Into<PathBuf>, request: &ResolverRequest, output_file: &Path) -> Self {
        let mut command = Self::new(program).arg("fetch").with_context(&request.repository);

        for artifact in &request.artifacts {
            command = command.arg(artifact.to_resolver_arg());
        }

        let mut artifact_types: Vec<&str> = SUPPORTED_PACKAGING_TYPES.to_vec();
        artifact_types.push(SOURCES_ARTIFACT_TYPE);
        command = command
            .arg("--artifact-type")
            .arg(artifact_types.join(","))
            .arg("--json-output-file")
            .arg(output_file.display().to_string());

        for repository in &request.repositories {
            command = command.arg("-r").arg(repository);
        }

        for exclusion in &request.excluded_artifacts {
            command = command.arg("--exclude").arg(exclusion);
        }

        let checksums =
            if request.fail_on_missing_checksum { "SHA-1,MD5" } else { "SHA-1,MD5,None" };
        command = command.arg("--checksum").arg(checksums);

        if request.fetch_sources {
            command = command.arg("--sources").arg("--default=true");
        }

        command
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Repository name used in logs and errors.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Run the process to completion.
    pub async fn execute(self) -> Result<ResolverOutput> {
        let context = self.context.clone().unwrap_or_else(|| "resolver".to_string());
        let program = self.program.display().to_string();
        let command_line = format!("{} {}", program, self.args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(target: "resolver", "({}) Executing command: {}", context, command_line);

        let output = match timeout(self.timeout_duration, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(MavinError::ResolverNotFound {
                    program,
                }
                .into());
            }
            Ok(Err(e)) => {
                return Err(e).with_context(|| format!("Failed to execute {command_line}"));
            }
            Err(_) => {
                tracing::warn!(
                    target: "resolver",
                    "({}) Command timed out after {} seconds: {}",
                    context,
                    self.timeout_duration.as_secs(),
                    command_line
                );
                return Err(MavinError::ResolverInvocationFailure {
                    repository: context,
                    status: format!("timed out after {}s", self.timeout_duration.as_secs()),
                    stderr: format!(
                        "The resolver did not finish within {} seconds. Raise \
                         settings.resolver_timeout_secs for large trees on a cold cache",
                        self.timeout_duration.as_secs()
                    ),
                }
                .into());
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::debug!(
                target: "resolver",
                "({}) Command failed with exit code: {:?}",
                context,
                output.status.code()
            );
            let status = output
                .status
                .code()
                .map_or_else(|| "terminated by signal".to_string(), |code| code.to_string());
            let diagnostic = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(MavinError::ResolverInvocationFailure {
                repository: context,
                status,
                stderr: diagnostic.trim_end().to_string(),
            }
            .into());
        }

        tracing::trace!(target: "resolver", "({}) Command completed", context);
        Ok(ResolverOutput {
            stdout,
            stderr,
        })
    }
}
