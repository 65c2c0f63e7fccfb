//! Workspace configuration (`mavin.toml`).
//!
//! The configuration file is found by walking up from the current directory,
//! or given explicitly with `--config`. It carries global `[settings]` and one
//! `[[instance]]` table per named resolution instance:
//!
//! ```toml
//! [settings]
//! resolver = "coursier"
//! cache_dir = "$HOME/.cache/coursier/v1"
//! output_dir = "third_party/mavin"
//!
//! [[instance]]
//! name = "maven"
//! artifacts = ["com.google.guava:guava:31.1-jre"]
//! repositories = ["https://repo1.maven.org/maven2"]
//! lock_file = "maven_install.json"
//! ```
//!
//! Relative paths resolve against the directory holding `mavin.toml`, after
//! `~` and `$VAR` expansion. The whole file is validated at load, so
//! configuration errors surface before any resolver or lockfile I/O.

pub mod instance;

pub use instance::{ArtifactSpec, DetailedArtifact, InstanceConfig};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_OUTPUT_DIR, DEFAULT_RESOLVER, DEFAULT_RESOLVER_TIMEOUT,
};
use crate::core::MavinError;
use crate::utils::expand_path;

/// Maximum edit distance for "did you mean" suggestions.
const SUGGESTION_DISTANCE: usize = 3;

/// Global `[settings]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Resolver program name or path
    #[serde(default = "default_resolver")]
    pub resolver: String,

    /// Resolver cache root; defaults to the platform cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_timeout_secs")]
    pub resolver_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolver: default_resolver(),
            cache_dir: None,
            output_dir: default_output_dir(),
            resolver_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_resolver() -> String {
    DEFAULT_RESOLVER.to_string()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_RESOLVER_TIMEOUT.as_secs()
}

/// The parsed `mavin.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default, rename = "instance")]
    pub instances: Vec<InstanceConfig>,

    /// Directory containing the configuration file
    #[serde(skip)]
    pub config_dir: PathBuf,
}

impl WorkspaceConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let mut config = Self::parse(&content).with_context(|| {
            format!(
                "Invalid configuration file: {}\n\n\
                Common TOML syntax errors:\n\
                - Missing quotes around strings\n\
                - Unmatched brackets [ ] or braces {{ }}\n\
                - [[instance]] tables written as [instance]",
                path.display()
            )
        })?;

        config.config_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        config.validate()?;
        debug!("Loaded {} instance(s) from {}", config.instances.len(), path.display());
        Ok(config)
    }

    /// Parse configuration text without validating it.
    pub fn parse(content: &str) -> Result<Self, MavinError> {
        toml::from_str(content).map_err(|e| MavinError::ConfigParseError {
            file: CONFIG_FILE_NAME.to_string(),
            reason: e.to_string(),
        })
    }

    /// Validate every instance and the uniqueness of instance names.
    pub fn validate(&self) -> Result<(), MavinError> {
        if self.instances.is_empty() {
            return Err(MavinError::ConfigError {
                message: "No [[instance]] tables defined. Add at least one named instance".into(),
            });
        }

        let mut names = HashSet::new();
        for instance in &self.instances {
            instance.validate()?;
            if !names.insert(instance.name.as_str()) {
                return Err(MavinError::ConfigError {
                    message: format!("Instance name '{}' is defined more than once", instance.name),
                });
            }
        }

        if self.settings.resolver.trim().is_empty() {
            return Err(MavinError::ConfigError {
                message: "settings.resolver must not be empty".into(),
            });
        }

        if self.settings.resolver_timeout_secs == 0 {
            return Err(MavinError::ConfigError {
                message: "settings.resolver_timeout_secs must be greater than zero".into(),
            });
        }

        Ok(())
    }

    /// Look up one instance by name, suggesting close matches on a miss.
    pub fn instance(&self, name: &str) -> Result<&InstanceConfig, MavinError> {
        self.instances.iter().find(|instance| instance.name == name).ok_or_else(|| {
            let suggestions = self.similar_names(name);
            let message = if suggestions.is_empty() {
                format!("No instance named '{name}' in {CONFIG_FILE_NAME}")
            } else {
                format!(
                    "No instance named '{name}' in {CONFIG_FILE_NAME}. Did you mean: {}?",
                    suggestions.join(", ")
                )
            };
            MavinError::ConfigError {
                message,
            }
        })
    }

    /// The named instance, or every instance when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<&InstanceConfig>, MavinError> {
        match name {
            Some(name) => Ok(vec![self.instance(name)?]),
            None => Ok(self.instances.iter().collect()),
        }
    }

    fn similar_names(&self, name: &str) -> Vec<&str> {
        let mut candidates: Vec<(usize, &str)> = self
            .instances
            .iter()
            .map(|instance| (strsim::levenshtein(name, &instance.name), instance.name.as_str()))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .collect();
        candidates.sort();
        candidates.into_iter().map(|(_, name)| name).collect()
    }

    /// Root directory for generated repositories.
    pub fn output_dir(&self) -> Result<PathBuf> {
        expand_path(&self.settings.output_dir, &self.config_dir)
    }

    /// Root of the resolver's download cache.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.settings.cache_dir {
            Some(raw) => expand_path(raw, &self.config_dir),
            None => dirs::cache_dir()
                .map(|cache| cache.join("coursier").join("v1"))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Cannot determine the platform cache directory. Set settings.cache_dir in {CONFIG_FILE_NAME}"
                    )
                }),
        }
    }

    /// Absolute lockfile path of `instance`, if it has one.
    pub fn lock_file_path(&self, instance: &InstanceConfig) -> Result<Option<PathBuf>> {
        instance.lock_file.as_deref().map(|raw| expand_path(raw, &self.config_dir)).transpose()
    }

    #[must_use]
    pub const fn resolver_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.resolver_timeout_secs)
    }
}

/// Find `mavin.toml` by walking up from the current directory.
pub fn find_config() -> Result<PathBuf> {
    let current = std::env::current_dir()
        .context("Cannot determine current working directory")?;
    find_config_from(current)
}

/// Use `explicit` when given, otherwise search upwards.
pub fn find_config_with_optional(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) if path.exists() => Ok(path),
        Some(path) => Err(MavinError::ConfigError {
            message: format!("Configuration file {} does not exist", path.display()),
        }
        .into()),
        None => find_config(),
    }
}

/// Walk from `start` towards the filesystem root looking for `mavin.toml`.
pub fn find_config_from(start: PathBuf) -> Result<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(MavinError::ConfigNotFound.into());
        }
    }
}
