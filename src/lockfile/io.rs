//! Lockfile loading and saving.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::{DEPENDENCY_TREE_KEY, Lockfile};
use crate::core::MavinError;
use crate::utils::atomic_write;

impl Lockfile {
    /// Load the lockfile of `repository` from `path`.
    ///
    /// An unreadable or unparsable file is [`MavinError::LockfileCorrupt`];
    /// valid JSON without a `dependency_tree` field is
    /// [`MavinError::LockfileSchemaInvalid`]. Both carry the remediation steps.
    pub fn load(path: &Path, repository: &str) -> Result<Self> {
        let file = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| MavinError::LockfileCorrupt {
            file: file.clone(),
            repository: repository.to_string(),
            reason: e.to_string(),
        })?;

        let lockfile = Self::parse(&content, &file, repository)?;
        debug!(
            "Loaded lockfile {} with {} artifacts",
            file,
            lockfile.dependency_tree.len()
        );
        Ok(lockfile)
    }

    /// Parse lockfile text. `file` and `repository` only feed diagnostics.
    pub fn parse(content: &str, file: &str, repository: &str) -> Result<Self, MavinError> {
        let corrupt = |reason: String| MavinError::LockfileCorrupt {
            file: file.to_string(),
            repository: repository.to_string(),
            reason,
        };

        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| corrupt(e.to_string()))?;

        let has_tree = value.as_object().is_some_and(|object| object.contains_key(DEPENDENCY_TREE_KEY));
        if !has_tree {
            return Err(MavinError::LockfileSchemaInvalid {
                file: file.to_string(),
                repository: repository.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))
    }

    /// Pretty JSON with a trailing newline, stable across runs.
    pub fn to_json_string(&self) -> Result<String> {
        let mut content =
            serde_json::to_string_pretty(self).context("Failed to serialize lockfile")?;
        content.push('\n');
        Ok(content)
    }

    /// Write the lockfile atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json_string()?;
        atomic_write(path, content.as_bytes()).with_context(|| {
            format!(
                "Cannot write lockfile: {}\n\n\
                    Possible causes:\n\
                    - Permission denied\n\
                    - Disk is full or read-only",
                path.display()
            )
        })?;
        debug!("Wrote lockfile {}", path.display());
        Ok(())
    }
}
