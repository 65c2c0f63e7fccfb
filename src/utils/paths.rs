//! Path expansion for configuration values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Expand `~` and `$VAR`/`${VAR}` references and anchor relative results at `base`.
///
/// Absolute paths are returned as they are after expansion.
pub fn expand_path(raw: &str, base: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand environment variables in path '{raw}'"))?;
    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(base.join(path))
    }
}

/// Express `path` relative to `root` when it lives underneath it.
///
/// Returns `None` for paths outside `root`; relative input is returned as is.
#[must_use]
pub fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
    if path.is_relative() {
        return Some(path.to_path_buf());
    }
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}
