//! Pinned pipeline: lockfile on disk to dependency tree.

use std::path::Path;

use anyhow::Result;
use tracing::warn;

use crate::config::InstanceConfig;
use crate::lockfile::Lockfile;

/// Load the lockfile of `instance` and check it against the current inputs.
///
/// Entries with a file but no `url`/`sha256` are rejected. Returns the
/// lockfile and whether it is stale. Staleness is only logged; the recorded
/// tree is still authoritative.
pub fn load_lockfile(path: &Path, instance: &InstanceConfig) -> Result<(Lockfile, bool)> {
    let lockfile = Lockfile::load(path, &instance.name)?;
    lockfile.check_provenance(&path.display().to_string(), &instance.name)?;

    let stale = lockfile.is_stale(&instance.fingerprint()?);
    if stale {
        warn!(
            "Lockfile {} does not match the artifacts of '{}' in mavin.toml. \
             Run `mavin pin --name {}` to update it",
            path.display(),
            instance.name,
            instance.name
        );
    }

    Ok((lockfile, stale))
}
