//! Live pipeline: resolver output to lockfile.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::InstanceConfig;
use crate::lockfile::{Lockfile, sha256_file, url_from_cache_path};
use crate::resolver::{ArtifactResolver, ResolverRequest};
use crate::tree::DependencyTree;

/// Resolve `instance` and return the lockfile of the result.
pub async fn resolve_lockfile<R: ArtifactResolver>(
    resolver: &R,
    instance: &InstanceConfig,
    cache_dir: &Path,
) -> Result<Lockfile> {
    let request = ResolverRequest::for_instance(instance)?;
    let fingerprint = instance.fingerprint()?;

    let tree = resolver.resolve(&request).await?;

    let cache_dir: PathBuf = cache_dir.to_path_buf();
    let tree = tokio::task::spawn_blocking(move || {
        let mut tree = tree;
        attach_provenance(&mut tree, &cache_dir).map(|()| tree)
    })
    .await
    .context("Checksum computation was interrupted")??;

    Ok(Lockfile::new(tree).with_input_hash(fingerprint.hash()))
}

/// Fill in `url` and `sha256` for every entry with a file.
///
/// Files are read relative to `cache_dir`. Entries without a file keep no
/// provenance; a path without an http(s) origin is fatal.
pub fn attach_provenance(tree: &mut DependencyTree, cache_dir: &Path) -> Result<()> {
    for artifact in &mut tree.dependencies {
        let Some(file) = artifact.file.as_deref() else {
            continue;
        };
        let url = url_from_cache_path(&artifact.coord, file)?;
        let sha256 = sha256_file(&cache_dir.join(file))
            .with_context(|| format!("Failed to checksum {}", artifact.coord))?;
        debug!("{} -> {}", artifact.coord, url);
        artifact.url = Some(url);
        artifact.sha256 = Some(sha256);
    }
    Ok(())
}
