//! The two resolution pipelines and their shared tail.
//!
//! A [`ResolutionMode`] is either [`Live`](ResolutionMode::Live), which
//! invokes the external resolver and produces a fresh [`Lockfile`], or
//! [`Pinned`](ResolutionMode::Pinned), which replays an existing lockfile
//! without touching the resolver. Both hand an unchanged [`DependencyTree`]
//! to [`compile`], so equal trees always yield equal target graphs.
//!
//! ```text
//! Live:   resolver -> url/sha256 provenance -> Lockfile ─┐
//!                                                         ├─> compile -> GeneratedRepository
//! Pinned: lockfile on disk -> staleness check ───────────┘
//! ```
//!
//! A live pass runs under `unpinned_<name>` so that a later pinned pass owns
//! the canonical repository name.

mod declarations;
mod live;
mod pinned;

pub use declarations::{CompatRepository, FetchDeclaration, compat_repositories, fetch_declarations};
pub use live::{attach_provenance, resolve_lockfile};
pub use pinned::load_lockfile;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::compiler::{CompiledGraph, compile};
use crate::config::{InstanceConfig, WorkspaceConfig};
use crate::constants::{BUILD_FILE_NAME, COMPAT_FILE_NAME, DEFS_FILE_NAME, UNPINNED_PREFIX};
use crate::lockfile::Lockfile;
use crate::render;
use crate::resolver::ArtifactResolver;
use crate::tree::DependencyTree;
use crate::utils::safe_write;

/// Which pipeline produces the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Run the external resolver
    Live,
    /// Replay the lockfile at `lock_file`
    Pinned {
        lock_file: PathBuf,
    },
}

impl ResolutionMode {
    /// Pinned when the instance names a lockfile, live otherwise.
    pub fn for_instance(config: &WorkspaceConfig, instance: &InstanceConfig) -> Result<Self> {
        Ok(match config.lock_file_path(instance)? {
            Some(lock_file) => Self::Pinned {
                lock_file,
            },
            None => Self::Live,
        })
    }

    /// Name of the generated repository for `instance_name`.
    #[must_use]
    pub fn repository_name(&self, instance_name: &str) -> String {
        match self {
            Self::Live => format!("{UNPINNED_PREFIX}{instance_name}"),
            Self::Pinned {
                ..
            } => instance_name.to_string(),
        }
    }

    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned { .. })
    }
}

/// Everything produced for one instance by one pass.
#[derive(Debug, Clone)]
pub struct GeneratedRepository {
    /// Repository name (`maven` or `unpinned_maven`)
    pub name: String,
    pub pinned: bool,
    pub graph: CompiledGraph,
    /// Fetch declarations; empty in live mode
    pub fetches: Vec<FetchDeclaration>,
    /// Compatibility repositories; empty unless requested
    pub compat: Vec<CompatRepository>,
    /// The tree the graph was compiled from
    pub lockfile: Lockfile,
    /// Whether the lockfile's input fingerprint no longer matches the config
    pub stale: bool,
}

impl GeneratedRepository {
    /// Write `BUILD`, and `defs.bzl`/`compat.bzl` when applicable, under
    /// `<output_dir>/<name>/`. Files that no longer apply are removed.
    pub fn write(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let dir = output_dir.join(&self.name);
        let mut written = Vec::new();

        let build = dir.join(BUILD_FILE_NAME);
        safe_write(&build, &render::build_file(&self.name, &self.graph))?;
        written.push(build);

        let defs = dir.join(DEFS_FILE_NAME);
        if self.pinned {
            safe_write(&defs, &render::defs_file(&self.name, &self.fetches))?;
            written.push(defs);
        } else {
            remove_stale(&defs)?;
        }

        let compat = dir.join(COMPAT_FILE_NAME);
        if self.compat.is_empty() {
            remove_stale(&compat)?;
        } else {
            safe_write(&compat, &render::compat_file(&self.compat))?;
            written.push(compat);
        }

        debug!("Wrote {} file(s) for {}", written.len(), self.name);
        Ok(written)
    }
}

fn remove_stale(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove stale file {}", path.display()))?;
    }
    Ok(())
}

/// Run one pass for `instance` in `mode`.
pub async fn run<R: ArtifactResolver>(
    mode: &ResolutionMode,
    instance: &InstanceConfig,
    resolver: &R,
    cache_dir: &Path,
) -> Result<GeneratedRepository> {
    let name = mode.repository_name(&instance.name);
    info!("Generating {} ({})", name, if mode.is_pinned() { "pinned" } else { "live" });

    let (lockfile, stale) = match mode {
        ResolutionMode::Live => (resolve_lockfile(resolver, instance, cache_dir).await?, false),
        ResolutionMode::Pinned {
            lock_file,
        } => load_lockfile(lock_file, instance)?,
    };

    assemble(name, instance, lockfile, mode.is_pinned(), stale)
}

/// The shared tail: compile the tree and derive the surrounding declarations.
pub fn assemble(
    name: String,
    instance: &InstanceConfig,
    lockfile: Lockfile,
    pinned: bool,
    stale: bool,
) -> Result<GeneratedRepository> {
    let options = instance.compile_options(pinned)?;
    let tree: &DependencyTree = &lockfile.dependency_tree;

    let graph = compile(tree, &options)
        .with_context(|| format!("Failed to generate targets for repository '{name}'"))?;

    let fetches = if pinned { fetch_declarations(tree) } else { Vec::new() };
    let compat = if instance.generate_compat_repositories {
        compat_repositories(&graph, &name)
    } else {
        Vec::new()
    };

    info!(
        "{}: {} import(s), {} export(s), {} fetch declaration(s)",
        name,
        graph.imports().count(),
        graph.exports().count(),
        fetches.len()
    );

    Ok(GeneratedRepository {
        name,
        pinned,
        graph,
        fetches,
        compat,
        lockfile,
        stale,
    })
}
