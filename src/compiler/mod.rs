//! The graph compiler: dependency tree in, ordered target declarations out.
//!
//! [`compile`] makes one linear pass over a [`DependencyTree`], classifying each
//! entry exactly once:
//!
//! 1. **Already seen** - its [`TargetLabel`] was materialized earlier; skipped.
//! 2. **Source archive** - only with `fetch_sources`; attached to the primary
//!    artifact with the same label instead of producing its own target.
//! 3. **Jar/aar file** - an import declaration, a versioned alias and, in
//!    pinned mode, a copy rule from the fetched file.
//! 4. **No file, allow-listed aggregator** - an export-only library plus alias.
//! 5. **No file otherwise** - fatal [`MavinError::MissingArtifact`].
//! 6. **File with unknown extension** - fatal [`MavinError::UnrecognizedPackaging`].
//!
//! Self-edges are dropped and dependency lists are deduplicated in
//! first-occurrence order. Mutual cycles between distinct artifacts are
//! passed through unchanged and only reported in the log. Any error aborts the
//! whole pass; a partial graph is never returned.
//!
//! # Examples
//!
//! ```rust
//! use mavin_cli::compiler::{CompileOptions, compile};
//! use mavin_cli::tree::{DependencyTree, ResolvedArtifact};
//!
//! let mut a = ResolvedArtifact::new("g:a:1.0", Some("f/g/a/1.0/a.jar"));
//! a.dependencies.push("g:b:1.0".to_string());
//! let b = ResolvedArtifact::new("g:b:1.0", Some("f/g/b/1.0/b.jar"));
//!
//! let graph = compile(&DependencyTree::new(vec![a, b]), &CompileOptions::default()).unwrap();
//! assert_eq!(graph.imports().count(), 2);
//! ```

mod cycles;
mod diagnostics;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use anyhow::Result;
use tracing::debug;

use crate::coordinate::{
    TargetLabel, VersionedLabel, fetch_repository_name, is_sources_coordinate, target_label,
    versioned_label, versionless_label,
};
use crate::core::MavinError;
use crate::tree::{DependencyTree, ResolvedArtifact};

/// Inputs to [`compile`] besides the tree itself.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Versionless labels of artifacts available only at compile time
    pub neverlink: HashSet<TargetLabel>,
    /// Versioned labels of artifacts known to be POM-only aggregators
    pub pom_only: HashSet<VersionedLabel>,
    /// Attach `sources` archives to their primary artifacts
    pub fetch_sources: bool,
    /// Emit copy rules from fetched files (pinned pipeline)
    pub pinned: bool,
}

impl CompileOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `(group, artifact)` pairs as neverlink.
    #[must_use]
    pub fn with_neverlink<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.neverlink
            .extend(pairs.into_iter().map(|(group, artifact)| versionless_label(group, artifact)));
        self
    }

    /// Allow-list coordinates that legitimately have no file.
    #[must_use]
    pub fn with_pom_only<I, S>(mut self, coords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pom_only.extend(coords.into_iter().map(|coord| versioned_label(coord.as_ref())));
        self
    }

    #[must_use]
    pub const fn with_fetch_sources(mut self, fetch_sources: bool) -> Self {
        self.fetch_sources = fetch_sources;
        self
    }

    #[must_use]
    pub const fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}

/// Import rule flavour, chosen from the artifact's file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Jar,
    Aar,
}

/// An import of a materialized binary artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub name: TargetLabel,
    pub kind: ImportKind,
    /// Path of the binary archive
    pub archive: String,
    /// Path of the attached source archive
    pub srcjar: Option<String>,
    /// Ordered, unique dependency labels, never including `name`
    pub deps: Vec<TargetLabel>,
    /// Compile-time only; excluded from the runtime closure
    pub neverlink: bool,
    /// Original coordinate, kept for provenance tooling
    pub coordinates: String,
}

/// A library with no binary that re-exports its dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub name: TargetLabel,
    pub exports: Vec<TargetLabel>,
    pub coordinates: String,
}

/// Version-qualified handle pointing at a target label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTarget {
    pub name: VersionedLabel,
    pub actual: TargetLabel,
}

/// Copies a fetched file into this repository's namespace (pinned mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget {
    pub name: String,
    /// Fetch declaration providing the file
    pub fetch_repository: String,
    /// Path the file is materialized at; matches the import's archive path
    pub output: String,
}

/// One generated build declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetDeclaration {
    Import(ImportTarget),
    Export(ExportTarget),
    Alias(AliasTarget),
    Copy(CopyTarget),
}

/// The compiler's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledGraph {
    /// Declarations in emission order
    pub declarations: Vec<TargetDeclaration>,
    /// Labels of `jar` imports, for the optional compatibility layer
    pub versionless_jar_labels: Vec<TargetLabel>,
}

impl CompiledGraph {
    pub fn imports(&self) -> impl Iterator<Item = &ImportTarget> {
        self.declarations.iter().filter_map(|decl| match decl {
            TargetDeclaration::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn exports(&self) -> impl Iterator<Item = &ExportTarget> {
        self.declarations.iter().filter_map(|decl| match decl {
            TargetDeclaration::Export(export) => Some(export),
            _ => None,
        })
    }

    pub fn copies(&self) -> impl Iterator<Item = &CopyTarget> {
        self.declarations.iter().filter_map(|decl| match decl {
            TargetDeclaration::Copy(copy) => Some(copy),
            _ => None,
        })
    }

    /// Every materialized target label.
    #[must_use]
    pub fn labels(&self) -> BTreeSet<TargetLabel> {
        self.imports()
            .map(|import| import.name.clone())
            .chain(self.exports().map(|export| export.name.clone()))
            .collect()
    }

    /// Every `(from, to)` edge of imports and exports.
    #[must_use]
    pub fn edges(&self) -> BTreeSet<(TargetLabel, TargetLabel)> {
        let import_edges = self
            .imports()
            .flat_map(|import| import.deps.iter().map(|dep| (import.name.clone(), dep.clone())));
        let export_edges = self
            .exports()
            .flat_map(|export| export.exports.iter().map(|dep| (export.name.clone(), dep.clone())));
        import_edges.chain(export_edges).collect()
    }

    /// Alias name to target label.
    #[must_use]
    pub fn aliases(&self) -> BTreeMap<VersionedLabel, TargetLabel> {
        self.declarations
            .iter()
            .filter_map(|decl| match decl {
                TargetDeclaration::Alias(alias) => Some((alias.name.clone(), alias.actual.clone())),
                _ => None,
            })
            .collect()
    }
}

/// A source archive waiting to be attached to its primary artifact.
struct SourceArchive<'a> {
    path: &'a str,
    coord: &'a str,
}

/// Compile a dependency tree into target declarations.
pub fn compile(tree: &DependencyTree, options: &CompileOptions) -> Result<CompiledGraph> {
    let source_archives = if options.fetch_sources {
        index_source_archives(tree)
    } else {
        HashMap::new()
    };

    let mut seen: HashSet<TargetLabel> = HashSet::new();
    let mut graph = CompiledGraph::default();

    for artifact in tree.iter() {
        let label = target_label(&artifact.coord);

        if seen.contains(&label) {
            debug!("Skipping {}: target {} already declared", artifact.coord, label);
            continue;
        }

        if options.fetch_sources && is_sources_coordinate(&artifact.coord) {
            continue;
        }

        match artifact.file.as_deref() {
            Some(file) => {
                let kind = match artifact.extension() {
                    Some("jar") => ImportKind::Jar,
                    Some("aar") => ImportKind::Aar,
                    other => {
                        return Err(MavinError::UnrecognizedPackaging {
                            coord: artifact.coord.clone(),
                            extension: other.unwrap_or_default().to_string(),
                            record: artifact.record(),
                        }
                        .into());
                    }
                };
                seen.insert(label.clone());

                let source_archive = source_archives.get(&label);
                let import = ImportTarget {
                    name: label.clone(),
                    kind,
                    archive: file.to_string(),
                    srcjar: source_archive.map(|archive| archive.path.to_string()),
                    deps: dependency_labels(artifact, &label),
                    neverlink: options.neverlink.contains(&label),
                    coordinates: artifact.coord.clone(),
                };
                debug!(
                    "Declaring import {} for {} with {} deps",
                    label,
                    artifact.coord,
                    import.deps.len()
                );

                graph.declarations.push(TargetDeclaration::Import(import));
                graph.declarations.push(alias_for(artifact, &label));

                if options.pinned {
                    graph.declarations.push(copy_rule(&artifact.coord, file));
                    if let Some(archive) = source_archive {
                        graph.declarations.push(copy_rule(archive.coord, archive.path));
                    }
                }

                if kind == ImportKind::Jar {
                    graph.versionless_jar_labels.push(label);
                }
            }
            None if options.pom_only.contains(&versioned_label(&artifact.coord)) => {
                seen.insert(label.clone());
                debug!("Declaring POM-only aggregator {} for {}", label, artifact.coord);

                graph.declarations.push(TargetDeclaration::Export(ExportTarget {
                    name: label.clone(),
                    exports: dependency_labels(artifact, &label),
                    coordinates: artifact.coord.clone(),
                }));
                graph.declarations.push(alias_for(artifact, &label));
            }
            None => return Err(diagnostics::missing_artifact(tree, artifact).into()),
        }
    }

    diagnostics::check_edge_closure(tree, &graph, &seen)?;
    cycles::report_mutual_cycles(&graph);

    Ok(graph)
}

/// First `sources` archive per target label.
fn index_source_archives(tree: &DependencyTree) -> HashMap<TargetLabel, SourceArchive<'_>> {
    let mut index = HashMap::new();
    for artifact in tree.iter().filter(|artifact| is_sources_coordinate(&artifact.coord)) {
        if let Some(path) = artifact.file.as_deref() {
            index.entry(target_label(&artifact.coord)).or_insert(SourceArchive {
                path,
                coord: &artifact.coord,
            });
        }
    }
    index
}

/// Canonical dependency labels with self-edges removed, first occurrence kept.
fn dependency_labels(artifact: &ResolvedArtifact, own: &TargetLabel) -> Vec<TargetLabel> {
    let mut unique = HashSet::new();
    artifact
        .dependencies
        .iter()
        .map(|dep| target_label(dep))
        .filter(|dep| dep != own)
        .filter(|dep| unique.insert(dep.clone()))
        .collect()
}

fn alias_for(artifact: &ResolvedArtifact, label: &TargetLabel) -> TargetDeclaration {
    TargetDeclaration::Alias(AliasTarget {
        name: versioned_label(&artifact.coord),
        actual: label.clone(),
    })
}

fn copy_rule(coord: &str, path: &str) -> TargetDeclaration {
    let fetch_repository = fetch_repository_name(coord);
    TargetDeclaration::Copy(CopyTarget {
        name: format!("{fetch_repository}_extension"),
        fetch_repository,
        output: path.to_string(),
    })
}
