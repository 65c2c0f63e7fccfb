//! Declarations the pipelines add around the compiled graph.

use crate::compiler::CompiledGraph;
use crate::coordinate::{TargetLabel, fetch_repository_name};
use crate::tree::DependencyTree;

/// An external file fetch backing a pinned copy rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDeclaration {
    /// `escape(coord)`; referenced by copy rules as `@<name>//file`
    pub name: String,
    pub url: String,
    pub sha256: Option<String>,
    /// File name the download is stored under
    pub downloaded_file_path: String,
}

/// An old-style per-artifact repository aliasing a generated target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatRepository {
    pub name: TargetLabel,
    pub generating_repository: String,
}

/// One fetch declaration per artifact carrying a `url`, first entry per name wins.
#[must_use]
pub fn fetch_declarations(tree: &DependencyTree) -> Vec<FetchDeclaration> {
    let mut seen = std::collections::HashSet::new();
    tree.iter()
        .filter_map(|artifact| {
            let url = artifact.url.as_ref()?;
            let name = fetch_repository_name(&artifact.coord);
            if !seen.insert(name.clone()) {
                return None;
            }
            let source = artifact.file.as_deref().unwrap_or(url);
            let downloaded_file_path =
                source.rsplit(['/', '\\']).next().unwrap_or(source).to_string();
            Some(FetchDeclaration {
                name,
                url: url.clone(),
                sha256: artifact.sha256.clone(),
                downloaded_file_path,
            })
        })
        .collect()
}

/// Compatibility repositories for every `jar` target of `graph`.
#[must_use]
pub fn compat_repositories(graph: &CompiledGraph, repository: &str) -> Vec<CompatRepository> {
    graph
        .versionless_jar_labels
        .iter()
        .map(|label| CompatRepository {
            name: label.clone(),
            generating_repository: repository.to_string(),
        })
        .collect()
}
