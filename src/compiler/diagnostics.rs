//! Failure-path diagnostics for the graph compiler.
//!
//! The reverse-dependency index is only built here, after compilation has
//! already failed, so the success path never pays for it.

use std::collections::{HashMap, HashSet};

use crate::coordinate::{TargetLabel, target_label};
use crate::core::{MavinError, ReverseDependent};
use crate::tree::{DependencyTree, ResolvedArtifact};

use super::{CompiledGraph, TargetDeclaration};

/// Coordinate string to the positions of the entries that depend on it.
struct ReverseIndex<'a> {
    dependents: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ReverseIndex<'a> {
    fn build(tree: &'a DependencyTree) -> Self {
        let mut dependents: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (position, artifact) in tree.dependencies.iter().enumerate() {
            for dep in &artifact.dependencies {
                let entries = dependents.entry(dep.as_str()).or_default();
                if entries.last() != Some(&position) {
                    entries.push(position);
                }
            }
        }
        Self {
            dependents,
        }
    }

    fn dependents_of(&self, coord: &str) -> &[usize] {
        self.dependents.get(coord).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Build the fatal diagnostic for an entry with no file.
pub(super) fn missing_artifact(tree: &DependencyTree, missing: &ResolvedArtifact) -> MavinError {
    let index = ReverseIndex::build(tree);
    let positions = index
        .dependents_of(&missing.coord)
        .iter()
        .copied()
        .filter(|&position| !std::ptr::eq(&tree.dependencies[position], missing));

    MavinError::MissingArtifact {
        coord: missing.coord.clone(),
        record: missing.record(),
        dependents: reverse_dependents(tree, positions),
    }
}

/// Fail when a surviving edge points at a label nothing declared.
pub(super) fn check_edge_closure(
    tree: &DependencyTree,
    graph: &CompiledGraph,
    declared: &HashSet<TargetLabel>,
) -> Result<(), MavinError> {
    let dangling = graph.declarations.iter().find_map(|decl| {
        let deps = match decl {
            TargetDeclaration::Import(import) => &import.deps,
            TargetDeclaration::Export(export) => &export.exports,
            _ => return None,
        };
        deps.iter().find(|dep| !declared.contains(*dep))
    });

    let Some(label) = dangling else {
        return Ok(());
    };

    let coord = tree
        .iter()
        .flat_map(|artifact| artifact.dependencies.iter())
        .find(|dep| target_label(dep) == *label)
        .cloned()
        .unwrap_or_else(|| label.to_string());

    let positions = tree
        .dependencies
        .iter()
        .enumerate()
        .filter(|(_, artifact)| artifact.dependencies.iter().any(|dep| target_label(dep) == *label))
        .map(|(position, _)| position);

    Err(MavinError::MissingArtifact {
        coord,
        record: unmaterialized_record(label),
        dependents: reverse_dependents(tree, positions),
    })
}

/// Record text for an edge whose label no entry materialized. The coordinate
/// may still have a tree entry that stripped to a different label.
fn unmaterialized_record(label: &TargetLabel) -> String {
    format!("<no target materialized for label {label}>")
}

fn reverse_dependents(
    tree: &DependencyTree,
    positions: impl Iterator<Item = usize>,
) -> Vec<ReverseDependent> {
    let mut seen = HashSet::new();
    positions
        .map(|position| &tree.dependencies[position])
        .filter(|artifact| seen.insert(artifact.coord.as_str()))
        .map(|artifact| ReverseDependent {
            coord: artifact.coord.clone(),
            descriptor: artifact.descriptor_path(),
        })
        .collect()
}
