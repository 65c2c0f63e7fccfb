//! Mutual-cycle reporting.
//!
//! The resolver occasionally reports cycles between distinct artifacts. They
//! are kept in the generated graph; this pass only surfaces them in the log.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::warn;

use crate::coordinate::TargetLabel;

use super::CompiledGraph;

/// Log every strongly connected component with more than one target.
pub(super) fn report_mutual_cycles(graph: &CompiledGraph) {
    for cycle in mutual_cycles(graph) {
        let members: Vec<&str> = cycle.iter().map(TargetLabel::as_str).collect();
        warn!(
            "Dependency cycle between {} targets: {}. Build tools that forbid import cycles may reject it",
            members.len(),
            members.join(" -> ")
        );
    }
}

pub(super) fn mutual_cycles(graph: &CompiledGraph) -> Vec<Vec<TargetLabel>> {
    let mut digraph: DiGraph<TargetLabel, ()> = DiGraph::new();
    let mut nodes: HashMap<TargetLabel, NodeIndex> = HashMap::new();

    let mut node_for = |digraph: &mut DiGraph<TargetLabel, ()>, label: &TargetLabel| {
        *nodes.entry(label.clone()).or_insert_with(|| digraph.add_node(label.clone()))
    };

    for (from, to) in graph.edges() {
        let from = node_for(&mut digraph, &from);
        let to = node_for(&mut digraph, &to);
        digraph.add_edge(from, to, ());
    }

    tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut labels: Vec<TargetLabel> =
                component.into_iter().map(|index| digraph[index].clone()).collect();
            labels.sort();
            labels
        })
        .collect()
}
