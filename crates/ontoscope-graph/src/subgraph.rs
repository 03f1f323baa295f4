//! Induced subgraph of a root and everything below it.

use std::collections::{HashSet, VecDeque};

use roaring::RoaringBitmap;

use crate::index::{HierarchyIndex, RelationFilter};
use crate::model::Graph;

/// Handles reachable from `root` through child edges, `root` included.
pub fn reachable_from(index: &HierarchyIndex, root: u32) -> RoaringBitmap {
    let mut reachable = RoaringBitmap::new();
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        if !reachable.insert(node) {
            continue;
        }
        queue.extend(
            index
                .children(node)
                .iter()
                .copied()
                .filter(|c| !reachable.contains(*c)),
        );
    }
    reachable
}

/// Builds a new graph holding the node entries reachable from `root` and the
/// edges (of any predicate) whose endpoints are both reachable.
///
/// Reachability follows the edges accepted by `filter`. Document order and
/// duplicate entries are preserved, so extracting again from the result with
/// the same root and filter returns it unchanged.
pub fn extract_subgraph(graph: &Graph, root: &str, filter: &RelationFilter) -> Graph {
    let index = HierarchyIndex::build(graph, filter);
    let reachable: HashSet<&str> = match index.handle(root) {
        Some(handle) => reachable_from(&index, handle)
            .iter()
            .map(|h| index.id(h))
            .collect(),
        None => HashSet::from([root]),
    };

    let nodes: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.id().is_some_and(|id| reachable.contains(id)))
        .cloned()
        .collect();
    let edges: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| match (e.subject(), e.object()) {
            (Some(sub), Some(obj)) => reachable.contains(sub) && reachable.contains(obj),
            _ => false,
        })
        .cloned()
        .collect();

    tracing::info!(
        root,
        reachable = reachable.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "extracted subgraph"
    );
    Graph {
        nodes,
        edges,
        extra: graph.extra.clone(),
    }
}
