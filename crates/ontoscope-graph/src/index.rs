//! Parent/child adjacency over one snapshot.
//!
//! Node ids are interned to dense `u32` handles (node entries first, in
//! document order, then any edge endpoint not seen yet) so that traversals can
//! run over `Vec` adjacency and bitmap visited sets.

use ahash::AHashMap;

use crate::model::{Edge, Graph};

/// Which edges take part in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationFilter {
    /// Only edges whose predicate equals the given literal.
    Predicate(String),
    /// Every edge, whatever its predicate.
    Any,
}

impl RelationFilter {
    pub fn predicate(predicate: &str) -> Self {
        Self::Predicate(predicate.to_string())
    }

    pub fn accepts(&self, edge: &Edge) -> bool {
        match self {
            Self::Any => true,
            Self::Predicate(p) => edge.predicate() == Some(p.as_str()),
        }
    }
}

/// `childToParents` / `parentToChildren`, read-only once built.
///
/// Adjacency lists keep edge input order, including duplicates when the same
/// edge appears twice.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    ids: Vec<String>,
    lookup: AHashMap<String, u32>,
    entries: Vec<u32>,
    parents: Vec<Vec<u32>>,
    children: Vec<Vec<u32>>,
    dropped_edges: usize,
}

impl HierarchyIndex {
    pub fn build(graph: &Graph, filter: &RelationFilter) -> Self {
        let mut index = Self::default();
        for id in graph.node_ids() {
            let handle = index.intern(id);
            index.entries.push(handle);
        }

        let mut kept = 0usize;
        for edge in &graph.edges {
            if !filter.accepts(edge) {
                continue;
            }
            let (Some(child), Some(parent)) = (edge.subject(), edge.object()) else {
                index.dropped_edges += 1;
                continue;
            };
            let c = index.intern(child);
            let p = index.intern(parent);
            index.parents[c as usize].push(p);
            index.children[p as usize].push(c);
            kept += 1;
        }

        tracing::debug!(
            ids = index.ids.len(),
            entries = index.entries.len(),
            edges = kept,
            dropped = index.dropped_edges,
            "built hierarchy index"
        );
        index
    }

    fn intern(&mut self, id: &str) -> u32 {
        if let Some(&handle) = self.lookup.get(id) {
            return handle;
        }
        let handle = self.ids.len() as u32;
        self.ids.push(id.to_string());
        self.lookup.insert(id.to_string(), handle);
        self.parents.push(Vec::new());
        self.children.push(Vec::new());
        handle
    }

    /// Number of interned ids (node entries plus dangling edge endpoints).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn handle(&self, id: &str) -> Option<u32> {
        self.lookup.get(id).copied()
    }

    pub fn id(&self, handle: u32) -> &str {
        &self.ids[handle as usize]
    }

    /// Handles of distinct node entries, in document order.
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub fn parents(&self, handle: u32) -> &[u32] {
        &self.parents[handle as usize]
    }

    pub fn children(&self, handle: u32) -> &[u32] {
        &self.children[handle as usize]
    }

    pub fn is_root(&self, handle: u32) -> bool {
        self.parents(handle).is_empty()
    }

    /// Hierarchy edges skipped because an endpoint was missing or empty.
    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    pub fn parents_of(&self, id: &str) -> Vec<&str> {
        self.handle(id)
            .map(|h| self.parents(h).iter().map(|&p| self.id(p)).collect())
            .unwrap_or_default()
    }

    pub fn children_of(&self, id: &str) -> Vec<&str> {
        self.handle(id)
            .map(|h| self.children(h).iter().map(|&c| self.id(c)).collect())
            .unwrap_or_default()
    }
}
