//! Transitive descendant counts.

use roaring::RoaringBitmap;

use crate::index::HierarchyIndex;

/// Every handle reachable from `start` through child edges, `start` excluded
/// (also when a cycle leads back to it).
///
/// Iterative DFS with a visited bitmap, so a node reachable along several
/// paths is counted once and deep hierarchies cannot overflow the stack.
pub fn descendants_of(index: &HierarchyIndex, start: u32) -> RoaringBitmap {
    let mut visited = RoaringBitmap::new();
    visited.insert(start);
    let mut stack: Vec<u32> = vec![start];
    while let Some(node) = stack.pop() {
        for &child in index.children(node) {
            if visited.insert(child) {
                stack.push(child);
            }
        }
    }
    visited.remove(start);
    visited
}

/// Descendant count per interned handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescendantCounts {
    counts: Vec<u64>,
}

impl DescendantCounts {
    pub fn get(&self, handle: u32) -> u64 {
        self.counts.get(handle as usize).copied().unwrap_or(0)
    }

    /// Count for an id; ids outside the index have no descendants.
    pub fn of(&self, index: &HierarchyIndex, id: &str) -> u64 {
        index.handle(id).map(|h| self.get(h)).unwrap_or(0)
    }
}

/// Counts descendants of every interned handle, each with its own traversal.
pub fn count_descendants(index: &HierarchyIndex) -> DescendantCounts {
    let counts = (0..index.len() as u32)
        .map(|handle| {
            if index.children(handle).is_empty() {
                0
            } else {
                descendants_of(index, handle).len()
            }
        })
        .collect();
    DescendantCounts { counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RelationFilter;
    use crate::model::Graph;

    fn index_for(edges: &[(&str, &str)]) -> HierarchyIndex {
        let mut g = Graph::new();
        for (child, parent) in edges {
            g.add_edge(child, "is_a", parent);
        }
        HierarchyIndex::build(&g, &RelationFilter::predicate("is_a"))
    }

    #[test]
    fn leaves_have_no_descendants() {
        let index = index_for(&[("A", "R"), ("B", "R"), ("C", "A")]);
        let counts = count_descendants(&index);
        assert_eq!(counts.of(&index, "R"), 3);
        assert_eq!(counts.of(&index, "A"), 1);
        assert_eq!(counts.of(&index, "B"), 0);
        assert_eq!(counts.of(&index, "C"), 0);
        assert_eq!(counts.of(&index, "unknown"), 0);
    }

    #[test]
    fn diamonds_count_shared_descendants_once() {
        let index = index_for(&[("A", "R"), ("B", "R"), ("C", "A"), ("C", "B"), ("D", "C")]);
        let counts = count_descendants(&index);
        assert_eq!(counts.of(&index, "R"), 4);
        assert_eq!(counts.of(&index, "A"), 2);
        assert_eq!(counts.of(&index, "B"), 2);
    }

    #[test]
    fn duplicate_edges_count_once() {
        let index = index_for(&[("A", "R"), ("A", "R")]);
        assert_eq!(count_descendants(&index).of(&index, "R"), 1);
    }

    #[test]
    fn cycles_exclude_the_start_node() {
        let index = index_for(&[("B", "A"), ("C", "B"), ("A", "C")]);
        let counts = count_descendants(&index);
        assert_eq!(counts.of(&index, "A"), 2);
        assert_eq!(counts.of(&index, "B"), 2);

        let a = index.handle("A").unwrap();
        let below: Vec<&str> = descendants_of(&index, a).iter().map(|h| index.id(h)).collect();
        assert_eq!(below.len(), 2);
        assert!(!below.contains(&"A"));
    }

    #[test]
    fn deep_chains_do_not_recurse() {
        let ids: Vec<String> = (0..20_000).map(|i| format!("N{i}")).collect();
        let mut g = Graph::new();
        for pair in ids.windows(2) {
            g.add_edge(&pair[1], "is_a", &pair[0]);
        }
        let index = HierarchyIndex::build(&g, &RelationFilter::predicate("is_a"));
        let root = index.handle("N0").unwrap();
        assert_eq!(descendants_of(&index, root).len(), 19_999);
    }
}
