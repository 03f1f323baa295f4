//! Breadth-first depth assignment from the roots of a multi-parent hierarchy.

use std::collections::VecDeque;

use crate::index::HierarchyIndex;

/// Minimal root distance per interned handle; `None` when no root reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Depths {
    depths: Vec<Option<u32>>,
    roots: Vec<u32>,
}

impl Depths {
    pub fn get(&self, handle: u32) -> Option<u32> {
        self.depths.get(handle as usize).copied().flatten()
    }

    pub fn of(&self, index: &HierarchyIndex, id: &str) -> Option<u32> {
        index.handle(id).and_then(|h| self.get(h))
    }

    /// Node entries without parents, in document order.
    pub fn roots(&self) -> &[u32] {
        &self.roots
    }
}

/// Multi-source BFS seeded with every parentless node entry at depth 0.
///
/// A child is (re)assigned and enqueued when it is unvisited or its recorded
/// depth is strictly greater than the offered one. The frontier is FIFO and
/// every seed starts at 0, so offered depths never decrease along the queue.
pub fn compute_depths(index: &HierarchyIndex) -> Depths {
    let roots: Vec<u32> = index
        .entries()
        .iter()
        .copied()
        .filter(|&h| index.is_root(h))
        .collect();

    let mut depths: Vec<Option<u32>> = vec![None; index.len()];
    let mut queue: VecDeque<u32> = VecDeque::with_capacity(roots.len());
    for &root in &roots {
        depths[root as usize] = Some(0);
        queue.push_back(root);
    }

    while let Some(node) = queue.pop_front() {
        let Some(depth) = depths[node as usize] else {
            continue;
        };
        let offered = depth + 1;
        for &child in index.children(node) {
            let slot = &mut depths[child as usize];
            if slot.map_or(true, |current| current > offered) {
                *slot = Some(offered);
                queue.push_back(child);
            }
        }
    }

    tracing::debug!(
        roots = roots.len(),
        reached = depths.iter().filter(|d| d.is_some()).count(),
        "assigned depths"
    );
    Depths { depths, roots }
}
