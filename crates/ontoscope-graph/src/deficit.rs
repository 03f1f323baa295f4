//! Descendant-count deficit of a node relative to its largest sibling subtree.
//!
//! Nodes that are much "thinner" than a sibling get a large value, which is
//! what curation review sorts on.

use crate::descendants::DescendantCounts;
use crate::index::HierarchyIndex;
use crate::siblings::siblings;

/// `max(0, max_S desc(S) - desc(N))` over the siblings of `handle`;
/// 0 for roots and for nodes without siblings.
pub fn max_descendant_deficit(
    index: &HierarchyIndex,
    counts: &DescendantCounts,
    handle: u32,
) -> u64 {
    if index.is_root(handle) {
        return 0;
    }
    let own = counts.get(handle);
    siblings(index, handle)
        .iter()
        .map(|s| counts.get(s))
        .max()
        .map_or(0, |largest| largest.saturating_sub(own))
}
