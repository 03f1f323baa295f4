//! Sibling sets: nodes sharing at least one parent.

use std::collections::BTreeSet;

use roaring::RoaringBitmap;

use crate::index::HierarchyIndex;

/// Union of the children of every parent of `handle`, minus `handle` itself.
pub fn siblings(index: &HierarchyIndex, handle: u32) -> RoaringBitmap {
    let mut out = RoaringBitmap::new();
    for &parent in index.parents(handle) {
        out.extend(index.children(parent).iter().copied());
    }
    out.remove(handle);
    out
}

/// Sibling ids of `id`, sorted. Unknown ids and roots have none.
pub fn siblings_of<'a>(index: &'a HierarchyIndex, id: &str) -> BTreeSet<&'a str> {
    index
        .handle(id)
        .map(|h| siblings(index, h).iter().map(|s| index.id(s)).collect())
        .unwrap_or_default()
}
