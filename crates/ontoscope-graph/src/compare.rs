//! Node-membership diff between two snapshots, and the node-id list format.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{OntologyError, Result};
use crate::model::NodeLabels;

/// Partition of the ids of two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub only_in_first: BTreeSet<String>,
    pub only_in_second: BTreeSet<String>,
    pub common: BTreeSet<String>,
}

impl SnapshotDiff {
    pub fn compare(first: &NodeLabels, second: &NodeLabels) -> Self {
        let mut diff = Self::default();
        for id in first.ids() {
            if second.contains(id) {
                diff.common.insert(id.to_string());
            } else {
                diff.only_in_first.insert(id.to_string());
            }
        }
        diff.only_in_second = second
            .ids()
            .filter(|id| !first.contains(id))
            .map(str::to_string)
            .collect();
        tracing::debug!(
            only_in_first = diff.only_in_first.len(),
            only_in_second = diff.only_in_second.len(),
            common = diff.common.len(),
            "compared snapshots"
        );
        diff
    }
}

/// Renders ids as one comma-joined line, sorted, without a trailing delimiter.
pub fn render_id_list<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    let sorted: BTreeSet<&str> = ids.into_iter().collect();
    sorted.into_iter().collect::<Vec<_>>().join(",")
}

/// Splits an id list on commas, trimming whitespace and dropping empty items.
pub fn parse_id_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_id_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| OntologyError::io(path, e))?;
    let ids = parse_id_list(&text);
    tracing::info!(path = %path.display(), ids = ids.len(), "loaded node-id list");
    Ok(ids)
}
