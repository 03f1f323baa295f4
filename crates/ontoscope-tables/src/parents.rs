//! Parent/sibling report rows.

use std::path::Path;

use ontoscope_graph::analysis::NodeRef;
use ontoscope_graph::parents::ParentReportEntry;
use ontoscope_graph::Result;
use serde::{Deserialize, Serialize};

use crate::table::{read_rows, render_rows};

pub const HEADERS: [&str; 8] = [
    "node_id",
    "node_label",
    "parent_ids",
    "parent_labels",
    "sibling_ids",
    "sibling_labels",
    "num_parents",
    "num_siblings",
];

/// Separator for list-valued cells.
pub const LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRow {
    pub node_id: String,
    #[serde(default)]
    pub node_label: String,
    #[serde(default)]
    pub parent_ids: String,
    #[serde(default)]
    pub parent_labels: String,
    #[serde(default)]
    pub sibling_ids: String,
    #[serde(default)]
    pub sibling_labels: String,
    #[serde(default)]
    pub num_parents: usize,
    #[serde(default)]
    pub num_siblings: usize,
}

fn join(refs: &[NodeRef], field: impl Fn(&NodeRef) -> &str) -> String {
    refs.iter().map(field).collect::<Vec<_>>().join(LIST_SEPARATOR)
}

impl From<&ParentReportEntry> for ParentRow {
    fn from(entry: &ParentReportEntry) -> Self {
        Self {
            node_id: entry.node.id.clone(),
            node_label: entry.node.label.clone(),
            parent_ids: join(&entry.parents, |r| &r.id),
            parent_labels: join(&entry.parents, |r| &r.label),
            sibling_ids: join(&entry.siblings, |r| &r.id),
            sibling_labels: join(&entry.siblings, |r| &r.label),
            num_parents: entry.parents.len(),
            num_siblings: entry.siblings.len(),
        }
    }
}

pub fn parent_rows(report: &[ParentReportEntry]) -> Vec<ParentRow> {
    report.iter().map(ParentRow::from).collect()
}

pub fn render_parent_report(path: &Path, rows: &[ParentRow]) -> Result<Vec<u8>> {
    render_rows(path, &HEADERS, rows)
}

/// Only `node_id` and `parent_ids` are required; the joiner needs nothing else.
pub fn read_parent_report(path: &Path) -> Result<Vec<ParentRow>> {
    read_rows(path, &["node_id", "parent_ids"])
}
