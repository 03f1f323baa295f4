//! The per-node hierarchy table written by `summarize`.

use std::path::Path;

use ontoscope_graph::analysis::depth_value;
use ontoscope_graph::{NodeRecord, Result};
use serde::{Deserialize, Serialize};

use crate::table::{read_rows, render_rows};

pub const ID: &str = "ID";
pub const LABEL: &str = "Label";
pub const DEPTH: &str = "Depth";
pub const NUM_PARENTS: &str = "Num_Parents";
pub const NUM_CHILDREN: &str = "Num_Children";
pub const NUM_DESCENDANTS: &str = "Num_Descendants";
pub const MAX_DESCENDANT_DIFF: &str = "Max_Num_Descendant_Diff";

pub const HEADERS: [&str; 7] = [
    ID,
    LABEL,
    DEPTH,
    NUM_PARENTS,
    NUM_CHILDREN,
    NUM_DESCENDANTS,
    MAX_DESCENDANT_DIFF,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Depth")]
    pub depth: i64,
    #[serde(rename = "Num_Parents")]
    pub num_parents: usize,
    #[serde(rename = "Num_Children")]
    pub num_children: usize,
    #[serde(rename = "Num_Descendants")]
    pub num_descendants: u64,
    #[serde(rename = "Max_Num_Descendant_Diff")]
    pub max_descendant_diff: u64,
}

impl From<&NodeRecord> for HierarchyRow {
    fn from(record: &NodeRecord) -> Self {
        Self {
            id: record.id.clone(),
            label: record.label.clone(),
            depth: depth_value(record.depth),
            num_parents: record.num_parents(),
            num_children: record.num_children,
            num_descendants: record.num_descendants,
            max_descendant_diff: record.max_descendant_diff,
        }
    }
}

pub fn hierarchy_rows(records: &[NodeRecord]) -> Vec<HierarchyRow> {
    records.iter().map(HierarchyRow::from).collect()
}

pub fn render_hierarchy(path: &Path, rows: &[HierarchyRow]) -> Result<Vec<u8>> {
    render_rows(path, &HEADERS, rows)
}

pub fn read_hierarchy(path: &Path) -> Result<Vec<HierarchyRow>> {
    read_rows(path, &HEADERS)
}
