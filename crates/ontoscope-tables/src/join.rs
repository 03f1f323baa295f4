//! Cross-version join: parents of new nodes against the old snapshot.
//!
//! Each node added in the new snapshot lists its parents; the old snapshot's
//! hierarchy table says how large and how deep those parents were before the
//! node appeared. A parent unknown to the old snapshot is skipped, and a node
//! with no parent known to the old snapshot gets empty metric cells.

use std::path::Path;

use ahash::AHashMap;
use ontoscope_graph::analysis::UNREACHABLE_DEPTH;
use ontoscope_graph::Result;
use serde::{Deserialize, Serialize};

use crate::hierarchy::{self, HierarchyRow};
use crate::parents::ParentRow;
use crate::table::{read_rows, render_rows};

pub const HEADERS: [&str; 6] = [
    "Node_ID",
    "Node_Label",
    "Parent_IDs",
    "Parent_Children_Count (min)",
    "Parent_Max_Desc_Diff",
    "Parent_Depth",
];

/// What the old snapshot knew about a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentMetrics {
    pub depth: i64,
    pub num_children: u64,
    pub max_descendant_diff: u64,
}

/// Old hierarchy rows as read from disk; metric cells may be empty.
#[derive(Debug, Deserialize)]
struct OldRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Depth")]
    depth: Option<i64>,
    #[serde(rename = "Num_Children")]
    num_children: Option<u64>,
    #[serde(rename = "Max_Num_Descendant_Diff")]
    max_descendant_diff: Option<u64>,
}

/// Old snapshot metrics keyed by id. A repeated id keeps its last row.
#[derive(Debug, Clone, Default)]
pub struct OldSnapshot {
    metrics: AHashMap<String, ParentMetrics>,
}

impl OldSnapshot {
    pub fn read(path: &Path) -> Result<Self> {
        let rows: Vec<OldRow> = read_rows(
            path,
            &[
                hierarchy::ID,
                hierarchy::DEPTH,
                hierarchy::NUM_CHILDREN,
                hierarchy::MAX_DESCENDANT_DIFF,
            ],
        )?;
        let mut snapshot = Self::default();
        for row in rows {
            snapshot.insert(
                row.id,
                ParentMetrics {
                    depth: row.depth.unwrap_or(UNREACHABLE_DEPTH),
                    num_children: row.num_children.unwrap_or(0),
                    max_descendant_diff: row.max_descendant_diff.unwrap_or(0),
                },
            );
        }
        Ok(snapshot)
    }

    pub fn from_rows(rows: &[HierarchyRow]) -> Self {
        let mut snapshot = Self::default();
        for row in rows {
            snapshot.insert(
                row.id.clone(),
                ParentMetrics {
                    depth: row.depth,
                    num_children: row.num_children as u64,
                    max_descendant_diff: row.max_descendant_diff,
                },
            );
        }
        snapshot
    }

    pub fn insert(&mut self, id: String, metrics: ParentMetrics) {
        self.metrics.insert(id, metrics);
    }

    pub fn get(&self, id: &str) -> Option<&ParentMetrics> {
        self.metrics.get(id)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// A node of the new snapshot with its parent ids in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub id: String,
    pub label: String,
    pub parent_ids: Vec<String>,
}

impl From<&ParentRow> for NewNode {
    fn from(row: &ParentRow) -> Self {
        Self {
            id: row.node_id.clone(),
            label: row.node_label.clone(),
            parent_ids: split_parent_ids(&row.parent_ids),
        }
    }
}

/// Splits a parent-id cell on `;`, `,` and whitespace.
pub fn split_parent_ids(cell: &str) -> Vec<String> {
    cell.split(|c: char| c == ';' || c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinedRow {
    #[serde(rename = "Node_ID")]
    pub node_id: String,
    #[serde(rename = "Node_Label")]
    pub node_label: String,
    /// Resolved parents only, comma-joined.
    #[serde(rename = "Parent_IDs")]
    pub parent_ids: String,
    #[serde(rename = "Parent_Children_Count (min)")]
    pub min_parent_children: Option<u64>,
    #[serde(rename = "Parent_Max_Desc_Diff")]
    pub max_parent_diff: Option<u64>,
    /// Depth of the last resolved parent in listing order.
    #[serde(rename = "Parent_Depth")]
    pub parent_depth: Option<i64>,
}

pub fn join_node(node: &NewNode, old: &OldSnapshot) -> JoinedRow {
    let mut resolved: Vec<&str> = Vec::new();
    let mut min_children: Option<u64> = None;
    let mut max_diff: Option<u64> = None;
    let mut depth: Option<i64> = None;

    for parent in &node.parent_ids {
        let Some(metrics) = old.get(parent) else {
            continue;
        };
        resolved.push(parent);
        let children = metrics.num_children;
        let diff = metrics.max_descendant_diff;
        min_children = Some(min_children.map_or(children, |m| m.min(children)));
        max_diff = Some(max_diff.map_or(diff, |m| m.max(diff)));
        depth = Some(metrics.depth);
    }

    JoinedRow {
        node_id: node.id.clone(),
        node_label: node.label.clone(),
        parent_ids: resolved.join(","),
        min_parent_children: min_children,
        max_parent_diff: max_diff,
        parent_depth: depth,
    }
}

pub fn join_parents(nodes: &[NewNode], old: &OldSnapshot) -> Vec<JoinedRow> {
    let rows: Vec<JoinedRow> = nodes.iter().map(|node| join_node(node, old)).collect();
    let unresolved = rows.iter().filter(|r| r.parent_ids.is_empty()).count();
    tracing::debug!(
        nodes = rows.len(),
        unresolved,
        old_nodes = old.len(),
        "joined new nodes against the old snapshot"
    );
    rows
}

pub fn render_joined(path: &Path, rows: &[JoinedRow]) -> Result<Vec<u8>> {
    render_rows(path, &HEADERS, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontoscope_graph::OntologyError;

    fn metrics(depth: i64, num_children: u64, max_descendant_diff: u64) -> ParentMetrics {
        ParentMetrics {
            depth,
            num_children,
            max_descendant_diff,
        }
    }

    fn old() -> OldSnapshot {
        let mut old = OldSnapshot::default();
        old.insert("P1".into(), metrics(2, 5, 7));
        old.insert("P2".into(), metrics(4, 3, 1));
        old
    }

    fn node(parents: &[&str]) -> NewNode {
        NewNode {
            id: "N".into(),
            label: "new".into(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn splits_on_every_list_separator() {
        assert_eq!(split_parent_ids("A; B,C  D"), vec!["A", "B", "C", "D"]);
        assert!(split_parent_ids(" ;, ").is_empty());
    }

    #[test]
    fn aggregates_over_resolved_parents() {
        let row = join_node(&node(&["P1", "GONE", "P2"]), &old());
        assert_eq!(row.parent_ids, "P1,P2");
        assert_eq!(row.min_parent_children, Some(3));
        assert_eq!(row.max_parent_diff, Some(7));
        assert_eq!(row.parent_depth, Some(4));

        let reversed = join_node(&node(&["P2", "P1"]), &old());
        assert_eq!(reversed.parent_depth, Some(2));
    }

    #[test]
    fn unresolved_parents_leave_every_metric_empty() {
        let row = join_node(&node(&["GONE", "ALSO_GONE"]), &old());
        assert_eq!(row.parent_ids, "");
        assert_eq!(row.min_parent_children, None);
        assert_eq!(row.max_parent_diff, None);
        assert_eq!(row.parent_depth, None);

        let bytes = render_joined(Path::new("j.csv"), &[row]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Node_ID,Node_Label,Parent_IDs,Parent_Children_Count (min),Parent_Max_Desc_Diff,Parent_Depth\nN,new,,,,\n"
        );
    }

    #[test]
    fn empty_old_cells_count_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.csv");
        std::fs::write(
            &path,
            "ID,Label,Depth,Num_Children,Max_Num_Descendant_Diff\nP1,x,3,,\nP2,y,,4,2\nP1,x,1,6,\n",
        )
        .unwrap();
        let old = OldSnapshot::read(&path).unwrap();
        assert_eq!(old.len(), 2);
        assert_eq!(old.get("P1"), Some(&metrics(1, 6, 0)));
        assert_eq!(old.get("P2"), Some(&metrics(UNREACHABLE_DEPTH, 4, 2)));
    }

    #[test]
    fn padded_old_numbers_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.csv");
        std::fs::write(
            &path,
            "ID,Depth,Num_Children,Max_Num_Descendant_Diff\n P1 , 2, 3 ,1 \n",
        )
        .unwrap();
        let old = OldSnapshot::read(&path).unwrap();
        assert_eq!(old.get("P1"), Some(&metrics(2, 3, 1)));
    }

    #[test]
    fn old_table_without_children_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.csv");
        std::fs::write(&path, "ID,Depth,Max_Num_Descendant_Diff\nP1,0,0\n").unwrap();
        let err = OldSnapshot::read(&path).unwrap_err();
        assert!(
            matches!(err, OntologyError::MissingKey { ref key, .. } if key == "Num_Children")
        );
    }

    #[test]
    fn parent_rows_feed_the_joiner() {
        let row = ParentRow {
            node_id: "N".into(),
            node_label: "new".into(),
            parent_ids: "P2; P1".into(),
            parent_labels: String::new(),
            sibling_ids: String::new(),
            sibling_labels: String::new(),
            num_parents: 2,
            num_siblings: 0,
        };
        let joined = join_parents(&[NewNode::from(&row)], &old());
        assert_eq!(joined[0].parent_ids, "P2,P1");
    }
}
