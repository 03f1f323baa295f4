//! Per-node analysis pass: one [`NodeRecord`] per node entry.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::config::AnalysisConfig;
use crate::deficit::max_descendant_deficit;
use crate::depth::compute_depths;
use crate::descendants::count_descendants;
use crate::index::HierarchyIndex;
use crate::model::{Graph, NodeLabels};

/// Depth written for nodes no root reaches.
pub const UNREACHABLE_DEPTH: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    #[serde(serialize_with = "serialize_depth")]
    pub depth: Option<u32>,
    pub parents: Vec<NodeRef>,
    pub children: Vec<NodeRef>,
    pub num_children: usize,
    pub num_descendants: u64,
    pub max_descendant_diff: u64,
}

fn serialize_depth<S: Serializer>(depth: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(depth_value(*depth))
}

/// Depth as a table value, with the unreachable sentinel.
pub fn depth_value(depth: Option<u32>) -> i64 {
    depth.map_or(UNREACHABLE_DEPTH, i64::from)
}

impl NodeRecord {
    pub fn num_parents(&self) -> usize {
        self.parents.len()
    }
}

/// Node counts per depth of one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepthSummary {
    pub node_count: usize,
    pub root_count: usize,
    pub unreachable_count: usize,
    pub min_depth: Option<i64>,
    pub max_depth: Option<i64>,
    /// Keyed by table depth, so unreachable nodes sit under `-1`.
    pub nodes_per_depth: BTreeMap<i64, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyAnalysis {
    /// Sorted by depth (unreachable first), then id.
    pub records: Vec<NodeRecord>,
    pub summary: DepthSummary,
}

fn node_ref(id: &str, labels: &NodeLabels, config: &AnalysisConfig) -> NodeRef {
    NodeRef {
        id: id.to_string(),
        label: labels.label_or(id, &config.unknown_label).to_string(),
    }
}

/// Runs every metric over `graph` and assembles the per-node records.
pub fn analyze(graph: &Graph, config: &AnalysisConfig) -> HierarchyAnalysis {
    let labels = graph.labels();
    let index = HierarchyIndex::build(graph, &config.hierarchy_filter());
    let depths = compute_depths(&index);
    let counts = count_descendants(&index);

    let mut records: Vec<NodeRecord> = index
        .entries()
        .iter()
        .map(|&handle| {
            let id = index.id(handle);
            let parents = index.parents(handle);
            let children = index.children(handle);
            NodeRecord {
                id: id.to_string(),
                label: labels.label_or(id, &config.unknown_label).to_string(),
                depth: depths.get(handle),
                parents: parents
                    .iter()
                    .map(|&p| node_ref(index.id(p), &labels, config))
                    .collect(),
                children: children
                    .iter()
                    .map(|&c| node_ref(index.id(c), &labels, config))
                    .collect(),
                num_children: children.len(),
                num_descendants: counts.get(handle),
                max_descendant_diff: max_descendant_deficit(&index, &counts, handle),
            }
        })
        .collect();
    records.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.id.cmp(&b.id)));

    let summary = summarize(&records, depths.roots().len());
    tracing::info!(
        nodes = summary.node_count,
        roots = summary.root_count,
        unreachable = summary.unreachable_count,
        "analyzed hierarchy"
    );
    HierarchyAnalysis { records, summary }
}

fn summarize(records: &[NodeRecord], root_count: usize) -> DepthSummary {
    let mut summary = DepthSummary {
        node_count: records.len(),
        root_count,
        ..DepthSummary::default()
    };
    for record in records {
        *summary
            .nodes_per_depth
            .entry(depth_value(record.depth))
            .or_insert(0) += 1;
        if record.depth.is_none() {
            summary.unreachable_count += 1;
        }
    }
    summary.min_depth = summary.nodes_per_depth.keys().next().copied();
    summary.max_depth = summary.nodes_per_depth.keys().next_back().copied();
    summary
}
