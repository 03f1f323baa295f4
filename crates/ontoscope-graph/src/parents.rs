//! Parent and sibling report for a list of target nodes.

use crate::analysis::NodeRef;
use crate::config::AnalysisConfig;
use crate::index::HierarchyIndex;
use crate::model::{Graph, NodeLabels};
use crate::siblings::siblings_of;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentReportEntry {
    pub node: NodeRef,
    /// Edge order.
    pub parents: Vec<NodeRef>,
    /// Sorted by id.
    pub siblings: Vec<NodeRef>,
}

/// One entry per target, in target order. Ids unknown to `graph` get the
/// placeholder label and no relations.
pub fn parent_report(
    graph: &Graph,
    targets: &[String],
    config: &AnalysisConfig,
) -> Vec<ParentReportEntry> {
    let labels = graph.labels();
    let index = HierarchyIndex::build(graph, &config.hierarchy_filter());
    let lookup = |id: &str, labels: &NodeLabels| NodeRef {
        id: id.to_string(),
        label: labels.label_or(id, &config.unknown_label).to_string(),
    };

    let mut unknown = 0usize;
    let report: Vec<ParentReportEntry> = targets
        .iter()
        .map(|target| {
            if !labels.contains(target) {
                unknown += 1;
            }
            ParentReportEntry {
                node: lookup(target, &labels),
                parents: index
                    .parents_of(target)
                    .into_iter()
                    .map(|p| lookup(p, &labels))
                    .collect(),
                siblings: siblings_of(&index, target)
                    .into_iter()
                    .map(|s| lookup(s, &labels))
                    .collect(),
            }
        })
        .collect();

    if unknown > 0 {
        tracing::warn!(unknown, "some target ids have no node entry in the snapshot");
    }
    report
}
