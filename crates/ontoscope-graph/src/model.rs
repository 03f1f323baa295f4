//! OBO-graph snapshot model.
//!
//! Mirrors the JSON container shape `{ "graphs": [ { "nodes": [...], "edges": [...] } ] }`.
//! Fields the engine does not interpret (`meta`, `type`, graph `id`, …) are
//! captured in `extra` maps so that a snapshot written back out keeps them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Top-level snapshot container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub graphs: Vec<Graph>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One ontology graph: node entries plus edges, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "lbl", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "pred", default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    #[serde(rename = "obj", default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Node {
    pub fn new(id: &str, label: Option<&str>) -> Self {
        Self {
            id: Some(id.to_string()),
            label: label.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// The node id, treating an empty string like an absent one.
    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Edge {
    pub fn new(subject: &str, predicate: &str, object: &str) -> Self {
        Self {
            subject: Some(subject.to_string()),
            predicate: Some(predicate.to_string()),
            object: Some(object.to_string()),
            extra: Map::new(),
        }
    }

    /// Child end of the edge (`sub`), if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        non_empty(&self.subject)
    }

    /// Parent end of the edge (`obj`), if present and non-empty.
    pub fn object(&self) -> Option<&str> {
        non_empty(&self.object)
    }

    pub fn predicate(&self) -> Option<&str> {
        self.predicate.as_deref()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str, label: Option<&str>) -> &mut Self {
        self.nodes.push(Node::new(id, label));
        self
    }

    pub fn add_edge(&mut self, subject: &str, predicate: &str, object: &str) -> &mut Self {
        self.edges.push(Edge::new(subject, predicate, object));
        self
    }

    /// Distinct node-entry ids in first-occurrence order.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter_map(Node::id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn labels(&self) -> NodeLabels {
        let mut labels = NodeLabels::default();
        labels.extend_from(self);
        labels
    }
}

impl Document {
    pub fn new(graphs: Vec<Graph>) -> Self {
        Self {
            graphs,
            extra: Map::new(),
        }
    }

    /// The graph single-graph tools operate on.
    pub fn primary_graph(&self) -> Option<&Graph> {
        self.graphs.first()
    }

    /// A copy of this document whose first graph's nodes and edges are
    /// replaced by `graph`'s. Every other field passes through unchanged.
    pub fn with_primary_graph(&self, graph: Graph) -> Document {
        let mut out = self.clone();
        match out.graphs.first_mut() {
            Some(first) => {
                first.nodes = graph.nodes;
                first.edges = graph.edges;
            }
            None => out.graphs.push(graph),
        }
        out
    }

    /// Labels of node entries across every graph in the document.
    pub fn node_labels(&self) -> NodeLabels {
        let mut labels = NodeLabels::default();
        for graph in &self.graphs {
            labels.extend_from(graph);
        }
        labels
    }
}

/// Pre-built id → label lookup. The first node entry for an id wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLabels {
    labels: BTreeMap<String, Option<String>>,
}

impl NodeLabels {
    pub fn insert(&mut self, id: &str, label: Option<&str>) {
        if !self.labels.contains_key(id) {
            self.labels
                .insert(id.to_string(), label.map(str::to_string));
        }
    }

    fn extend_from(&mut self, graph: &Graph) {
        for node in &graph.nodes {
            match node.id() {
                Some(id) => self.insert(id, node.label()),
                None => tracing::warn!("skipping node entry without an `id`"),
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.labels.contains_key(id)
    }

    /// The label of a known node, `None` for unknown ids and unlabeled nodes.
    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).and_then(|l| l.as_deref())
    }

    pub fn label_or<'a>(&'a self, id: &str, placeholder: &'a str) -> &'a str {
        self.label(id).unwrap_or(placeholder)
    }

    /// Known ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let value = json!({
            "meta": {"version": "2025-10"},
            "graphs": [{
                "id": "hp",
                "nodes": [{"id": "HP:1", "lbl": "All", "type": "CLASS"}],
                "edges": [{"sub": "HP:2", "pred": "is_a", "obj": "HP:1"}]
            }]
        });
        let doc: Document = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(doc.graphs[0].nodes[0].label(), Some("All"));
        assert_eq!(doc.graphs[0].extra["id"], json!("hp"));
        assert_eq!(serde_json::to_value(&doc).unwrap(), value);
    }

    #[test]
    fn graphs_nodes_and_edges_are_required() {
        assert!(serde_json::from_value::<Document>(json!({"nodes": []})).is_err());
        assert!(
            serde_json::from_value::<Document>(json!({"graphs": [{"nodes": []}]})).is_err()
        );
    }

    #[test]
    fn empty_ids_are_treated_as_absent() {
        let node: Node = serde_json::from_value(json!({"id": "", "lbl": "x"})).unwrap();
        assert_eq!(node.id(), None);
        let edge: Edge = serde_json::from_value(json!({"sub": "A", "pred": "is_a"})).unwrap();
        assert_eq!(edge.subject(), Some("A"));
        assert_eq!(edge.object(), None);
    }

    #[test]
    fn first_label_wins_and_labels_span_all_graphs() {
        let mut g1 = Graph::new();
        g1.add_node("A", Some("first")).add_node("A", Some("second"));
        let mut g2 = Graph::new();
        g2.add_node("B", None);
        let doc = Document::new(vec![g1, g2]);

        let labels = doc.node_labels();
        assert_eq!(labels.label("A"), Some("first"));
        assert!(labels.contains("B"));
        assert_eq!(labels.label_or("B", "Unknown"), "Unknown");
        assert_eq!(labels.label_or("Z", "Unknown"), "Unknown");
        assert_eq!(labels.ids().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn node_ids_are_deduplicated_in_document_order() {
        let mut g = Graph::new();
        g.add_node("B", None).add_node("A", None).add_node("B", None);
        assert_eq!(g.node_ids(), vec!["B", "A"]);
    }

    #[test]
    fn with_primary_graph_replaces_only_nodes_and_edges() {
        let mut g = Graph::new();
        g.add_node("A", None).add_edge("A", "is_a", "R");
        g.extra.insert("id".into(), json!("hp"));
        let mut doc = Document::new(vec![g, Graph::new()]);
        doc.extra.insert("meta".into(), json!(1));

        let mut replacement = Graph::new();
        replacement.add_node("R", None);
        let out = doc.with_primary_graph(replacement);

        assert_eq!(out.graphs.len(), 2);
        assert_eq!(out.graphs[0].nodes.len(), 1);
        assert!(out.graphs[0].edges.is_empty());
        assert_eq!(out.graphs[0].extra["id"], json!("hp"));
        assert_eq!(out.extra["meta"], json!(1));
        assert_eq!(doc.graphs[0].nodes.len(), 1);
        assert_eq!(doc.graphs[0].edges.len(), 1);
    }
}
