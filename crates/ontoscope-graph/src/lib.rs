//! Ontoscope hierarchy engine.
//!
//! Structural metrics over OBO-graph ontology snapshots whose hierarchy is a
//! single subsumption relation (`is_a` by default):
//!
//! - [`index`]: child → parents / parent → children adjacency
//! - [`depth`]: breadth-first root distance
//! - [`descendants`]: distinct transitive descendant counts
//! - [`siblings`] and [`deficit`]: sibling sets and the sibling-relative
//!   descendant deficit
//! - [`subgraph`]: extraction of a root and everything below it
//! - [`compare`]: membership diff between two snapshots, node-id lists
//! - [`analysis`] / [`parents`]: per-node records and parent/sibling reports
//!
//! Nothing here mutates a loaded snapshot; every derived structure is rebuilt
//! per run.

pub mod analysis;
pub mod compare;
pub mod config;
pub mod deficit;
pub mod depth;
pub mod descendants;
pub mod error;
pub mod index;
pub mod io;
pub mod model;
pub mod parents;
pub mod siblings;
pub mod subgraph;

pub use analysis::{analyze, HierarchyAnalysis, NodeRecord, NodeRef, UNREACHABLE_DEPTH};
pub use compare::SnapshotDiff;
pub use config::{AnalysisConfig, HIERARCHY_PREDICATE, UNKNOWN_LABEL};
pub use error::{OntologyError, Result};
pub use index::{HierarchyIndex, RelationFilter};
pub use model::{Document, Edge, Graph, Node, NodeLabels};
