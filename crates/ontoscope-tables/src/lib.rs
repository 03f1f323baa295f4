//! Tabular side of Ontoscope.
//!
//! Renders analysis results as CSV tables, reads them back, and runs the two
//! table-level operations: joining new nodes' parents against an older
//! snapshot ([`join`]) and per-depth statistics ([`stats`]).
//!
//! Rendering returns bytes; callers stage them with
//! [`ontoscope_graph::io::StagedWrites`] so a failing command writes nothing.

pub mod hierarchy;
pub mod join;
pub mod parents;
pub mod stats;
pub mod table;

pub use hierarchy::HierarchyRow;
pub use join::{join_parents, JoinedRow, NewNode, OldSnapshot, ParentMetrics};
pub use parents::ParentRow;
pub use stats::{ColumnStats, DepthAggregator, DepthGroup, DEFAULT_COLUMNS};
pub use table::RawTable;
