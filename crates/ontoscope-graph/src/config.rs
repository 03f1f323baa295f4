use crate::index::RelationFilter;

/// Reserved predicate for subsumption edges.
pub const HIERARCHY_PREDICATE: &str = "is_a";

/// Rendered in place of a missing label.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Knobs shared by every analysis in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Edges with this predicate form the hierarchy.
    pub predicate: String,
    pub unknown_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            predicate: HIERARCHY_PREDICATE.to_string(),
            unknown_label: UNKNOWN_LABEL.to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_predicate(mut self, predicate: &str) -> Self {
        self.predicate = predicate.to_string();
        self
    }

    pub fn with_unknown_label(mut self, label: &str) -> Self {
        self.unknown_label = label.to_string();
        self
    }

    pub fn hierarchy_filter(&self) -> RelationFilter {
        RelationFilter::predicate(&self.predicate)
    }
}
