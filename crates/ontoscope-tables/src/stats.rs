//! Per-depth statistics over numeric hierarchy-table columns.

use std::collections::BTreeMap;
use std::path::Path;

use ontoscope_graph::{OntologyError, Result};

use crate::hierarchy;
use crate::table::{render_rows, RawTable};

pub const DEFAULT_COLUMNS: [&str; 4] = [
    hierarchy::NUM_DESCENDANTS,
    hierarchy::MAX_DESCENDANT_DIFF,
    hierarchy::NUM_CHILDREN,
    hierarchy::NUM_PARENTS,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl ColumnStats {
    /// `None` when there is nothing to summarize.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            mean: sorted.iter().sum::<f64>() / n as f64,
            median,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepthGroup {
    pub depth: i64,
    pub num_nodes: usize,
    /// Parallel to the aggregator's columns.
    pub columns: Vec<Option<ColumnStats>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthAggregator {
    columns: Vec<String>,
}

impl Default for DepthAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect())
    }
}

impl DepthAggregator {
    /// An empty column list falls back to the default columns.
    pub fn new(columns: Vec<String>) -> Self {
        if columns.is_empty() {
            return Self::default();
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![hierarchy::DEPTH.to_string(), "Num_Nodes".to_string()];
        for column in &self.columns {
            for stat in ["min", "max", "mean", "median"] {
                headers.push(format!("{column}_{stat}"));
            }
        }
        headers
    }

    /// Groups sorted by depth. Empty cells are skipped; anything else that
    /// is not a finite number is rejected.
    pub fn aggregate(&self, table: &RawTable, path: &Path) -> Result<Vec<DepthGroup>> {
        let depth_column = table
            .column(hierarchy::DEPTH)
            .ok_or_else(|| OntologyError::missing_key(path, hierarchy::DEPTH))?;
        let tracked: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|name| {
                let column = table.column(name);
                if column.is_none() {
                    tracing::warn!(path = %path.display(), column = %name, "column not in table");
                }
                column
            })
            .collect();

        let mut groups: BTreeMap<i64, (usize, Vec<Vec<f64>>)> = BTreeMap::new();
        for (i, row) in table.rows().enumerate() {
            let line = i + 2;
            let depth_cell = RawTable::cell(row, depth_column).unwrap_or_default();
            let depth: i64 = depth_cell.parse().map_err(|_| {
                OntologyError::malformed(
                    path,
                    format!("line {line}: Depth `{depth_cell}` is not an integer"),
                )
            })?;
            let (count, values) = groups
                .entry(depth)
                .or_insert_with(|| (0, vec![Vec::new(); tracked.len()]));
            *count += 1;

            for (slot, column) in tracked.iter().enumerate() {
                let Some(cell) = column.and_then(|c| RawTable::cell(row, c)) else {
                    continue;
                };
                let value = cell
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        OntologyError::malformed(
                            path,
                            format!(
                                "line {line}: {} `{cell}` is not a number",
                                self.columns[slot]
                            ),
                        )
                    })?;
                values[slot].push(value);
            }
        }

        tracing::debug!(groups = groups.len(), rows = table.len(), "aggregated depths");
        Ok(groups
            .into_iter()
            .map(|(depth, (num_nodes, values))| DepthGroup {
                depth,
                num_nodes,
                columns: values.iter().map(|v| ColumnStats::from_values(v)).collect(),
            })
            .collect())
    }

    pub fn render(&self, path: &Path, groups: &[DepthGroup]) -> Result<Vec<u8>> {
        let headers = self.headers();
        let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
        let rows: Vec<Vec<String>> = groups
            .iter()
            .map(|group| {
                let mut row = vec![group.depth.to_string(), group.num_nodes.to_string()];
                for stats in &group.columns {
                    match stats {
                        Some(s) => row.extend([s.min, s.max, s.mean, s.median].map(|v| v.to_string())),
                        None => row.extend(std::iter::repeat(String::new()).take(4)),
                    }
                }
                row
            })
            .collect();
        render_rows(path, &headers, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn aggregator(columns: &[&str]) -> DepthAggregator {
        DepthAggregator::new(columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn stats_of_even_and_odd_samples() {
        let odd = ColumnStats::from_values(&[3.0, 1.0, 2.0]).unwrap();
        assert_relative_eq!(odd.median, 2.0);
        assert_relative_eq!(odd.mean, 2.0);
        let even = ColumnStats::from_values(&[4.0, 1.0, 2.0, 10.0]).unwrap();
        assert_relative_eq!(even.min, 1.0);
        assert_relative_eq!(even.max, 10.0);
        assert_relative_eq!(even.mean, 4.25);
        assert_relative_eq!(even.median, 3.0);
        assert!(ColumnStats::from_values(&[]).is_none());
    }

    #[test]
    fn empty_cells_are_ignored() {
        let t = table(&["Depth", "X"], &[&["1", ""], &["1", "5"]]);
        let groups = aggregator(&["X"]).aggregate(&t, Path::new("t.csv")).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].num_nodes, 2);
        let x = groups[0].columns[0].unwrap();
        assert_relative_eq!(x.min, 5.0);
        assert_relative_eq!(x.max, 5.0);
        assert_relative_eq!(x.mean, 5.0);
        assert_relative_eq!(x.median, 5.0);
    }

    #[test]
    fn groups_sort_by_depth_with_unreachable_first() {
        let t = table(
            &["Depth", "X"],
            &[&["2", "1"], &["-1", "9"], &["0", "4"], &["2", "3"]],
        );
        let groups = aggregator(&["X"]).aggregate(&t, Path::new("t.csv")).unwrap();
        let depths: Vec<i64> = groups.iter().map(|g| g.depth).collect();
        assert_eq!(depths, vec![-1, 0, 2]);
        assert_relative_eq!(groups[2].columns[0].unwrap().mean, 2.0);
    }

    #[test]
    fn groups_without_values_render_empty_cells() {
        let t = table(&["Depth", "X"], &[&["0", ""], &["1", "2"], &["1", "3"]]);
        let agg = aggregator(&["X"]);
        let groups = agg.aggregate(&t, Path::new("t.csv")).unwrap();
        assert!(groups[0].columns[0].is_none());
        let text = String::from_utf8(agg.render(Path::new("s.csv"), &groups).unwrap()).unwrap();
        assert_eq!(
            text,
            "Depth,Num_Nodes,X_min,X_max,X_mean,X_median\n0,1,,,,\n1,2,2,3,2.5,2.5\n"
        );
    }

    #[test]
    fn absent_columns_yield_no_stats() {
        let t = table(&["Depth"], &[&["0"]]);
        let groups = aggregator(&["Missing"]).aggregate(&t, Path::new("t.csv")).unwrap();
        assert_eq!(groups[0].columns, vec![None]);
    }

    #[test]
    fn non_numeric_cells_are_malformed() {
        let t = table(&["Depth", "X"], &[&["0", "1"], &["0", "lots"]]);
        let err = aggregator(&["X"]).aggregate(&t, Path::new("t.csv")).unwrap_err();
        assert!(matches!(err, OntologyError::MalformedInput { .. }));
        assert!(err.to_string().contains("line 3"), "{err}");

        let t = table(&["Depth"], &[&["deep"]]);
        assert!(aggregator(&["X"]).aggregate(&t, Path::new("t.csv")).is_err());
    }

    #[test]
    fn depth_column_is_required() {
        let t = table(&["X"], &[&["1"]]);
        let err = aggregator(&["X"]).aggregate(&t, Path::new("t.csv")).unwrap_err();
        assert!(matches!(err, OntologyError::MissingKey { .. }));
    }

    #[test]
    fn default_columns_and_headers() {
        let agg = DepthAggregator::new(Vec::new());
        assert_eq!(agg.columns().len(), 4);
        let headers = agg.headers();
        assert_eq!(headers.len(), 2 + 4 * 4);
        assert_eq!(headers[2], "Num_Descendants_min");
        assert_eq!(headers[17], "Num_Parents_median");
    }
}
