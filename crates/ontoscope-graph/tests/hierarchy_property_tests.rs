use std::collections::BTreeSet;

use ontoscope_graph::compare::{parse_id_list, render_id_list};
use ontoscope_graph::depth::compute_depths;
use ontoscope_graph::descendants::count_descendants;
use ontoscope_graph::subgraph::extract_subgraph;
use ontoscope_graph::{Graph, HierarchyIndex, NodeLabels, RelationFilter, SnapshotDiff};
use proptest::prelude::*;

const MAX_NODES: usize = 24;

fn node_id(i: usize) -> String {
    format!("N{i}")
}

/// Node count plus (child, parent) pairs; `acyclic` orients every edge from a
/// higher index to a lower one.
fn hierarchy_strategy(acyclic: bool) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..=MAX_NODES).prop_flat_map(move |n| {
        let edges = prop::collection::vec((0..n, 0..n), 0..(n * 3));
        edges.prop_map(move |pairs| {
            let pairs = pairs
                .into_iter()
                .filter_map(|(a, b)| {
                    if !acyclic {
                        Some((a, b))
                    } else if a == b {
                        None
                    } else {
                        Some((a.max(b), a.min(b)))
                    }
                })
                .collect();
            (n, pairs)
        })
    })
}

fn build_graph(n: usize, edges: &[(usize, usize)]) -> Graph {
    let mut g = Graph::new();
    for i in 0..n {
        g.add_node(&node_id(i), None);
    }
    for &(child, parent) in edges {
        g.add_edge(&node_id(child), "is_a", &node_id(parent));
    }
    g
}

/// Bellman-Ford style relaxation from every parentless node.
fn reference_depths(n: usize, edges: &[(usize, usize)]) -> Vec<Option<u32>> {
    let mut dist: Vec<Option<u32>> = (0..n)
        .map(|i| {
            if edges.iter().any(|&(c, _)| c == i) {
                None
            } else {
                Some(0)
            }
        })
        .collect();
    for _ in 0..n {
        for &(child, parent) in edges {
            if let Some(d) = dist[parent] {
                if dist[child].map_or(true, |cur| cur > d + 1) {
                    dist[child] = Some(d + 1);
                }
            }
        }
    }
    dist
}

/// Fixpoint closure: everything reachable from `start` in one or more steps.
fn reference_descendants(start: usize, edges: &[(usize, usize)]) -> BTreeSet<usize> {
    let mut reached: BTreeSet<usize> = BTreeSet::new();
    loop {
        let before = reached.len();
        for &(child, parent) in edges {
            if parent == start || reached.contains(&parent) {
                reached.insert(child);
            }
        }
        if reached.len() == before {
            break;
        }
    }
    reached.remove(&start);
    reached
}

fn labels(ids: &BTreeSet<String>) -> NodeLabels {
    let mut labels = NodeLabels::default();
    for id in ids {
        labels.insert(id, None);
    }
    labels
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn bfs_depth_is_the_shortest_root_distance((n, edges) in hierarchy_strategy(true)) {
        let g = build_graph(n, &edges);
        let index = HierarchyIndex::build(&g, &RelationFilter::predicate("is_a"));
        let depths = compute_depths(&index);
        let expected = reference_depths(n, &edges);
        for (i, want) in expected.iter().enumerate() {
            prop_assert_eq!(depths.of(&index, &node_id(i)), *want, "node {}", i);
        }
    }

    #[test]
    fn descendant_counts_match_the_closure((n, edges) in hierarchy_strategy(false)) {
        let g = build_graph(n, &edges);
        let index = HierarchyIndex::build(&g, &RelationFilter::predicate("is_a"));
        let counts = count_descendants(&index);
        for i in 0..n {
            let expected = reference_descendants(i, &edges).len() as u64;
            prop_assert_eq!(counts.of(&index, &node_id(i)), expected, "node {}", i);
        }
    }

    #[test]
    fn subgraph_extraction_is_idempotent(
        (n, edges) in hierarchy_strategy(false),
        root in 0usize..MAX_NODES,
    ) {
        let g = build_graph(n, &edges);
        let root = node_id(root % n);
        for filter in [RelationFilter::Any, RelationFilter::predicate("is_a")] {
            let once = extract_subgraph(&g, &root, &filter);
            let twice = extract_subgraph(&once, &root, &filter);
            prop_assert_eq!(&once, &twice);
        }
    }

    #[test]
    fn snapshot_diff_partitions_the_union(
        a in prop::collection::btree_set("[A-F]{1,2}", 0..12),
        b in prop::collection::btree_set("[A-F]{1,2}", 0..12),
    ) {
        let diff = SnapshotDiff::compare(&labels(&a), &labels(&b));
        let union: BTreeSet<String> = a.union(&b).cloned().collect();

        prop_assert!(diff.only_in_first.is_disjoint(&diff.only_in_second));
        prop_assert!(diff.only_in_first.is_disjoint(&diff.common));
        prop_assert!(diff.only_in_second.is_disjoint(&diff.common));

        let mut rebuilt = diff.only_in_first.clone();
        rebuilt.extend(diff.only_in_second.iter().cloned());
        rebuilt.extend(diff.common.iter().cloned());
        prop_assert_eq!(&rebuilt, &union);

        let expected_first: BTreeSet<String> = union.difference(&b).cloned().collect();
        prop_assert_eq!(&diff.only_in_first, &expected_first);
    }

    #[test]
    fn id_lists_round_trip(ids in prop::collection::btree_set("[A-Z]{2}:[0-9]{1,7}", 0..40)) {
        let text = render_id_list(ids.iter().map(String::as_str));
        let reloaded: BTreeSet<String> = parse_id_list(&text).into_iter().collect();
        prop_assert_eq!(&reloaded, &ids);
        prop_assert!(!text.ends_with(','));
        let order = parse_id_list(&text);
        let sorted: Vec<String> = ids.iter().cloned().collect();
        prop_assert_eq!(order, sorted);
    }
}
