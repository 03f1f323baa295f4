//! One function per subcommand. Each loads its inputs, renders every output
//! in memory, stages the files and commits them together at the end.

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ontoscope_graph::compare::{read_id_list, render_id_list};
use ontoscope_graph::io::{
    load_document, primary_graph, render_document, write_atomic, StagedWrites,
};
use ontoscope_graph::parents::parent_report;
use ontoscope_graph::subgraph::extract_subgraph;
use ontoscope_graph::{analyze, AnalysisConfig, NodeLabels, RelationFilter, SnapshotDiff};
use ontoscope_tables::hierarchy::{hierarchy_rows, render_hierarchy};
use ontoscope_tables::join::render_joined;
use ontoscope_tables::parents::{parent_rows, read_parent_report, render_parent_report};
use ontoscope_tables::{join_parents, DepthAggregator, NewNode, OldSnapshot, RawTable};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string())
}

/// `only_in_<stem>.txt` for both sides; equal stems get a positional suffix.
fn id_list_paths(first: &Path, second: &Path, out_dir: &Path) -> (PathBuf, PathBuf) {
    let (a, b) = (file_stem(first), file_stem(second));
    let (a, b) = if a == b {
        (format!("{a}_1"), format!("{b}_2"))
    } else {
        (a, b)
    };
    (
        out_dir.join(format!("only_in_{a}.txt")),
        out_dir.join(format!("only_in_{b}.txt")),
    )
}

fn print_only_in(name: &str, ids: &BTreeSet<String>, labels: &NodeLabels, config: &AnalysisConfig) {
    println!(
        "{} {}: {}",
        "Only in".yellow().bold(),
        name.bold(),
        ids.len()
    );
    for id in ids {
        println!("  {} {}", id, labels.label_or(id, &config.unknown_label).dimmed());
    }
}

pub fn cmd_compare(
    first: &Path,
    second: &Path,
    out_dir: &Path,
    config: &AnalysisConfig,
) -> Result<()> {
    let first_doc = load_document(first)
        .with_context(|| format!("loading first snapshot {}", first.display()))?;
    let second_doc = load_document(second)
        .with_context(|| format!("loading second snapshot {}", second.display()))?;
    let first_labels = first_doc.node_labels();
    let second_labels = second_doc.node_labels();
    let diff = SnapshotDiff::compare(&first_labels, &second_labels);

    println!(
        "{} {} ({} nodes) vs {} ({} nodes)",
        "Comparing".green().bold(),
        file_name(first),
        first_labels.len(),
        file_name(second),
        second_labels.len()
    );
    print_only_in(&file_name(first), &diff.only_in_first, &first_labels, config);
    print_only_in(&file_name(second), &diff.only_in_second, &second_labels, config);
    println!("{} {}", "Common:".cyan(), diff.common.len());

    let (first_out, second_out) = id_list_paths(first, second, out_dir);
    let mut writes = StagedWrites::new();
    for (ids, out) in [(&diff.only_in_first, &first_out), (&diff.only_in_second, &second_out)] {
        if ids.is_empty() {
            continue;
        }
        let text = render_id_list(ids.iter().map(String::as_str));
        if writes.is_empty() {
            writes
                .create_dir_all(out_dir)
                .with_context(|| format!("creating output directory {}", out_dir.display()))?;
        }
        writes
            .stage(out, text.as_bytes())
            .with_context(|| format!("writing {}", out.display()))?;
    }
    for path in writes.commit().context("committing id lists")? {
        println!("  {} {}", "→".cyan(), path.display());
    }
    Ok(())
}

pub fn cmd_subset(
    input: &Path,
    output: &Path,
    root: &str,
    hierarchy_only: bool,
    config: &AnalysisConfig,
) -> Result<()> {
    let doc = load_document(input).with_context(|| format!("loading {}", input.display()))?;
    let graph = primary_graph(&doc, input)?;
    let filter = if hierarchy_only {
        config.hierarchy_filter()
    } else {
        RelationFilter::Any
    };

    let sub = extract_subgraph(graph, root, &filter);
    if sub.nodes.is_empty() {
        tracing::warn!(root, "no node entries reachable from root");
    }
    println!(
        "{} {} under {}: kept {}/{} nodes, {}/{} edges",
        "Extracted".green().bold(),
        file_name(input),
        root.bold(),
        sub.nodes.len(),
        graph.nodes.len(),
        sub.edges.len(),
        graph.edges.len()
    );

    let out = doc.with_primary_graph(sub);
    let bytes = render_document(&out, output)?;
    write_atomic(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    println!("  {} {}", "→".cyan(), output.display());
    Ok(())
}

pub fn cmd_summarize(
    input: &Path,
    out: &Path,
    json: Option<&Path>,
    config: &AnalysisConfig,
) -> Result<()> {
    let doc = load_document(input).with_context(|| format!("loading {}", input.display()))?;
    let graph = primary_graph(&doc, input)?;
    let analysis = analyze(graph, config);

    let mut writes = StagedWrites::new();
    let table = render_hierarchy(out, &hierarchy_rows(&analysis.records))?;
    writes
        .stage(out, &table)
        .with_context(|| format!("writing {}", out.display()))?;
    if let Some(json) = json {
        let mut bytes = serde_json::to_vec_pretty(&analysis.records)?;
        bytes.push(b'\n');
        writes
            .stage(json, &bytes)
            .with_context(|| format!("writing {}", json.display()))?;
    }

    let summary = &analysis.summary;
    println!(
        "{} {}: {} nodes, {} roots, {} unreachable",
        "Analyzed".green().bold(),
        file_name(input),
        summary.node_count,
        summary.root_count,
        summary.unreachable_count
    );
    if let (Some(min), Some(max)) = (summary.min_depth, summary.max_depth) {
        println!("  depth range {min}..={max}");
    }
    for (depth, count) in &summary.nodes_per_depth {
        println!("  {} {:>4}: {}", "depth".dimmed(), depth, count);
    }

    for path in writes.commit().context("committing summary outputs")? {
        println!("  {} {}", "→".cyan(), path.display());
    }
    Ok(())
}

pub fn cmd_parents(input: &Path, ids: &Path, out: &Path, config: &AnalysisConfig) -> Result<()> {
    let doc = load_document(input).with_context(|| format!("loading {}", input.display()))?;
    let graph = primary_graph(&doc, input)?;
    let targets = read_id_list(ids).with_context(|| format!("loading id list {}", ids.display()))?;

    let report = parent_report(graph, &targets, config);
    let without_parents = report.iter().filter(|e| e.parents.is_empty()).count();
    let rows = parent_rows(&report);
    let bytes = render_parent_report(out, &rows)?;
    write_atomic(out, &bytes).with_context(|| format!("writing {}", out.display()))?;

    println!(
        "{} {} nodes ({} without parents)",
        "Reported".green().bold(),
        rows.len(),
        without_parents
    );
    println!("  {} {}", "→".cyan(), out.display());
    Ok(())
}

pub fn cmd_join(new_parents: &Path, old_hierarchy: &Path, out: &Path) -> Result<()> {
    let rows = read_parent_report(new_parents)
        .with_context(|| format!("loading parent report {}", new_parents.display()))?;
    let old = OldSnapshot::read(old_hierarchy)
        .with_context(|| format!("loading old hierarchy {}", old_hierarchy.display()))?;

    let nodes: Vec<NewNode> = rows.iter().map(NewNode::from).collect();
    let joined = join_parents(&nodes, &old);
    let unresolved = joined.iter().filter(|r| r.parent_ids.is_empty()).count();
    let bytes = render_joined(out, &joined)?;
    write_atomic(out, &bytes).with_context(|| format!("writing {}", out.display()))?;

    println!(
        "{} {} nodes against {} old nodes ({} with no parent in the old snapshot)",
        "Joined".green().bold(),
        joined.len(),
        old.len(),
        unresolved
    );
    println!("  {} {}", "→".cyan(), out.display());
    Ok(())
}

pub fn cmd_depth_stats(input: &Path, out: &Path, columns: Vec<String>) -> Result<()> {
    let table = RawTable::read(input, &[ontoscope_tables::hierarchy::DEPTH])
        .with_context(|| format!("loading {}", input.display()))?;
    let aggregator = DepthAggregator::new(columns);
    let groups = aggregator.aggregate(&table, input)?;
    let bytes = aggregator.render(out, &groups)?;
    write_atomic(out, &bytes).with_context(|| format!("writing {}", out.display()))?;

    println!(
        "{} {} rows into {} depth groups over {}",
        "Aggregated".green().bold(),
        table.len(),
        groups.len(),
        aggregator.columns().join(", ")
    );
    println!("  {} {}", "→".cyan(), out.display());
    Ok(())
}
