//! Ontoscope CLI
//!
//! Structural analysis of ontology hierarchy snapshots (OBO-graph JSON):
//! - diffing node membership between two releases
//! - extracting the subtree under a root
//! - per-node hierarchy tables and per-depth statistics
//! - parent reports for added nodes, joined against an older release

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use ontoscope_graph::{AnalysisConfig, HIERARCHY_PREDICATE, UNKNOWN_LABEL};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "ontoscope")]
#[command(author, version, about = "Ontoscope: ontology hierarchy analysis")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Edge predicate that forms the hierarchy.
    #[arg(long, global = true, default_value = HIERARCHY_PREDICATE)]
    predicate: String,

    /// Label written for nodes that have none.
    #[arg(long, global = true, default_value = UNKNOWN_LABEL)]
    unknown_label: String,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

impl GlobalArgs {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig::default()
            .with_predicate(&self.predicate)
            .with_unknown_label(&self.unknown_label)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Diff node membership of two snapshots.
    ///
    /// Prints the ids found in only one snapshot and writes each non-empty
    /// side as a node-id list named `only_in_<file stem>.txt`.
    Compare {
        /// First snapshot JSON
        first: PathBuf,
        /// Second snapshot JSON
        second: PathBuf,
        /// Directory for the id lists
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Extract a root and everything below it into a new snapshot.
    Subset {
        /// Input snapshot JSON
        input: PathBuf,
        /// Output snapshot JSON
        output: PathBuf,
        /// Id of the subtree root
        root: String,
        /// Follow only hierarchy edges (default: edges of every predicate)
        #[arg(long)]
        hierarchy_only: bool,
    },

    /// Per-node hierarchy metrics as a table.
    Summarize {
        /// Input snapshot JSON
        input: PathBuf,
        /// Output hierarchy CSV
        #[arg(short, long)]
        out: PathBuf,
        /// Also write full node records (with parent/child labels) as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Parents and siblings of the nodes in an id list.
    Parents {
        /// Input snapshot JSON
        input: PathBuf,
        /// Node-id list (e.g. written by `compare`)
        ids: PathBuf,
        /// Output parent report CSV
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Join a parent report against an older hierarchy table.
    Join {
        /// Parent report CSV of the new snapshot
        new_parents: PathBuf,
        /// Hierarchy CSV of the old snapshot
        old_hierarchy: PathBuf,
        /// Output CSV
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Per-depth min/max/mean/median of hierarchy table columns.
    DepthStats {
        /// Hierarchy CSV
        input: PathBuf,
        /// Output CSV
        #[arg(short, long)]
        out: PathBuf,
        /// Column to summarize (repeatable; defaults to the four metric columns)
        #[arg(long = "column")]
        columns: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose, cli.global.quiet);
    let config = cli.global.config();

    match cli.command {
        Commands::Compare {
            first,
            second,
            out_dir,
        } => commands::cmd_compare(&first, &second, &out_dir, &config),
        Commands::Subset {
            input,
            output,
            root,
            hierarchy_only,
        } => commands::cmd_subset(&input, &output, &root, hierarchy_only, &config),
        Commands::Summarize { input, out, json } => {
            commands::cmd_summarize(&input, &out, json.as_deref(), &config)
        }
        Commands::Parents { input, ids, out } => {
            commands::cmd_parents(&input, &ids, &out, &config)
        }
        Commands::Join {
            new_parents,
            old_hierarchy,
            out,
        } => commands::cmd_join(&new_parents, &old_hierarchy, &out),
        Commands::DepthStats {
            input,
            out,
            columns,
        } => commands::cmd_depth_stats(&input, &out, columns),
    }
}
