// src/cli/mod.rs — CLI definition (clap derive)

pub mod clean;
pub mod export;
pub mod lookup;
pub mod progress;
pub mod reset;
pub mod run;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chatqa",
    about = "Resumable two-tier quality evaluation of chat sessions",
    version
)]
pub struct Cli {
    /// Config file path (defaults to ./chatqa.toml, then ~/.chatqa/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate every unprocessed session, checkpointing after each batch
    Run(RunArgs),
    /// Show progress counts for the input and checkpoint
    Status {
        /// Session input file
        #[arg(long)]
        input: Option<String>,
        /// Checkpoint file
        #[arg(long)]
        output: Option<String>,
        /// Also list models available on the inference service
        #[arg(long)]
        probe: bool,
    },
    /// Re-render the checkpoint as csv, json or yaml
    Export {
        /// Checkpoint file
        #[arg(long)]
        output: Option<String>,
        /// Export format (csv, json, yaml)
        #[arg(long, default_value = "csv")]
        format: String,
        /// Destination file (defaults to stdout)
        #[arg(long)]
        to: Option<String>,
    },
    /// Drop reports from the checkpoint so the next run re-evaluates them
    Reset {
        /// Checkpoint file
        #[arg(long)]
        output: Option<String>,
        /// Drop every error report
        #[arg(long)]
        errors: bool,
        /// Drop the report for this session (repeatable)
        #[arg(long = "session")]
        sessions: Vec<String>,
    },
    /// Filter a raw JSONL chat-turn export down to usable records
    Clean {
        /// Line-delimited JSON input
        #[arg(long)]
        input: String,
        /// JSON array output
        #[arg(long)]
        output: String,
    },
    /// Search the product catalog
    Search {
        query: String,
        /// Catalog JSON file or http(s) URL
        #[arg(long)]
        catalog: String,
        #[arg(long, default_value_t = crate::lookup::catalog::DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Answer a query with the closest historical bot reply
    Reply {
        query: String,
        /// Session input file to index
        #[arg(long)]
        input: Option<String>,
    },
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct RunArgs {
    /// Session input file (JSON array of sessions)
    #[arg(long)]
    pub input: Option<String>,

    /// Checkpoint / report JSON file
    #[arg(long)]
    pub output: Option<String>,

    /// Tabular CSV export path
    #[arg(long)]
    pub csv: Option<String>,

    /// Tier-1 model
    #[arg(long)]
    pub primary: Option<String>,

    /// Tier-2 model consulted on escalation
    #[arg(long, conflicts_with = "single_tier")]
    pub secondary: Option<String>,

    /// Evaluate with the primary model only (no escalation)
    #[arg(long)]
    pub single_tier: bool,

    /// Sessions per checkpoint
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Only evaluate these session ids (repeatable)
    #[arg(long = "only")]
    pub only: Vec<String>,

    /// Attempt at most this many sessions in this run
    #[arg(long)]
    pub limit: Option<usize>,

    /// Suppress per-session progress output
    #[arg(long)]
    pub quiet: bool,
}
