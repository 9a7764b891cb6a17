//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Render hierarchical data matrices as nested trees and keep them reconciled across updates
#[derive(Parser, Debug)]
#[command(name = "matrix-tree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Local config file (overrides global config)
    #[arg(short, long, global = true, env = "MATRIX_TREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply snapshots as successive updates and print the rendered tree
    Render {
        /// Snapshot files (.json or .toml), applied in order
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        snapshots: Vec<PathBuf>,
        /// Output format (default from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Print the scene after every update, not only the last
        #[arg(long)]
        each: bool,
        /// Print reconciliation counters
        #[arg(long)]
        stats: bool,
    },

    /// Print the view model built from a snapshot
    Model {
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// Print the settings object instances for a snapshot as JSON
    Enumerate {
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
        /// Settings object name, e.g. "labels"
        object: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template
    Template,
    /// Show config file locations
    Path,
}
