//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Personal work log.
///
/// Records what you are working on and when, and reports time spent per
/// entry and per day.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start working on something, ending whatever is running.
    On {
        /// Ask for the description interactively.
        #[arg(long, conflicts_with = "text")]
        ask: bool,

        /// What you are working on.
        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            required_unless_present = "ask"
        )]
        text: Vec<String>,
    },

    /// Stop working on whatever is running.
    Over,

    /// List today's entries.
    Today,

    /// Delete the most recent entry.
    Reset,

    /// Start again on the most recent entry, or on entry ID.
    Resume {
        /// Entry to resume.
        id: Option<i64>,
    },

    /// Replace the description of the most recent entry.
    Edit {
        /// New description.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        text: Vec<String>,
    },

    /// Show time worked per day.
    Sum,

    /// Show time worked per day since a point in time.
    Since {
        /// When to start counting, e.g. "monday", "2025-03-01", "3 days ago".
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        when: Vec<String>,
    },

    /// List entries: done [since <when>] [on <subject>].
    Done {
        /// Query words.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Any other word; handled like no command at all.
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}
