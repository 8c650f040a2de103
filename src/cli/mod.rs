//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Test run summary tool
#[derive(Parser, Debug)]
#[command(name = "run-summary")]
#[command(author = "hephaex@gmail.com")]
#[command(version = "0.1.0")]
#[command(about = "Replay recorded test runs and print their execution summary")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the standard locations)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay an event log and print its summary
    Summarize(SummarizeArgs),

    /// Check that an event log replays without lifecycle errors
    Validate {
        /// Event log file (YAML or JSON)
        log: String,

        /// Print the recorded plan as a tree
        #[arg(long)]
        tree: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List supported environment variables
    Env,
}

/// Arguments for summarize command
#[derive(Parser, Debug)]
pub struct SummarizeArgs {
    /// Event log file (YAML or JSON)
    pub log: String,

    /// Output format (text, json, json-pretty)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Omit the failures section
    #[arg(long)]
    pub no_failures: bool,

    /// Replay node events in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of concurrent event chains (when parallel)
    #[arg(short, long)]
    pub concurrent: Option<usize>,

    /// Write the summary to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Target path
        #[arg(default_value = "run-summary.yaml")]
        path: String,
    },

    /// Print the effective configuration
    Show,
}
