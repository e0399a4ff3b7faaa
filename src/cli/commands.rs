//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse a paginated, searchable listing from the terminal
#[derive(Parser, Debug)]
#[command(name = "listing-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the page size
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through the plain listing
    List {
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Refresh from the first page afterwards
        #[arg(long)]
        refresh: bool,
    },

    /// Page through search results
    Search {
        /// Search term
        query: String,

        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Refresh from the first page afterwards
        #[arg(long)]
        refresh: bool,
    },

    /// Read search input from stdin, one keystroke state per line
    Watch {
        /// Quiet period before a search term is applied (ms)
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
