//! Command-line interface for tabsync

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabsync")]
#[command(about = "Typed table views kept in sync with a list surface")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a table document the way a list view would show it
    Show {
        /// Table document (JSON)
        document: PathBuf,

        /// Column to sort by, as if its header were clicked
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending (click the header twice)
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Filter expression such as "Score>=30"; may be repeated
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Write the visible rows of a document as CSV
    Export {
        /// Table document (JSON)
        document: PathBuf,

        /// Destination CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Filter expression; may be repeated
        #[arg(long = "filter")]
        filters: Vec<String>,
    },

    /// Show the surface edits that turn one document's view into another's
    Diff {
        /// Document currently on the surface
        old: PathBuf,

        /// Document to reconcile towards
        new: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}
