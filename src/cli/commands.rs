//! CLI commands and argument parsing

use crate::models::LagTime;
use crate::types::LifecycleStatus;
use clap::{Parser, Subcommand};

/// Walmart Marketplace command-line client
///
/// Credentials are read from WALMART_CLIENT_ID and WALMART_CLIENT_SECRET
/// (a .env file in the working directory is loaded first).
#[derive(Parser, Debug)]
#[command(name = "walmart-marketplace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

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
    /// Acquire a fresh access token
    Token,

    /// List catalog items
    Items {
        /// Page size
        #[arg(long)]
        limit: Option<u32>,

        /// Cursor to start from (default: first page)
        #[arg(long)]
        cursor: Option<String>,

        /// Only items in this lifecycle status
        #[arg(long, value_enum, ignore_case = true)]
        status: Option<LifecycleStatus>,

        /// Follow the cursor through every page
        #[arg(long)]
        all: bool,

        /// Stop paging after this many items (implies --all)
        #[arg(long)]
        max_records: Option<u64>,
    },

    /// Delete an item
    Delete {
        /// Seller SKU
        sku: String,
    },

    /// Update fulfillment lag time for one or more SKUs
    LagTime {
        /// Entries as SKU=DAYS
        #[arg(required = true)]
        entries: Vec<LagTime>,
    },

    /// Show the status of a feed
    Feed {
        /// Feed id returned when the feed was submitted
        feed_id: String,

        /// Leave out per-item details
        #[arg(long)]
        no_details: bool,

        /// Poll until the feed is PROCESSED or ERROR
        #[arg(long)]
        wait: bool,

        /// Seconds between polls
        #[arg(long, default_value = "10")]
        poll_secs: u64,

        /// Give up waiting after this many seconds
        #[arg(long, default_value = "600")]
        timeout_secs: u64,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}
