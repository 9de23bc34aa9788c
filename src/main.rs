// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

//! Walmart Marketplace CLI
//!
//! Command-line interface over the marketplace client

use clap::Parser;
use tracing_subscriber::EnvFilter;
use walmart_marketplace::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    // Credentials may come from a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging; stdout carries the JSON results
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
