//! CLI module
//!
//! Command-line interface over the marketplace client.
//!
//! # Commands
//!
//! - `token` - Acquire an access token
//! - `items` - List catalog items
//! - `delete` - Delete an item by SKU
//! - `lag-time` - Submit a fulfillment lag time feed
//! - `feed` - Show (or wait for) a feed's status

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
