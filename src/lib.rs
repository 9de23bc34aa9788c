// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]
#![allow(clippy::too_many_arguments)]

//! # Walmart Marketplace client
//!
//! An async client for the Walmart Marketplace seller API.
//!
//! ## Features
//!
//! - **OAuth2 client credentials**: Token fetched lazily, shared, refreshed on 401
//! - **Bounded retries**: 520/521 gateway failures resent with backoff
//! - **Explicit not-found**: 404 is a value, every other failure an error
//! - **Typed endpoints**: Item search and delete, lag time feeds, feed status
//! - **Cursor pagination**: Walk the whole catalog page by page
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use walmart_marketplace::{ItemsQuery, LagTime, MarketplaceClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // WALMART_CLIENT_ID / WALMART_CLIENT_SECRET
//!     let client = MarketplaceClient::from_env()?;
//!
//!     let page = client.items().search(&ItemsQuery::new().limit(20)).await?;
//!     println!("{} items", page.items.len());
//!
//!     let ack = client
//!         .feeds()
//!         .update_lag_time(&[LagTime::new("SKU-1", 2)])
//!         .await?;
//!     let status = client.feeds().status(&ack.feed_id, true).await?;
//!     println!("{status:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MarketplaceClient                          │
//! │   items() → ItemsService          feeds() → FeedsService        │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────────┐
//! │                           Gateway                               │
//! │  decide(status): 2xx Done │ 404 NotFound │ 520/521 Retry        │
//! │                  401 Refresh │ other Fatal                      │
//! ├──────────────┬───────────────────────┬──────────────────────────┤
//! │ Authenticator│  Backoff + jitter     │  Rate limiter (governor) │
//! └──────────────┴───────────────────────┴──────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// OAuth2 client credentials
pub mod auth;

/// Authenticated gateway with retry and rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Request and response models
pub mod models;

/// Endpoint services
pub mod api;

/// Environment configuration
pub mod config;

/// Client entry point
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use types::*;

// Re-export commonly used types
pub use api::{FeedsService, ItemPages, ItemsService};
pub use auth::Credentials;
pub use client::MarketplaceClient;
pub use config::MarketplaceConfig;
pub use http::{Gateway, GatewayConfig, Reply};
pub use models::{FeedAck, FeedStatus, ItemsPage, ItemsQuery, LagTime, LagTimeFeed};
pub use pagination::StopCondition;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
