//! Endpoint services
//!
//! Each service maps one area of the marketplace API onto
//! [`Gateway::dispatch`](crate::http::Gateway::dispatch). Obtain them from
//! [`MarketplaceClient`](crate::MarketplaceClient).

mod feeds;
mod items;

pub use feeds::{FeedsService, FEEDS_PATH};
pub use items::{item_path, ItemPages, ItemsService, ITEMS_PATH};
