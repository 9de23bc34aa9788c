//! Marketplace client
//!
//! Entry point of the crate: owns the shared [`Gateway`] and hands out the
//! endpoint services.

use std::sync::Arc;

use crate::api::{FeedsService, ItemsService};
use crate::auth::Credentials;
use crate::config::MarketplaceConfig;
use crate::error::Result;
use crate::http::{Gateway, GatewayConfig, Reply};
use crate::types::{JsonValue, Method};

/// Client for the marketplace API.
///
/// Cloning is cheap; clones share one token and one rate limiter.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> walmart_marketplace::Result<()> {
/// use walmart_marketplace::MarketplaceClient;
///
/// let client = MarketplaceClient::from_env()?;
/// let status = client.feeds().status("FEED-1", true).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    gateway: Arc<Gateway>,
}

impl MarketplaceClient {
    /// Create a client from credentials and gateway settings
    pub fn new(credentials: Credentials, config: GatewayConfig) -> Result<Self> {
        Ok(Self {
            gateway: Arc::new(Gateway::new(credentials, config)?),
        })
    }

    /// Create a client from a loaded config
    pub fn from_config(config: MarketplaceConfig) -> Result<Self> {
        Self::new(config.credentials, config.gateway)
    }

    /// Create a client from `WALMART_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(MarketplaceConfig::from_env()?)
    }

    /// Catalog item operations
    pub fn items(&self) -> ItemsService {
        ItemsService::new(Arc::clone(&self.gateway))
    }

    /// Feed operations
    pub fn feeds(&self) -> FeedsService {
        FeedsService::new(Arc::clone(&self.gateway))
    }

    /// The underlying gateway
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Fetch a new token and make it the session token
    pub async fn acquire_token(&self) -> Result<String> {
        self.gateway.acquire_token().await
    }

    /// Call an endpoint without a dedicated service method
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<JsonValue>,
    ) -> Result<Reply> {
        self.gateway.request(method, path, params, body).await
    }
}
