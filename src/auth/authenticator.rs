//! Authenticator implementation
//!
//! Acquires client-credentials tokens and manages the shared token cache.

use super::types::{CachedToken, Credentials};
use crate::error::{Error, Result};
use crate::types::{CORRELATION_ID_HEADER, SERVICE_NAME_HEADER};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Service name sent with every request unless configured otherwise
pub const DEFAULT_SERVICE_NAME: &str = "Walmart Marketplace";

/// Authenticator obtains bearer tokens and shares them between callers
pub struct Authenticator {
    /// Client credentials
    credentials: Credentials,
    /// Token endpoint URL
    token_url: String,
    /// Value of the service name header
    service_name: String,
    /// Current bearer token, swapped wholesale on refresh
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator for the given token endpoint
    pub fn new(credentials: Credentials, token_url: impl Into<String>) -> Self {
        Self::with_client(credentials, token_url, DEFAULT_SERVICE_NAME, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(
        credentials: Credentials,
        token_url: impl Into<String>,
        service_name: impl Into<String>,
        http_client: Client,
    ) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            service_name: service_name.into(),
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Get a usable token, fetching one if none is cached or the cached one expired
    pub async fn token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have filled the cache while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Unconditionally fetch a new token and store it
    pub async fn acquire_token(&self) -> Result<String> {
        let mut cached = self.cached_token.write().await;
        let new_token = self.fetch_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);
        Ok(token_str)
    }

    /// Replace a token the upstream rejected with 401.
    ///
    /// The swap happens under the write lock. If another caller already
    /// replaced `rejected` with a live token, that token is returned and no
    /// new fetch is made.
    pub async fn refresh(&self, rejected: &str) -> Result<String> {
        let mut cached = self.cached_token.write().await;

        if let Some(token) = cached.as_ref() {
            if token.token != rejected && !token.is_expired() {
                debug!("Token already refreshed by another caller");
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Seed the cache with a known token
    pub async fn set_token(&self, token: CachedToken) {
        *self.cached_token.write().await = Some(token);
    }

    /// The token currently cached, if any
    pub async fn current_token(&self) -> Option<String> {
        self.cached_token
            .read()
            .await
            .as_ref()
            .map(|t| t.token.clone())
    }

    /// Clear the cached token, forcing the next call to fetch
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// POST the client-credentials grant to the token endpoint
    async fn fetch_token(&self) -> Result<CachedToken> {
        let correlation_id = Uuid::new_v4().to_string();
        debug!(
            url = %self.token_url,
            correlation_id = %correlation_id,
            "Requesting access token"
        );

        let response = self
            .http_client
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.credentials.basic_auth_header())
            .header(CORRELATION_ID_HEADER, correlation_id.as_str())
            .header(SERVICE_NAME_HEADER, self.service_name.as_str())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            return Err(Error::TokenRequest {
                status: status.as_u16(),
                body,
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::auth(format!("Malformed token response: {e}")))?;

        if token_response.access_token.is_empty() {
            return Err(Error::auth("Token response carried an empty access_token"));
        }

        info!(
            client_id = %self.credentials.client_id(),
            expires_in = ?token_response.expires_in,
            "Acquired access token"
        );

        Ok(token_response.into_cached_token())
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .field("token_url", &self.token_url)
            .field("service_name", &self.service_name)
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}
