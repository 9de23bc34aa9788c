//! Authenticated request gateway
//!
//! Every marketplace call goes through [`Gateway::dispatch`], which:
//! - Attaches the current bearer token and tracing headers
//! - Retries upstream gateway failures (520/521) with bounded backoff
//! - Replaces the token on 401 a bounded number of times
//! - Returns 404 as an explicit [`Reply::NotFound`]
//! - Surfaces every other non-2xx status immediately

use super::decision::{decide, Decision};
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{Authenticator, Credentials, DEFAULT_SERVICE_NAME};
use crate::error::{Error, Result};
use crate::types::{
    BackoffType, JsonValue, Method, StringMap, ACCESS_TOKEN_HEADER, CORRELATION_ID_HEADER,
    SERVICE_NAME_HEADER,
};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Production marketplace gateway
pub const DEFAULT_BASE_URL: &str = "https://api-gateway.walmart.com";

/// Token endpoint, relative to the base URL
pub const TOKEN_PATH: &str = "/v3/token";

/// Configuration for the gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Maximum number of resends after a 520/521
    pub max_retries: u32,
    /// Maximum number of token refreshes after a 401
    pub max_refreshes: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Upper bound of the random delay added on top of the backoff
    pub jitter: Option<Duration>,
    /// Upper bound on total time spent retrying one call
    pub max_elapsed: Option<Duration>,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// Value of the service name header
    pub service_name: String,
    /// User agent string
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 5,
            max_refreshes: 1,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            backoff_type: BackoffType::Exponential,
            jitter: Some(Duration::from_millis(250)),
            max_elapsed: Some(Duration::from_secs(120)),
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: StringMap::new(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            user_agent: format!("walmart-marketplace/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GatewayConfig {
    /// Create a new config builder
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

/// Builder for gateway config
#[derive(Default)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries on 520/521
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set max token refreshes on 401
    pub fn max_refreshes(mut self, refreshes: u32) -> Self {
        self.config.max_refreshes = refreshes;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Add up to `max` of random delay to every backoff
    pub fn jitter(mut self, max: Duration) -> Self {
        self.config.jitter = Some(max);
        self
    }

    /// Disable jitter
    pub fn no_jitter(mut self) -> Self {
        self.config.jitter = None;
        self
    }

    /// Bound the total time spent retrying one call
    pub fn max_elapsed(mut self, limit: Duration) -> Self {
        self.config.max_elapsed = Some(limit);
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the service name header value
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config.service_name = name.into();
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> GatewayConfig {
        self.config
    }
}

/// One outbound call: method, path, query and optional JSON body
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, already percent-encoded
    pub path: String,
    /// Query parameters, sent in insertion order
    pub query: Vec<(String, String)>,
    /// Extra headers for this call
    pub headers: StringMap,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl Request {
    /// Create a request for `method` and `path`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// GET `path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST `path`
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// DELETE `path`
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Terminal outcome of a dispatched call that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 2xx with its decoded body (`null` when the body was empty)
    Json(JsonValue),
    /// 404 from the upstream
    NotFound,
}

impl Reply {
    /// Whether the upstream answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Reply::NotFound)
    }

    /// The body, or `None` on 404
    pub fn into_option(self) -> Option<JsonValue> {
        match self {
            Reply::Json(value) => Some(value),
            Reply::NotFound => None,
        }
    }

    /// The body, treating 404 as an error naming `resource`
    pub fn require(self, resource: impl Into<String>) -> Result<JsonValue> {
        self.into_option()
            .ok_or_else(|| Error::not_found(resource))
    }

    /// Deserialize the body into `T`, or `None` on 404
    pub fn decode<T: DeserializeOwned>(self) -> Result<Option<T>> {
        match self {
            Reply::Json(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| Error::decode(e.to_string())),
            Reply::NotFound => Ok(None),
        }
    }
}

/// The authenticated request gateway
pub struct Gateway {
    client: Client,
    config: GatewayConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl Gateway {
    /// Create a gateway for the given credentials.
    ///
    /// No token is fetched until the first call.
    pub fn new(credentials: Credentials, config: GatewayConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let authenticator = Authenticator::with_client(
            credentials,
            join_url(&config.base_url, TOKEN_PATH),
            config.service_name.clone(),
            client.clone(),
        );
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator,
            rate_limiter,
        })
    }

    /// The authenticator holding this gateway's token
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// The gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Fetch a new token and make it the session token
    pub async fn acquire_token(&self) -> Result<String> {
        self.authenticator.acquire_token().await
    }

    /// Dispatch `method path?params` with an optional JSON body
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<JsonValue>,
    ) -> Result<Reply> {
        let mut request = Request::new(method, path);
        for (key, value) in params {
            request = request.query(*key, *value);
        }
        request.body = body;
        self.dispatch(&request).await
    }

    /// Run one call through the retry/refresh loop until it reaches a terminal state
    pub async fn dispatch(&self, request: &Request) -> Result<Reply> {
        let url = self.build_url(&request.path);
        let started = Instant::now();
        let mut retries = 0u32;
        let mut refreshes = 0u32;
        let mut token = self.authenticator.token().await?;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let response = self.send(&url, request, &token).await?;
            let status = response.status();

            match decide(status) {
                Decision::Done => {
                    let body = response.text().await.map_err(Error::Http)?;
                    debug!("Request succeeded: {} {} ({})", request.method, url, status);
                    return decode_body(&body).map(Reply::Json);
                }

                Decision::NotFound => {
                    debug!("Resource not found: {} {}", request.method, url);
                    return Ok(Reply::NotFound);
                }

                Decision::Retry => {
                    let body = response.text().await.unwrap_or_default();
                    if retries >= self.config.max_retries {
                        return Err(Error::RetryExhausted {
                            attempts: retries + 1,
                            status: status.as_u16(),
                            body,
                        });
                    }

                    let delay = self.retry_delay(retries);
                    if let Some(limit) = self.config.max_elapsed {
                        if started.elapsed() + delay > limit {
                            warn!(
                                "Retry budget of {:?} spent for {} {}",
                                limit, request.method, url
                            );
                            return Err(Error::RetryExhausted {
                                attempts: retries + 1,
                                status: status.as_u16(),
                                body,
                            });
                        }
                    }

                    warn!(
                        "Request failed with {}, attempt {}/{}, retrying in {:?}",
                        status.as_u16(),
                        retries + 1,
                        self.config.max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    retries += 1;

                    // Same token unless it expired while we slept
                    token = self.authenticator.token().await?;
                }

                Decision::Refresh => {
                    let body = response.text().await.unwrap_or_default();
                    if refreshes >= self.config.max_refreshes {
                        return Err(Error::Unauthorized { refreshes, body });
                    }

                    warn!(
                        "Token rejected (401), refresh {}/{}",
                        refreshes + 1,
                        self.config.max_refreshes
                    );
                    token = self.authenticator.refresh(&token).await?;
                    refreshes += 1;
                }

                Decision::Fatal => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::http_status(status.as_u16(), body));
                }
            }
        }
    }

    /// Send a single attempt
    async fn send(&self, url: &str, request: &Request, token: &str) -> Result<Response> {
        let correlation_id = Uuid::new_v4().to_string();
        debug!(
            correlation_id = %correlation_id,
            "Sending {} {}",
            request.method,
            url
        );

        let mut req = self
            .client
            .request(request.method.into(), url)
            .header(ACCEPT, "application/json")
            .header(ACCESS_TOKEN_HEADER, token)
            .header(CORRELATION_ID_HEADER, correlation_id.as_str())
            .header(SERVICE_NAME_HEADER, self.config.service_name.as_str());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req.send().await.map_err(|e| {
            if e.is_timeout() {
                let timeout = request.timeout.unwrap_or(self.config.timeout);
                Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    /// Backoff plus jitter for the given retry number
    pub(crate) fn retry_delay(&self, attempt: u32) -> Duration {
        let delay = self.calculate_backoff(attempt);
        match self.config.jitter {
            Some(jitter) if !jitter.is_zero() => {
                let extra = rand::random_range(0..=jitter.as_millis() as u64);
                delay + Duration::from_millis(extra)
            }
            _ => delay,
        }
    }

    /// Calculate backoff delay for a given attempt, before jitter
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Decode a 2xx body; an empty body decodes to `null`
fn decode_body(body: &str) -> Result<JsonValue> {
    if body.trim().is_empty() {
        return Ok(JsonValue::Null);
    }

    serde_json::from_str(body).map_err(|e| {
        let snippet: String = body.chars().take(200).collect();
        Error::decode(format!("{e} (body: {snippet})"))
    })
}
