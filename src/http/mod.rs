//! HTTP gateway module
//!
//! Provides the authenticated request gateway every marketplace call runs through.
//!
//! # Features
//!
//! - **Token handling**: Bearer token attached per attempt, replaced on 401
//! - **Bounded retries**: 520/521 resent with backoff up to a configured cap
//! - **Explicit 404**: Not-found comes back as a value, not an error
//! - **Rate Limiting**: Optional token bucket limiter using governor

mod client;
mod decision;
mod rate_limit;

pub use client::{
    Gateway, GatewayConfig, GatewayConfigBuilder, Reply, Request, DEFAULT_BASE_URL, TOKEN_PATH,
};
pub use decision::{decide, Decision};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
