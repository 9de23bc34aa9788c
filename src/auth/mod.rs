//! Authentication module
//!
//! OAuth2 client-credentials flow against the marketplace token endpoint.
//!
//! The `Authenticator` owns the session's bearer token. It fetches the first
//! token lazily and swaps it under a write lock when the upstream rejects it.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, DEFAULT_SERVICE_NAME};
pub use types::{basic_auth_header, CachedToken, Credentials};
