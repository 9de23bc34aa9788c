//! Error types for the marketplace client
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the marketplace client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token request rejected with HTTP {status}: {body}")]
    TokenRequest { status: u16, body: String },

    #[error("Still unauthorized after {refreshes} token refresh(es): {body}")]
    Unauthorized { refreshes: u32, body: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Retries exhausted after {attempts} attempts, last HTTP {status}: {body}")]
    RetryExhausted {
        attempts: u32,
        status: u16,
        body: String,
    },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Boundary
    // ============================================================================
    #[error("{operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if this error comes from credentials or token handling
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Auth { .. } | Error::TokenRequest { .. } | Error::Unauthorized { .. } => true,
            Error::Operation { source, .. } => source.is_auth_error(),
            _ => false,
        }
    }

    /// Check if the failure was transient and the whole call may be tried again later
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::RetryExhausted { .. } => true,
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            Error::Operation { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::TokenRequest { status, .. }
            | Error::HttpStatus { status, .. }
            | Error::RetryExhausted { status, .. } => Some(*status),
            Error::Unauthorized { .. } => Some(401),
            Error::NotFound { .. } => Some(404),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            Error::Operation { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Upstream gateway failures the dispatcher retries on
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 520 | 521)
}

/// Result type alias for the marketplace client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for tagging errors with the operation that produced them
pub trait ResultExt<T> {
    /// Wrap an error with the name of the failed operation
    fn operation(self, name: impl Into<String>) -> Result<T>;

    /// Wrap an error with a lazily built operation name
    fn with_operation<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn operation(self, name: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Operation {
            operation: name.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_operation<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Operation {
            operation: f(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_value("WALMART_MAX_RETRIES", "'many': invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'WALMART_MAX_RETRIES': 'many': invalid digit found in string"
        );

        let err = Error::missing_field("WALMART_CLIENT_ID");
        assert_eq!(
            err.to_string(),
            "Missing required config field: WALMART_CLIENT_ID"
        );

        let err = Error::http_status(400, "bad sku");
        assert_eq!(err.to_string(), "HTTP 400: bad sku");
    }

    #[test]
    fn test_is_auth_error() {
        assert!(Error::auth("no token").is_auth_error());
        assert!(Error::TokenRequest {
            status: 400,
            body: String::new()
        }
        .is_auth_error());
        assert!(Error::Unauthorized {
            refreshes: 1,
            body: String::new()
        }
        .is_auth_error());
        assert!(!Error::http_status(403, "").is_auth_error());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(520, "").is_retryable());
        assert!(Error::http_status(521, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(500, "").is_retryable());
        assert!(!Error::missing_field("WALMART_CLIENT_ID").is_retryable());
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::http_status(403, "").status(), Some(403));
        assert_eq!(
            Error::RetryExhausted {
                attempts: 3,
                status: 521,
                body: String::new()
            }
            .status(),
            Some(521)
        );
        assert_eq!(Error::invalid_input("x").status(), None);
    }

    #[test]
    fn test_operation_context() {
        let result: Result<()> = Err(Error::http_status(400, "invalid sku"));
        let err = result.operation("delete item").unwrap_err();

        assert_eq!(err.to_string(), "delete item failed: HTTP 400: invalid sku");
        assert_eq!(err.status(), Some(400));
    }
}
