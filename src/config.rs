//! Environment configuration
//!
//! Credentials and gateway settings are read from `WALMART_*` variables.
//! The CLI loads a `.env` file first, so both sources work the same way.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::GatewayConfig;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Client id issued by the marketplace (required)
pub const CLIENT_ID_VAR: &str = "WALMART_CLIENT_ID";
/// Client secret issued by the marketplace (required)
pub const CLIENT_SECRET_VAR: &str = "WALMART_CLIENT_SECRET";
/// Base URL override
pub const BASE_URL_VAR: &str = "WALMART_BASE_URL";
/// Value of the service name header
pub const SERVICE_NAME_VAR: &str = "WALMART_SERVICE_NAME";
/// Per-attempt timeout in seconds
pub const TIMEOUT_SECS_VAR: &str = "WALMART_TIMEOUT_SECS";
/// Resends allowed after a 520/521
pub const MAX_RETRIES_VAR: &str = "WALMART_MAX_RETRIES";
/// Token refreshes allowed after a 401
pub const MAX_REFRESHES_VAR: &str = "WALMART_MAX_REFRESHES";

/// Everything needed to build a [`MarketplaceClient`](crate::MarketplaceClient)
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Client credentials
    pub credentials: Credentials,
    /// Gateway settings
    pub gateway: GatewayConfig,
}

impl MarketplaceConfig {
    /// Create a config with default gateway settings
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            gateway: GatewayConfig::default(),
        }
    }

    /// Read the config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the config through `lookup`, which returns a variable's value if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::new(
            required(&lookup, CLIENT_ID_VAR)?,
            required(&lookup, CLIENT_SECRET_VAR)?,
        );

        let mut gateway = GatewayConfig::default();
        if let Some(url) = optional(&lookup, BASE_URL_VAR) {
            gateway.base_url = url;
        }
        if let Some(name) = optional(&lookup, SERVICE_NAME_VAR) {
            gateway.service_name = name;
        }
        if let Some(secs) = parse_optional::<u64, _>(&lookup, TIMEOUT_SECS_VAR)? {
            gateway.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_optional(&lookup, MAX_RETRIES_VAR)? {
            gateway.max_retries = retries;
        }
        if let Some(refreshes) = parse_optional(&lookup, MAX_REFRESHES_VAR)? {
            gateway.max_refreshes = refreshes;
        }

        let config = Self {
            credentials,
            gateway,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.gateway.base_url = url.into();
        self
    }

    /// Check values that cannot be caught while parsing
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.gateway.base_url)?;

        if self.gateway.timeout.is_zero() {
            return Err(Error::invalid_value(
                TIMEOUT_SECS_VAR,
                "timeout must be greater than zero",
            ));
        }

        if self.gateway.service_name.trim().is_empty() {
            return Err(Error::invalid_value(
                SERVICE_NAME_VAR,
                "service name must not be empty",
            ));
        }

        Ok(())
    }
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or_else(|| Error::missing_field(name))
}

fn parse_optional<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| Error::invalid_value(name, format!("'{raw}': {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::DEFAULT_BASE_URL;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const CREDS: [(&str, &str); 2] = [(CLIENT_ID_VAR, "id"), (CLIENT_SECRET_VAR, "secret")];

    #[test]
    fn test_defaults_with_only_credentials() {
        let config = MarketplaceConfig::from_lookup(lookup(&CREDS)).unwrap();

        assert_eq!(config.credentials, Credentials::new("id", "secret"));
        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.gateway.service_name, "Walmart Marketplace");
        assert_eq!(config.gateway.timeout, Duration::from_secs(30));
        assert_eq!(config.gateway.max_retries, 5);
        assert_eq!(config.gateway.max_refreshes, 1);
    }

    #[test]
    fn test_overrides() {
        let mut vars = CREDS.to_vec();
        vars.extend([
            (BASE_URL_VAR, "http://localhost:8080"),
            (SERVICE_NAME_VAR, "Seller Tools"),
            (TIMEOUT_SECS_VAR, "5"),
            (MAX_RETRIES_VAR, "2"),
            (MAX_REFRESHES_VAR, " 3 "),
        ]);

        let config = MarketplaceConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.gateway.base_url, "http://localhost:8080");
        assert_eq!(config.gateway.service_name, "Seller Tools");
        assert_eq!(config.gateway.timeout, Duration::from_secs(5));
        assert_eq!(config.gateway.max_retries, 2);
        assert_eq!(config.gateway.max_refreshes, 3);
    }

    #[test]
    fn test_missing_client_id() {
        let err = MarketplaceConfig::from_lookup(lookup(&[(CLIENT_SECRET_VAR, "s")])).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == CLIENT_ID_VAR));
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let err = MarketplaceConfig::from_lookup(lookup(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "  "),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, Error::MissingConfigField { ref field } if field == CLIENT_SECRET_VAR)
        );
    }

    #[test]
    fn test_invalid_number() {
        let mut vars = CREDS.to_vec();
        vars.push((MAX_RETRIES_VAR, "many"));

        let err = MarketplaceConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == MAX_RETRIES_VAR));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut vars = CREDS.to_vec();
        vars.push((TIMEOUT_SECS_VAR, "0"));

        let err = MarketplaceConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut vars = CREDS.to_vec();
        vars.push((BASE_URL_VAR, "not a url"));

        let err = MarketplaceConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_with_base_url() {
        let config = MarketplaceConfig::new(Credentials::new("id", "secret"))
            .with_base_url("http://127.0.0.1:9000");
        assert_eq!(config.gateway.base_url, "http://127.0.0.1:9000");
        assert!(config.validate().is_ok());
    }
}
