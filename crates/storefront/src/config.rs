//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STALLION_API_URL` - Stallion Express API base URL
//! - `STALLION_API_KEY` - Stallion Express API token
//! - `CHECKOUT_FUNCTION_URL` - Checkout-session edge function endpoint
//! - `BACKEND_SERVICE_KEY` - Service key for backend function calls
//! - `SHIP_FROM_CITY`, `SHIP_FROM_PROVINCE`, `SHIP_FROM_POSTAL_CODE` -
//!   Warehouse origin address for rate quotes
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHIP_FROM_LINE1` - Warehouse street address
//! - `STORE_DISCOUNT_ENABLED` - Store-wide discount toggle (default: false)
//! - `STORE_DISCOUNT_NAME` - Customer-facing discount label
//! - `STORE_DISCOUNT_PERCENT` - Percentage off, 0-100 (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use kensington_core::{Address, DiscountPolicy};
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Stallion Express rate API configuration
    pub stallion: StallionConfig,
    /// Checkout-session edge function endpoint
    pub checkout_function_url: String,
    /// Service key for backend function calls
    pub backend_service_key: SecretString,
    /// Warehouse origin for rate quotes
    pub ship_from: Address,
    /// Store-wide discount, passed explicitly into pricing calls
    pub discount: DiscountPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Stallion Express API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct StallionConfig {
    /// API base URL, e.g. `https://ship.stallionexpress.ca/api/v4`
    pub api_url: String,
    /// API bearer token
    pub api_key: SecretString,
}

impl std::fmt::Debug for StallionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StallionConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = optional("STOREFRONT_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".into(), e.to_string()))?;
        let port = optional("STOREFRONT_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".into(), e.to_string()))?;

        let discount_enabled = optional("STORE_DISCOUNT_ENABLED")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
        let discount_percent = match optional("STORE_DISCOUNT_PERCENT") {
            Some(raw) => raw.parse::<Decimal>().map_err(|e| {
                ConfigError::InvalidEnvVar("STORE_DISCOUNT_PERCENT".into(), e.to_string())
            })?,
            None => Decimal::ZERO,
        };
        let discount = DiscountPolicy::new(
            discount_enabled,
            optional("STORE_DISCOUNT_NAME").unwrap_or_default(),
            discount_percent,
        )
        .map_err(|e| ConfigError::InvalidEnvVar("STORE_DISCOUNT_PERCENT".into(), e.to_string()))?;

        let ship_from = Address {
            line1: optional("SHIP_FROM_LINE1").unwrap_or_default(),
            city: required("SHIP_FROM_CITY")?,
            province: required("SHIP_FROM_PROVINCE")?.to_ascii_uppercase(),
            country: "CA".to_string(),
            postal_code: required("SHIP_FROM_POSTAL_CODE")?
                .to_ascii_uppercase()
                .split_whitespace()
                .collect(),
            ..Address::default()
        };

        Ok(Self {
            host,
            port,
            stallion: StallionConfig {
                api_url: required("STALLION_API_URL")?,
                api_key: SecretString::from(required("STALLION_API_KEY")?),
            },
            checkout_function_url: required("CHECKOUT_FUNCTION_URL")?,
            backend_service_key: SecretString::from(required("BACKEND_SERVICE_KEY")?),
            ship_from,
            discount,
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
