//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `MEALCART_CATALOG_URL` - Meal listing endpoint
//!   (default: TheMealDB seafood category)
//! - `MEALCART_CATALOG_TIMEOUT_SECS` - Listing request timeout (default: 10)
//! - `MEALCART_STORAGE_PATH` - JSON file backing the visitor's key-value
//!   store; in-memory when unset
//! - `MEALCART_DISPLAY_PRICE` - Price shown on every product card (default: 450)
//! - `MEALCART_CURRENCY` - ISO 4217 code of that price (default: INR)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use mealcart_core::{CurrencyCode, Price};
use thiserror::Error;
use url::Url;

/// Default meal listing endpoint.
pub const DEFAULT_CATALOG_URL: &str =
    "https://www.themealdb.com/api/json/v1/1/filter.php?c=Seafood";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Meal listing API configuration
    pub catalog: CatalogConfig,
    /// Backing file for the key-value store, in-memory when `None`
    pub storage_path: Option<PathBuf>,
    /// Price shown on every product card
    pub display_price: Price,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Meal listing API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Listing endpoint
    pub url: Url,
    /// Request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1", |v| v.parse::<IpAddr>())?;
        let port = parse_env("STOREFRONT_PORT", "3000", |v| v.parse::<u16>())?;

        let catalog = CatalogConfig::from_env()?;

        let currency = parse_env("MEALCART_CURRENCY", "INR", |v| v.parse::<CurrencyCode>())?;
        let display_price = parse_env("MEALCART_DISPLAY_PRICE", "450", |v| {
            Price::parse(v, currency)
        })?;

        Ok(Self {
            host,
            port,
            catalog,
            storage_path: get_optional_env("MEALCART_STORAGE_PATH").map(PathBuf::from),
            display_price,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = parse_env("MEALCART_CATALOG_URL", DEFAULT_CATALOG_URL, validate_catalog_url)?;
        let timeout_secs = parse_env("MEALCART_CATALOG_TIMEOUT_SECS", "10", |v| {
            v.parse::<u64>().map_err(|e| e.to_string()).and_then(|secs| {
                if secs == 0 {
                    Err("must be at least 1 second".to_string())
                } else {
                    Ok(secs)
                }
            })
        })?;

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            // The default is a constant, well-formed URL
            url: Url::parse(DEFAULT_CATALOG_URL).unwrap_or_else(|_| unreachable!()),
            timeout: Duration::from_secs(10),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `parse`.
fn parse_env<T, E: ToString>(
    key: &str,
    default: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    let value = get_env_or_default(key, default);
    parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// The listing endpoint must be an absolute http(s) URL.
fn validate_catalog_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}
