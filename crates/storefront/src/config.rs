//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: .pocket-cart)
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: cart)
//! - `CART_STORAGE_QUOTA_BYTES` - Largest stored value in bytes, 0 disables (default: 5242880)
//! - `CART_CURRENCY_SYMBOL` - Symbol printed before prices (default: ₱)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::cart_store::DEFAULT_CART_KEY;
use crate::storage::{FileStore, validate_key};

/// Default storage quota, matching the common browser local storage limit.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

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
    /// Cart persistence settings
    pub storage: StorageConfig,
    /// Symbol printed before every price
    pub currency_symbol: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

/// Where and how the cart is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory for the file store
    pub dir: PathBuf,
    /// Key the cart is stored under
    pub key: String,
    /// Largest value the store accepts; `None` is unlimited
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".pocket-cart"),
            key: DEFAULT_CART_KEY.to_string(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        }
    }
}

impl StorageConfig {
    /// Build the file store described by this configuration.
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.dir).with_quota(self.quota_bytes)
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let dir = lookup("CART_STORAGE_DIR").map_or(defaults.dir, PathBuf::from);
        let key = lookup("CART_STORAGE_KEY").unwrap_or(defaults.key);
        validate_key(&key).map_err(|e| invalid_var("CART_STORAGE_KEY", &e))?;
        let quota_bytes = match lookup("CART_STORAGE_QUOTA_BYTES") {
            Some(raw) => {
                let bytes = raw
                    .parse::<usize>()
                    .map_err(|e| invalid_var("CART_STORAGE_QUOTA_BYTES", &e))?;
                (bytes > 0).then_some(bytes)
            }
            None => defaults.quota_bytes,
        };

        Ok(Self {
            dir,
            key,
            quota_bytes,
        })
    }
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
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_or_default(lookup, "STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid_var("STOREFRONT_HOST", &e))?;
        let port = get_or_default(lookup, "STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| invalid_var("STOREFRONT_PORT", &e))?;
        let storage = StorageConfig::from_lookup(lookup)?;
        let currency_symbol = get_or_default(lookup, "CART_CURRENCY_SYMBOL", "₱");

        Ok(Self {
            host,
            port,
            storage,
            currency_symbol,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Error for a variable that is set but unusable.
fn invalid_var(var: &str, err: &impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(var.to_string(), err.to_string())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}
