//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `VADAF_HOST` - Bind address (default: 127.0.0.1)
//! - `VADAF_PORT` - Listen port (default: 3000)
//! - `VADAF_BASE_URL` - Public URL (default: <http://localhost:3000>); an
//!   `https://` URL turns on secure cookies
//! - `VADAF_DATA_FILE` - JSON store file (default: data/store.json)
//! - `VADAF_STATIC_DIR` - Static assets (default: crates/storefront/static)
//! - `VADAF_MAX_UPLOAD_BYTES` - Largest accepted product form (default: 5 MiB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

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
    /// Public base URL for the storefront
    pub base_url: String,
    /// JSON file holding the catalog and contact record
    pub data_file: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Request body limit for the product upload form
    pub max_upload_bytes: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = parse_var("VADAF_HOST", &get_or("VADAF_HOST", "127.0.0.1"))?;
        let port = parse_var("VADAF_PORT", &get_or("VADAF_PORT", "3000"))?;
        let max_upload_bytes = match lookup("VADAF_MAX_UPLOAD_BYTES") {
            Some(value) => parse_var("VADAF_MAX_UPLOAD_BYTES", &value)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let base_url = get_or("VADAF_BASE_URL", "http://localhost:3000");
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "VADAF_BASE_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            data_file: PathBuf::from(get_or("VADAF_DATA_FILE", "data/store.json")),
            static_dir: PathBuf::from(get_or("VADAF_STATIC_DIR", "crates/storefront/static")),
            max_upload_bytes,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_var("SENTRY_SAMPLE_RATE", &get_or("SENTRY_SAMPLE_RATE", "1.0"))?,
            sentry_traces_sample_rate: parse_var(
                "SENTRY_TRACES_SAMPLE_RATE",
                &get_or("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable's value, naming the variable in the error.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
