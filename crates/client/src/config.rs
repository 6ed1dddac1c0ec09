//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUNDROP_COMMERCE_URL` - Base URL of the commerce backend
//!   (e.g., <http://10.0.2.2:9000> against a local backend)
//! - `SUNDROP_PUBLISHABLE_KEY` - Publishable API key for the storefront
//!   endpoints
//!
//! ## Optional
//! - `SUNDROP_PAYMENT_URL` - Base URL of the payment-intent endpoint
//!   (default: the commerce URL)
//! - `SUNDROP_GEOCODING_URL` - Reverse-geocoding API base URL
//!   (default: <https://api.opencagedata.com>)
//! - `SUNDROP_GEOCODING_API_KEY` - Reverse-geocoding API key; address
//!   prefill is disabled when absent
//! - `SUNDROP_STORAGE_PATH` - Path of the local key-value store file;
//!   state is memory-only when absent
//! - `SUNDROP_HTTP_TIMEOUT_SECS` - HTTP request timeout (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_GEOCODING_URL: &str = "https://api.opencagedata.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Commerce backend configuration
    pub commerce: CommerceConfig,
    /// Base URL of the payment-intent endpoint
    pub payment_url: String,
    /// Reverse-geocoding configuration
    pub geocoding: GeocodingConfig,
    /// Path of the local key-value store file (`None` = memory-only)
    pub storage_path: Option<PathBuf>,
    /// HTTP request timeout
    pub http_timeout: Duration,
}

/// Commerce backend configuration.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// Base URL of the commerce backend
    pub base_url: String,
    /// Publishable API key sent with every storefront request
    pub publishable_key: String,
}

/// Reverse-geocoding API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeocodingConfig {
    /// Geocoding API base URL
    pub base_url: String,
    /// API key; prefill is disabled when absent
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for GeocodingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let commerce_url = get_base_url("SUNDROP_COMMERCE_URL")?;
        let publishable_key = get_env("SUNDROP_PUBLISHABLE_KEY")?;

        let payment_url = match std::env::var("SUNDROP_PAYMENT_URL") {
            Ok(raw) => validate_base_url("SUNDROP_PAYMENT_URL", raw)?,
            Err(_) => commerce_url.clone(),
        };

        let geocoding_url = match std::env::var("SUNDROP_GEOCODING_URL") {
            Ok(raw) => validate_base_url("SUNDROP_GEOCODING_URL", raw)?,
            Err(_) => DEFAULT_GEOCODING_URL.to_owned(),
        };
        let geocoding_key = std::env::var("SUNDROP_GEOCODING_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(SecretString::from);

        let storage_path = std::env::var("SUNDROP_STORAGE_PATH")
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        let http_timeout_secs = match std::env::var("SUNDROP_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("SUNDROP_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
            })?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            commerce: CommerceConfig {
                base_url: commerce_url,
                publishable_key,
            },
            payment_url,
            geocoding: GeocodingConfig {
                base_url: geocoding_url,
                api_key: geocoding_key,
            },
            storage_path,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

/// Get a required environment variable.
fn get_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Get a required environment variable that must parse as a base URL.
fn get_base_url(name: &str) -> Result<String, ConfigError> {
    validate_base_url(name, get_env(name)?)
}

/// Validate a base URL and strip any trailing slash so joined paths stay
/// well-formed.
fn validate_base_url(name: &str, raw: String) -> Result<String, ConfigError> {
    url::Url::parse(&raw)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))?;
    Ok(raw.trim_end_matches('/').to_owned())
}
