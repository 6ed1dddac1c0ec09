//! Unified error handling.
//!
//! Provides a unified `AppError` type over the per-subsystem errors. The UI
//! layer surfaces collaborator failures as dismissible notifications and
//! leaves retry to explicit user action; nothing in this layer is fatal to
//! the process.

use thiserror::Error;

use sundrop_core::MoneyError;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::device::geocode::GeocodeError;
use crate::device::location::LocationError;
use crate::models::address::AddressError;
use crate::payment::PaymentError;
use crate::storage::StorageError;
use crate::stores::wishlist::WishlistError;

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The shared HTTP client could not be initialized.
    #[error("HTTP client initialization failed: {0}")]
    Init(#[source] reqwest::Error),

    /// Local key-value storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Payment collaborator failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Reverse-geocoding lookup failed.
    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Geolocation collaborator failed.
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    /// Money arithmetic failed (currency mismatch or overflow).
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Wishlist operation violated its contract.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// Shipping address validation failed.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(MoneyError::Overflow);
        assert_eq!(err.to_string(), "Money error: money amount overflow");

        let err = AppError::from(ConfigError::MissingEnvVar("SUNDROP_COMMERCE_URL".to_owned()));
        assert_eq!(
            err.to_string(),
            "Config error: Missing environment variable: SUNDROP_COMMERCE_URL"
        );
    }
}
