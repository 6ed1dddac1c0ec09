//! Geolocation seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use sundrop_core::PermissionStatus;

/// Errors from the geolocation provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The user has not granted location permission.
    #[error("location permission denied")]
    PermissionDenied,

    /// Location services are disabled device-wide.
    #[error("location services disabled")]
    ServicesDisabled,

    /// The SDK could not produce a fix.
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// A position fix from the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub accuracy: Option<f64>,
    pub speed: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// The platform's geolocation provider.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current foreground-location permission state.
    async fn permission_status(&self) -> PermissionStatus;

    /// Prompt the user for permission; returns the resulting state.
    async fn request_permission(&self) -> PermissionStatus;

    /// Fetch the current position.
    ///
    /// # Errors
    ///
    /// Returns `LocationError` when permission is missing, services are
    /// disabled, or no fix is available.
    async fn current_position(&self) -> Result<Position, LocationError>;
}
