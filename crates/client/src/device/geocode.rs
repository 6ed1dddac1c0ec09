//! Reverse-geocoding HTTP client.
//!
//! Turns a position fix into a best-match formatted address for prefilling
//! the shipping form. The API is OpenCage-shaped: forward/reverse lookups on
//! one endpoint, `q=<lat>+<lon>` for reverse.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

/// Errors from the geocoding API.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Transport-level failure.
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the API.
    #[error("geocoding returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body did not parse.
    #[error("failed to parse geocoding response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A geocoded address suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodedAddress {
    /// The full formatted address line.
    pub formatted: String,
    /// City (or town/village fallback).
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country name.
    pub country: Option<String>,
}

// Wire shapes.
#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    formatted: String,
    #[serde(default)]
    components: GeocodeComponents,
}

#[derive(Deserialize, Default)]
struct GeocodeComponents {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl From<GeocodeResult> for GeocodedAddress {
    fn from(result: GeocodeResult) -> Self {
        let components = result.components;
        Self {
            formatted: result.formatted,
            city: components.city.or(components.town).or(components.village),
            state: components.state,
            postal_code: components.postcode,
            country: components.country,
        }
    }
}

/// Client for the reverse-geocoding API.
#[derive(Clone)]
pub struct ReverseGeocoder {
    inner: Arc<ReverseGeocoderInner>,
}

struct ReverseGeocoderInner {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl ReverseGeocoder {
    /// Create a new geocoder sharing the given HTTP client.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: SecretString,
    ) -> Self {
        Self {
            inner: Arc::new(ReverseGeocoderInner {
                client,
                base_url: base_url.into(),
                api_key,
            }),
        }
    }

    /// Look up the best-match address for a position.
    ///
    /// Returns `Ok(None)` when the service reports no results for the
    /// coordinates.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError` on transport, status, or parse failures.
    #[instrument(skip(self))]
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<GeocodedAddress>, GeocodeError> {
        let url = format!("{}/geocode/v1/json", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .query(&[
                ("q", format!("{latitude}+{longitude}")),
                ("key", self.inner.api_key.expose_secret().to_owned()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "geocoding lookup failed");
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: GeocodeResponse = serde_json::from_str(&response.text().await?)?;
        Ok(parsed.results.into_iter().next().map(Into::into))
    }
}
