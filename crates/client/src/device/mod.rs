//! Device collaborator seams.
//!
//! Biometric prompts and geolocation are platform SDK calls; the client only
//! needs their terminal outcomes, so each sits behind an object-safe trait
//! the embedding app implements (and tests mock). Reverse geocoding is a
//! plain HTTP service and gets a real client.

pub mod biometrics;
pub mod geocode;
pub mod location;

pub use biometrics::BiometricAuthenticator;
pub use geocode::{GeocodeError, GeocodedAddress, ReverseGeocoder};
pub use location::{LocationError, LocationProvider, Position};
