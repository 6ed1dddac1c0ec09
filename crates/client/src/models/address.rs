//! Shipping addresses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for a shipping address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// A shipping address. At most one is saved per user, replaced wholesale on
/// save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShippingAddress {
    /// Recipient's full name.
    pub full_name: String,
    /// Street address.
    pub line1: String,
    /// Apartment, suite, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// State or province.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Postal code.
    pub postal_code: String,
    /// Country.
    pub country: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ShippingAddress {
    /// Check that all required fields are filled in.
    ///
    /// The address form calls this before saving; the store itself does not
    /// re-validate, so a caller that skips this check can persist whatever
    /// it likes.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::MissingField` naming the first empty required
    /// field.
    pub fn validate(&self) -> Result<(), AddressError> {
        for (name, value) in [
            ("full_name", &self.full_name),
            ("line1", &self.line1),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ] {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(name));
            }
        }
        Ok(())
    }
}
