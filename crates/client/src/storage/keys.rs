//! Structured storage keys.
//!
//! Per-user collections are namespaced by collection kind and keyed by the
//! account email. The email component is percent-encoded, so an unusual
//! identity string can never collide with another key or escape its
//! namespace (`a/b@x.com` and `a_b@x.com` stay distinct keys).

use std::fmt;

use sundrop_core::Email;

/// A typed key into the local key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey<'a> {
    /// Whether biometric login is enabled (device-wide, not per-user).
    BiometricsEnabled,
    /// The last identity that authenticated, offered for biometric re-login.
    LastRegisteredEmail,
    /// A user's order history, most-recent-first.
    Orders(&'a Email),
    /// A user's wishlist, in user-controlled order.
    Wishlist(&'a Email),
    /// A user's saved shipping address.
    ShippingAddress(&'a Email),
}

impl fmt::Display for StorageKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BiometricsEnabled => write!(f, "settings/biometrics-enabled"),
            Self::LastRegisteredEmail => write!(f, "settings/last-registered-email"),
            Self::Orders(email) => write!(f, "orders/{}", urlencoding::encode(email.as_str())),
            Self::Wishlist(email) => {
                write!(f, "wishlist/{}", urlencoding::encode(email.as_str()))
            }
            Self::ShippingAddress(email) => {
                write!(f, "shipping-address/{}", urlencoding::encode(email.as_str()))
            }
        }
    }
}
