//! Wishlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sundrop_core::{Money, ProductId};

/// A saved product in a user's wishlist.
///
/// Position within the wishlist is significant and user-controlled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Product identifier, unique within a user's wishlist.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price at save time.
    pub price: Money,
    /// Optional thumbnail reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// When the item was added.
    pub added_at: DateTime<Utc>,
}

/// Input for a wishlist insert; the store stamps `added_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWishlistItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price at save time.
    pub price: Money,
    /// Optional thumbnail reference.
    pub thumbnail: Option<String>,
}

impl NewWishlistItem {
    pub(crate) fn into_item(self, added_at: DateTime<Utc>) -> WishlistItem {
        WishlistItem {
            id: self.id,
            name: self.name,
            price: self.price,
            thumbnail: self.thumbnail,
            added_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sundrop_core::CurrencyCode;

    #[test]
    fn test_into_item_stamps_timestamp() {
        let added_at = Utc::now();
        let item = NewWishlistItem {
            id: ProductId::new("p2"),
            name: "Mug".to_owned(),
            price: Money::from_minor_units(500, CurrencyCode::USD),
            thumbnail: Some("https://cdn.example/mug.png".to_owned()),
        }
        .into_item(added_at);

        assert_eq!(item.id, ProductId::new("p2"));
        assert_eq!(item.added_at, added_at);
    }
}
