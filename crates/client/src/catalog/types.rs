//! Domain types for the commerce catalog API.
//!
//! These mirror the backend's storefront product payloads closely enough to
//! deserialize them directly; conversion helpers turn them into the client's
//! own money and cart types.

use serde::{Deserialize, Serialize};

use sundrop_core::{CurrencyCode, Money, ProductId, VariantId};

use crate::models::CartItem;

/// A purchasable product from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Backend product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// URL handle.
    #[serde(default)]
    pub handle: Option<String>,
    /// Purchasable variants.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// One variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Backend variant identifier.
    pub id: VariantId,
    /// Variant title (e.g., "Small").
    pub title: String,
    /// Prices in the currencies the store sells in.
    #[serde(default)]
    pub prices: Vec<ProductPrice>,
}

/// A variant price in one currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPrice {
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO 4217 code, lowercase on the wire.
    pub currency_code: String,
}

impl ProductPrice {
    /// Convert to a typed amount; `None` for unsupported currencies.
    #[must_use]
    pub fn money(&self) -> Option<Money> {
        let currency: CurrencyCode = self.currency_code.parse().ok()?;
        Some(Money::from_minor_units(self.amount, currency))
    }
}

impl Product {
    /// The first variant's price in the given currency, the price the
    /// product list and details screens display.
    #[must_use]
    pub fn price_in(&self, currency: CurrencyCode) -> Option<Money> {
        self.variants.first()?.prices.iter().find_map(|price| {
            price
                .money()
                .filter(|money| money.currency_code == currency)
        })
    }

    /// Build a cart line for this product at its current price.
    ///
    /// Returns `None` when the product has no price in the given currency.
    /// The price is captured here; later catalog changes do not affect the
    /// line.
    #[must_use]
    pub fn to_cart_item(&self, quantity: u32, currency: CurrencyCode) -> Option<CartItem> {
        Some(CartItem {
            id: self.id.clone(),
            name: self.title.clone(),
            unit_price: self.price_in(currency)?,
            quantity,
            thumbnail: self.thumbnail.clone(),
        })
    }
}

/// Query parameters for the paginated product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListParams {
    /// Page size.
    pub limit: Option<u32>,
    /// Page start.
    pub offset: Option<u32>,
    /// Free-text search query.
    pub q: Option<String>,
}

/// One page of the product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListPage {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Total products matching the query.
    pub count: u64,
    /// Offset of this page.
    pub offset: u64,
    /// Requested page size.
    pub limit: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "prod_01",
            "title": "Loose Leaf Tea",
            "description": "A tin of loose leaf tea.",
            "thumbnail": "https://cdn.example/tea.png",
            "handle": "loose-leaf-tea",
            "variants": [
                {
                    "id": "variant_01",
                    "title": "Default",
                    "prices": [
                        { "amount": 1000, "currency_code": "usd" },
                        { "amount": 900, "currency_code": "eur" }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_deserializes_backend_payload() {
        let product = product();
        assert_eq!(product.id, ProductId::new("prod_01"));
        assert_eq!(product.variants.len(), 1);
    }

    #[test]
    fn test_price_in_selects_currency() {
        let product = product();
        assert_eq!(
            product.price_in(CurrencyCode::USD).unwrap(),
            Money::from_minor_units(1000, CurrencyCode::USD)
        );
        assert_eq!(
            product.price_in(CurrencyCode::EUR).unwrap(),
            Money::from_minor_units(900, CurrencyCode::EUR)
        );
        assert!(product.price_in(CurrencyCode::GBP).is_none());
    }

    #[test]
    fn test_to_cart_item_captures_price() {
        let line = product().to_cart_item(2, CurrencyCode::USD).unwrap();
        assert_eq!(line.name, "Loose Leaf Tea");
        assert_eq!(line.quantity, 2);
        assert_eq!(
            line.unit_price,
            Money::from_minor_units(1000, CurrencyCode::USD)
        );
        assert_eq!(line.thumbnail.as_deref(), Some("https://cdn.example/tea.png"));
    }

    #[test]
    fn test_unsupported_currency_price_is_none() {
        let price = ProductPrice {
            amount: 100,
            currency_code: "jpy".to_owned(),
        };
        assert!(price.money().is_none());
    }
}
