//! In-memory shopping cart.
//!
//! The cart is memory-only by design: order completion reads the live cart
//! within the same process, and an abandoned cart not surviving a restart is
//! the accepted behavior. Everything that must survive a restart (orders,
//! wishlist, address) goes through the persisted stores.

use tokio::sync::RwLock;

use sundrop_core::{Money, MoneyError, ProductId};

use crate::models::CartItem;

/// An atomic view of the cart: the lines and their total, taken under one
/// lock acquisition so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Cart lines at snapshot time.
    pub lines: Vec<CartItem>,
    /// Sum of `unit_price * quantity` across the lines.
    pub total: Money,
}

/// Mutable list of cart lines, at most one per product id.
#[derive(Debug, Default)]
pub struct CartStore {
    lines: RwLock<Vec<CartItem>>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line to the cart.
    ///
    /// If a line with the same product id exists, its quantity is
    /// incremented by the incoming quantity; otherwise the line is appended.
    /// A zero quantity is treated as 1.
    pub async fn add_item(&self, item: CartItem) {
        let quantity = item.quantity.max(1);
        let mut lines = self.lines.write().await;

        if let Some(existing) = lines.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            tracing::debug!(product = %item.id, quantity = existing.quantity, "cart line merged");
        } else {
            tracing::debug!(product = %item.id, quantity, "cart line added");
            lines.push(CartItem { quantity, ..item });
        }
    }

    /// Remove the line with the given product id. Silent no-op if absent.
    pub async fn remove_item(&self, id: &ProductId) {
        let mut lines = self.lines.write().await;
        lines.retain(|line| &line.id != id);
    }

    /// Empty the cart unconditionally.
    pub async fn clear(&self) {
        self.lines.write().await.clear();
    }

    /// A copy of the current lines.
    pub async fn items(&self) -> Vec<CartItem> {
        self.lines.read().await.clone()
    }

    /// Whether the cart has no lines.
    pub async fn is_empty(&self) -> bool {
        self.lines.read().await.is_empty()
    }

    /// The cart total, recomputed from the current lines on every call.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError` if lines mix currencies or the sum overflows.
    pub async fn total(&self) -> Result<Money, MoneyError> {
        let lines = self.lines.read().await;
        total_of(&lines)
    }

    /// Lines and total under a single lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError` if lines mix currencies or the sum overflows.
    pub async fn snapshot(&self) -> Result<CartSnapshot, MoneyError> {
        let lines = self.lines.read().await;
        let total = total_of(&lines)?;
        Ok(CartSnapshot {
            lines: lines.clone(),
            total,
        })
    }
}

fn total_of(lines: &[CartItem]) -> Result<Money, MoneyError> {
    let mut total = Money::zero(
        lines
            .first()
            .map(|line| line.unit_price.currency_code)
            .unwrap_or_default(),
    );
    for line in lines {
        total = total.checked_add(line.line_total()?)?;
    }
    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sundrop_core::CurrencyCode;

    fn item(id: &str, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: id.to_owned(),
            unit_price: Money::from_minor_units(cents, CurrencyCode::USD),
            quantity,
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn test_adding_same_product_merges_lines() {
        let cart = CartStore::new();
        cart.add_item(item("p1", 1000, 1)).await;
        cart.add_item(item("p1", 1000, 1)).await;

        let lines = cart.items().await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 2);
        assert_eq!(
            cart.total().await.unwrap(),
            Money::from_minor_units(2000, CurrencyCode::USD)
        );
    }

    #[tokio::test]
    async fn test_add_captures_price_at_add_time() {
        let cart = CartStore::new();
        cart.add_item(item("p1", 1000, 1)).await;
        // A later add at a different catalog price still merges into the
        // existing line at its original price.
        cart.add_item(item("p1", 1200, 1)).await;

        let lines = cart.items().await;
        assert_eq!(
            lines.first().unwrap().unit_price,
            Money::from_minor_units(1000, CurrencyCode::USD)
        );
    }

    #[tokio::test]
    async fn test_total_recomputes_after_every_mutation() {
        let cart = CartStore::new();
        cart.add_item(item("p1", 1000, 2)).await;
        cart.add_item(item("p2", 500, 1)).await;
        assert_eq!(
            cart.total().await.unwrap(),
            Money::from_minor_units(2500, CurrencyCode::USD)
        );

        cart.remove_item(&ProductId::new("p1")).await;
        assert_eq!(
            cart.total().await.unwrap(),
            Money::from_minor_units(500, CurrencyCode::USD)
        );

        cart.clear().await;
        assert!(cart.total().await.unwrap().is_zero());
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let cart = CartStore::new();
        cart.add_item(item("p1", 1000, 1)).await;
        cart.remove_item(&ProductId::new("nope")).await;
        assert_eq!(cart.items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_quantity_treated_as_one() {
        let cart = CartStore::new();
        cart.add_item(item("p1", 1000, 0)).await;
        assert_eq!(cart.items().await.first().unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_snapshot_total_matches_lines() {
        let cart = CartStore::new();
        cart.add_item(item("p1", 1000, 2)).await;
        let snapshot = cart.snapshot().await.unwrap();
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(
            snapshot.total,
            Money::from_minor_units(2000, CurrencyCode::USD)
        );
    }
}
