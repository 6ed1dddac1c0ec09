//! Immutable order snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sundrop_core::{Money, OrderId};

use super::cart::CartItem;

/// An order: an immutable snapshot of the cart at completion time.
///
/// Orders are created only by the order recorder and never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Generated identifier, timestamp-derived with a uniqueness suffix.
    pub id: OrderId,
    /// When the order was recorded.
    pub placed_at: DateTime<Utc>,
    /// Line items copied from the cart at completion time.
    pub lines: Vec<CartItem>,
    /// Sum of `unit_price * quantity` across the lines at copy time.
    pub total: Money,
}

impl Order {
    /// Snapshot the given cart lines into a new order.
    pub(crate) fn record(lines: Vec<CartItem>, total: Money, placed_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_order_id(placed_at),
            placed_at,
            lines,
            total,
        }
    }

    /// Human-readable order date (e.g., "May 3, 2026 14:05").
    #[must_use]
    pub fn display_date(&self) -> String {
        self.placed_at.format("%b %-d, %Y %H:%M").to_string()
    }
}

/// Millisecond timestamp plus a short random suffix: sortable by creation
/// time, unique even for two orders in the same millisecond.
fn generate_order_id(placed_at: DateTime<Utc>) -> OrderId {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    OrderId::new(format!("{}-{suffix}", placed_at.timestamp_millis()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sundrop_core::{CurrencyCode, ProductId};

    fn line() -> CartItem {
        CartItem {
            id: ProductId::new("p1"),
            name: "Tea".to_owned(),
            unit_price: Money::from_minor_units(1000, CurrencyCode::USD),
            quantity: 2,
            thumbnail: None,
        }
    }

    #[test]
    fn test_record_snapshots_lines() {
        let placed_at = Utc::now();
        let order = Order::record(
            vec![line()],
            Money::from_minor_units(2000, CurrencyCode::USD),
            placed_at,
        );
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.total, Money::from_minor_units(2000, CurrencyCode::USD));
        assert_eq!(order.placed_at, placed_at);
    }

    #[test]
    fn test_generated_ids_are_unique_and_time_prefixed() {
        let placed_at = Utc::now();
        let a = generate_order_id(placed_at);
        let b = generate_order_id(placed_at);
        assert_ne!(a, b);
        assert!(
            a.as_str()
                .starts_with(&placed_at.timestamp_millis().to_string())
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let order = Order::record(
            vec![line()],
            Money::from_minor_units(2000, CurrencyCode::USD),
            Utc::now(),
        );
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
