//! Cart line items.

use serde::{Deserialize, Serialize};

use sundrop_core::{Money, MoneyError, ProductId};

/// One line of the cart: a product at its add-time price.
///
/// The unit price is captured when the line is added and is not refreshed if
/// the catalog price later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price per unit at add time.
    pub unit_price: Money,
    /// Number of units (always at least 1).
    pub quantity: u32,
    /// Optional thumbnail reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl CartItem {
    /// `unit_price * quantity` for this line.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product does not fit in `i64`
    /// minor units.
    pub fn line_total(&self) -> Result<Money, MoneyError> {
        self.unit_price.checked_mul(self.quantity)
    }
}
