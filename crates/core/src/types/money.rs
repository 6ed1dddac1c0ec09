//! Type-safe money representation using minor currency units.
//!
//! Commerce backends quote prices in minor units (cents for USD) alongside an
//! ISO 4217 currency code, and every cart/order computation in the client
//! works on the same representation. `rust_decimal` is used only at the
//! display boundary, so arithmetic stays in exact integer math.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors from money arithmetic.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Attempted arithmetic across two different currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: CurrencyCode,
        /// Currency of the right operand.
        right: CurrencyCode,
    },
    /// The amount does not fit in 64 bits of minor units.
    #[error("money amount overflow")]
    Overflow,
}

/// A monetary amount in minor units with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the smallest currency unit (e.g., cents for USD).
    pub amount_minor: i64,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount from minor units.
    #[must_use]
    pub const fn from_minor_units(amount_minor: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount_minor,
            currency_code,
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::from_minor_units(0, currency_code)
    }

    /// Whether this is a zero amount.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// The amount as an exact decimal in the currency's standard unit.
    #[must_use]
    pub fn decimal(&self) -> Decimal {
        Decimal::new(self.amount_minor, u32::from(self.currency_code.exponent()))
    }

    /// Add another amount of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::CurrencyMismatch` if the currencies differ and
    /// `MoneyError::Overflow` if the sum does not fit in `i64`.
    pub fn checked_add(self, rhs: Self) -> Result<Self, MoneyError> {
        if self.currency_code != rhs.currency_code {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency_code,
                right: rhs.currency_code,
            });
        }

        let amount_minor = self
            .amount_minor
            .checked_add(rhs.amount_minor)
            .ok_or(MoneyError::Overflow)?;

        Ok(Self {
            amount_minor,
            currency_code: self.currency_code,
        })
    }

    /// Multiply by a quantity.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product does not fit in `i64`.
    pub fn checked_mul(self, quantity: u32) -> Result<Self, MoneyError> {
        let amount_minor = self
            .amount_minor
            .checked_mul(i64::from(quantity))
            .ok_or(MoneyError::Overflow)?;

        Ok(Self {
            amount_minor,
            currency_code: self.currency_code,
        })
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.decimal())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Number of minor-unit digits (all supported currencies use 2).
    #[must_use]
    pub const fn exponent(&self) -> u8 {
        2
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    // Catalog responses carry lowercase codes ("usd"), hence the
    // case-insensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(format!("unsupported currency code: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_conversion() {
        let price = Money::from_minor_units(1999, CurrencyCode::USD);
        assert_eq!(price.decimal(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_display() {
        let price = Money::from_minor_units(1999, CurrencyCode::USD);
        assert_eq!(price.display(), "$19.99");

        let price = Money::from_minor_units(500, CurrencyCode::GBP);
        assert_eq!(price.display(), "\u{a3}5.00");
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_minor_units(1000, CurrencyCode::USD);
        let b = Money::from_minor_units(500, CurrencyCode::USD);
        assert_eq!(
            a.checked_add(b).unwrap(),
            Money::from_minor_units(1500, CurrencyCode::USD)
        );
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Money::from_minor_units(1000, CurrencyCode::USD);
        let b = Money::from_minor_units(500, CurrencyCode::EUR);
        assert!(matches!(
            a.checked_add(b),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_checked_mul() {
        let a = Money::from_minor_units(1000, CurrencyCode::USD);
        assert_eq!(
            a.checked_mul(2).unwrap(),
            Money::from_minor_units(2000, CurrencyCode::USD)
        );
    }

    #[test]
    fn test_overflow() {
        let a = Money::from_minor_units(i64::MAX, CurrencyCode::USD);
        assert_eq!(a.checked_mul(2), Err(MoneyError::Overflow));
        assert_eq!(a.checked_add(a), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!("EUR".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("xyz".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let price = Money::from_minor_units(2000, CurrencyCode::CAD);
        let json = serde_json::to_string(&price).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
