//! Type-safe price representation using decimal arithmetic.
//!
//! The store trades in a single currency (Malaysian ringgit). Prices are
//! stored in the data files as plain JSON numbers, so `Price` serializes
//! through `rust_decimal::serde::float` instead of the string form.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-currency-tagged amount in ringgit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Display prefix for the store currency.
    pub const CURRENCY_SYMBOL: &'static str = "RM";

    /// Zero ringgit.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in sen (1/100 ringgit).
    #[must_use]
    pub fn from_sen(sen: i64) -> Self {
        Self(Decimal::new(sen, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Line total for `quantity` units at this price, or `None` on overflow.
    #[must_use]
    pub fn checked_times(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", Self::CURRENCY_SYMBOL, self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        let line = Price::from_sen(1250).checked_times(2).unwrap();
        let total = line.checked_add(Price::from_sen(399)).unwrap();
        assert_eq!(total, Price::from_sen(2899));
    }

    #[test]
    fn test_overflow_is_none() {
        let huge = Price::new(Decimal::MAX);
        assert!(huge.checked_times(2).is_none());
        assert!(huge.checked_add(Price::from_sen(100)).is_none());
        assert_eq!(huge.checked_times(1), Some(huge));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_sen(1250).to_string(), "RM 12.50");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Price::from_sen(2550)).unwrap();
        assert_eq!(json, "25.5");

        let parsed: Price = serde_json::from_str("45").unwrap();
        assert_eq!(parsed, Price::from_sen(4500));
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::from_sen(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
    }
}
