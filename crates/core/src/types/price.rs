//! Type-safe price representation.
//!
//! Prices are stored as integer cents (the smallest USD unit) and converted
//! to [`rust_decimal::Decimal`] for display and arithmetic. Storeroom is a
//! single-currency store, so no currency code is carried.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is not a valid decimal number.
    #[error("price is not a valid number")]
    Invalid,
    /// The price is negative.
    #[error("price cannot be negative")]
    Negative,
    /// The price has more than two decimal places.
    #[error("price cannot have more than two decimal places")]
    TooPrecise,
}

/// A non-negative money amount, backed by integer cents.
///
/// ## Examples
///
/// ```
/// use storeroom_core::Price;
///
/// let price = Price::parse("19.99").unwrap();
/// assert_eq!(price.as_cents(), 1999);
/// assert_eq!(price.to_string(), "$19.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Get the underlying cent count.
    #[must_use]
    pub const fn as_cents(&self) -> i64 {
        self.0
    }

    /// The amount as a two-decimal-place [`Decimal`].
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Parse a price from a decimal string such as `"19.99"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a number, is negative, or has
    /// more than two decimal places.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::Invalid)?;

        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }

        // normalize() strips trailing zeros so "1.50" and "1.5000" agree
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }

        let cents = (amount * Decimal::new(100, 0))
            .to_i64()
            .ok_or(PriceError::Invalid)?;

        Ok(Self(cents))
    }

    /// Multiply by a line quantity, saturating on overflow.
    #[must_use]
    pub const fn times(&self, quantity: i64) -> Self {
        Self(self.0.saturating_mul(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.amount())
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert_eq!(Price::parse("19.99").unwrap().as_cents(), 1999);
        assert_eq!(Price::parse("0").unwrap().as_cents(), 0);
        assert_eq!(Price::parse("10").unwrap().as_cents(), 1000);
        assert_eq!(Price::parse("1.5").unwrap().as_cents(), 150);
        assert_eq!(Price::parse(" 2.25 ").unwrap().as_cents(), 225);
        assert_eq!(Price::parse("1.5000").unwrap().as_cents(), 150);
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Price::parse("abc"), Err(PriceError::Invalid));
        assert_eq!(Price::parse(""), Err(PriceError::Invalid));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Price::parse("-1.00"), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_too_precise() {
        assert_eq!(Price::parse("1.999"), Err(PriceError::TooPrecise));
    }

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Price::from_cents(3000).to_string(), "$30.00");
        assert_eq!(Price::from_cents(105).to_string(), "$1.05");
        assert_eq!(Price::from_cents(0).to_string(), "$0.00");
    }

    #[test]
    fn test_times() {
        let price = Price::from_cents(1000);
        assert_eq!(price.times(3).as_cents(), 3000);
    }

    #[test]
    fn test_serde_roundtrip() {
        let price = Price::from_cents(1999);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "1999");
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
