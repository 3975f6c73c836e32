//! Type-safe unit price representation using decimal arithmetic.
//!
//! Prices are kept as [`Decimal`] so that line subtotals and cart totals are
//! exact. The cart deals in a single currency; formatting with a currency
//! symbol happens at render time.
//!
//! Stored carts write prices as JSON numbers, which readers take as `f64`.
//! A `UnitPrice` therefore only holds amounts that come back unchanged from
//! that trip.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// A strictly positive price for one unit of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    /// Create a unit price, rejecting zero and negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidPrice` if `amount` is not positive or has
    /// more significant digits than a JSON number keeps.
    pub fn new(amount: Decimal) -> Result<Self, CartError> {
        let amount = amount.normalize();
        if amount.is_sign_positive() && !amount.is_zero() && survives_json_number(amount) {
            Ok(Self(amount))
        } else {
            Err(CartError::InvalidPrice)
        }
    }

    /// Parse a price typed into a form or passed on the command line.
    ///
    /// Anything that is not a plain decimal number is an invalid price.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidPrice` if the string is not a positive number.
    pub fn parse(raw: &str) -> Result<Self, CartError> {
        let amount = Decimal::from_str(raw.trim()).map_err(|_| CartError::InvalidPrice)?;
        Self::new(amount)
    }

    /// Get the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, or `None` if it does not fit a `Decimal`.
    #[must_use]
    pub fn checked_times(&self, quantity: Quantity) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(quantity.get()))
    }
}

/// Whether `amount` reads back unchanged after being written as an `f64`.
fn survives_json_number(amount: Decimal) -> bool {
    amount
        .to_f64()
        .and_then(|float| Decimal::from_str(&float.to_string()).ok())
        .is_some_and(|back| back == amount)
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for UnitPrice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// A line item quantity. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Validate the quantity requested by a single add action.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidQuantity` if `requested` is below 1
    /// - `CartError::QuantityLimitExceeded` if `requested` is above `max`
    pub fn for_addition(requested: i64, max: u32) -> Result<Self, CartError> {
        if requested < 1 {
            return Err(CartError::InvalidQuantity(requested.to_string()));
        }
        if requested > i64::from(max) {
            return Err(CartError::QuantityLimitExceeded { requested, max });
        }
        u32::try_from(requested)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CartError::InvalidQuantity(requested.to_string()))
    }

    /// Like [`Quantity::for_addition`], with the quantity still as text.
    ///
    /// # Errors
    ///
    /// Same as [`Quantity::for_addition`]; text that is not a whole number
    /// is `InvalidQuantity`.
    pub fn parse_addition(raw: &str, max: u32) -> Result<Self, CartError> {
        let raw = raw.trim();
        let requested = raw
            .parse::<i64>()
            .map_err(|_| CartError::InvalidQuantity(raw.to_string()))?;
        Self::for_addition(requested, max)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Add another quantity, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns `CartError::QuantityOverflow` if the sum does not fit.
    pub fn checked_add(self, other: Self) -> Result<Self, CartError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(CartError::QuantityOverflow)
    }

    /// One less, or `None` when this is the last unit.
    #[must_use]
    pub const fn decremented(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        Self::new(value).ok_or_else(|| serde::de::Error::custom("quantity must be at least 1"))
    }
}
