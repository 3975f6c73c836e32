//! Cart validation errors.

use thiserror::Error;

use crate::types::LineItemId;

/// Reasons a cart operation is rejected.
///
/// A rejected operation never changes the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("price must be a positive number")]
    InvalidPrice,

    #[error("quantity {requested} exceeds the per-addition limit of {max}")]
    QuantityLimitExceeded { requested: i64, max: u32 },

    #[error("quantity must be a whole number of at least 1, got {0:?}")]
    InvalidQuantity(String),

    #[error("item name must not be empty")]
    EmptyName,

    #[error("cart is empty")]
    EmptyCart,

    #[error("line item not found: {0}")]
    LineItemNotFound(LineItemId),

    #[error("quantity overflow")]
    QuantityOverflow,
}

impl CartError {
    /// Message shown to the shopper when the operation is rejected.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPrice => "Invalid item price.".to_string(),
            Self::QuantityLimitExceeded { max, .. } => {
                format!("Maximum quantity per addition is {max}.")
            }
            Self::InvalidQuantity(_) => "Quantity must be at least 1.".to_string(),
            Self::EmptyName => "Item name is missing.".to_string(),
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::LineItemNotFound(_) => {
                "That item is no longer in your cart. Please refresh the page.".to_string()
            }
            Self::QuantityOverflow => "Quantity is too large.".to_string(),
        }
    }

    /// Whether the error comes from a stale reference rather than bad input.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::LineItemNotFound(_))
    }
}
