//! Display models for the cart page and badge.
//!
//! Views are rebuilt from the whole cart on every render. Templates only see
//! preformatted strings.

use pocket_cart_core::{Cart, LineItem};
use rust_decimal::Decimal;
use serde::Serialize;

/// Formats amounts as `symbol` followed by the shortest decimal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    symbol: String,
}

impl PriceFormat {
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    /// Format an amount, e.g. `₱120` or `₱12.5`.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        format!("{}{}", self.symbol, amount.normalize())
    }
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self::new("₱")
    }
}

/// Cart item display data for templates.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub position: usize,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_price: String,
}

impl CartItemView {
    fn new(position: usize, item: &LineItem, format: &PriceFormat) -> Self {
        Self {
            id: item.id().to_string(),
            position,
            name: item.name().to_string(),
            price: format.format(item.unit_price().amount()),
            quantity: item.quantity().get(),
            line_price: format.format(item.subtotal()),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Build the full view of `cart`.
    #[must_use]
    pub fn build(cart: &Cart, format: &PriceFormat) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .enumerate()
                .map(|(position, item)| CartItemView::new(position, item, format))
                .collect(),
            total: format.format(cart.total_price()),
            item_count: cart.total_item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Navigation badge text, e.g. `Cart (3)`.
#[must_use]
pub fn badge_label(count: u64) -> String {
    format!("Cart ({count})")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_price_format() {
        let format = PriceFormat::default();
        assert_eq!(format.format(Decimal::from(120)), "₱120");
        assert_eq!(format.format(Decimal::new(1250, 2)), "₱12.5");
        assert_eq!(format.format(Decimal::ZERO), "₱0");
        assert_eq!(PriceFormat::new("$").format(Decimal::new(199, 2)), "$1.99");
    }

    #[test]
    fn test_build_view() {
        let mut cart = Cart::new();
        cart.add_item("Burger", Decimal::from(120), 3).unwrap();
        cart.add_item("Iced Tea", Decimal::new(355, 1), 2).unwrap();

        let view = CartView::build(&cart, &PriceFormat::default());
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].position, 0);
        assert_eq!(view.items[0].name, "Burger");
        assert_eq!(view.items[0].price, "₱120");
        assert_eq!(view.items[0].quantity, 3);
        assert_eq!(view.items[0].line_price, "₱360");
        assert_eq!(view.items[1].line_price, "₱71");
        assert_eq!(view.items[1].id, cart.items()[1].id().to_string());
        assert_eq!(view.total, "₱431");
        assert_eq!(view.item_count, 5);
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::build(&Cart::new(), &PriceFormat::default());
        assert!(view.is_empty());
        assert_eq!(view.total, "₱0");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_badge_label() {
        assert_eq!(badge_label(0), "Cart (0)");
        assert_eq!(badge_label(12), "Cart (12)");
    }
}
