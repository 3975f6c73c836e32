//! The cart aggregate.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s with at most one line per
//! `(name, unit price)` pair. All mutations go through methods that validate
//! first and then either apply the whole change or nothing at all.
//!
//! # Example
//!
//! ```rust
//! use pocket_cart_core::Cart;
//! use rust_decimal::Decimal;
//!
//! let mut cart = Cart::new();
//! cart.add_item("Burger", Decimal::from(120), 2).unwrap();
//! cart.add_item("Burger", Decimal::from(120), 1).unwrap();
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.total_item_count(), 3);
//! assert_eq!(cart.total_price(), Decimal::from(360));
//! ```

use rust_decimal::Decimal;

use crate::error::CartError;
use crate::types::{LineItemId, Quantity, UnitPrice};

/// Largest quantity a single add action may request.
pub const MAX_QUANTITY_PER_ADD: u32 = 50;

/// One distinct `(name, unit price)` entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    id: LineItemId,
    name: String,
    unit_price: UnitPrice,
    quantity: Quantity,
}

impl LineItem {
    pub(crate) fn new(name: String, unit_price: UnitPrice, quantity: Quantity) -> Self {
        Self::with_id(LineItemId::generate(), name, unit_price, quantity)
    }

    pub(crate) const fn with_id(
        id: LineItemId,
        name: String,
        unit_price: UnitPrice,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            name,
            unit_price,
            quantity,
        }
    }

    #[must_use]
    pub const fn id(&self) -> LineItemId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> UnitPrice {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// `unit_price * quantity`.
    ///
    /// Saturates at `Decimal::MAX`; lines in a [`Cart`] always fit.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.checked_subtotal().unwrap_or(Decimal::MAX)
    }

    /// `unit_price * quantity`, or `None` on overflow.
    #[must_use]
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_times(self.quantity)
    }

    /// Whether this line is the merge target for `(name, unit_price)`.
    #[must_use]
    pub fn matches(&self, name: &str, unit_price: UnitPrice) -> bool {
        self.name == name && self.unit_price == unit_price
    }
}

/// Units of an item that passed add validation.
///
/// Only built by the `CartCommand::add_item*` constructors, so the name is
/// never blank and the quantity is within [`MAX_QUANTITY_PER_ADD`].
///
/// ```compile_fail
/// use pocket_cart_core::{NewItem, Quantity, UnitPrice};
/// use rust_decimal::Decimal;
///
/// let item = NewItem {
///     name: String::new(),
///     unit_price: UnitPrice::new(Decimal::ONE).unwrap(),
///     quantity: Quantity::new(500).unwrap(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
    unit_price: UnitPrice,
    quantity: Quantity,
}

impl NewItem {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> UnitPrice {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// A validated request to change the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    AddItem(NewItem),
    IncreaseQuantity(LineItemId),
    DecreaseQuantity(LineItemId),
    RemoveItem(LineItemId),
    Purchase,
}

impl CartCommand {
    /// Build an add command from raw UI input.
    ///
    /// Price is checked before quantity, then the name.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidPrice` if `price` is not positive
    /// - `CartError::QuantityLimitExceeded` if `quantity` exceeds [`MAX_QUANTITY_PER_ADD`]
    /// - `CartError::InvalidQuantity` if `quantity` is below 1
    /// - `CartError::EmptyName` if `name` is blank
    pub fn add_item(name: &str, price: Decimal, quantity: i64) -> Result<Self, CartError> {
        Self::add_validated(
            name,
            UnitPrice::new(price),
            Quantity::for_addition(quantity, MAX_QUANTITY_PER_ADD),
        )
    }

    /// Like [`CartCommand::add_item`], with the price still as text.
    ///
    /// # Errors
    ///
    /// Same as [`CartCommand::add_item`]; unparseable prices are `InvalidPrice`.
    pub fn add_item_from_str(name: &str, price: &str, quantity: i64) -> Result<Self, CartError> {
        Self::add_validated(
            name,
            UnitPrice::parse(price),
            Quantity::for_addition(quantity, MAX_QUANTITY_PER_ADD),
        )
    }

    /// Build an add command from form fields. A missing quantity means one.
    ///
    /// # Errors
    ///
    /// Same as [`CartCommand::add_item_from_str`]; a quantity that is not a
    /// whole number is `InvalidQuantity`.
    pub fn add_item_from_input(
        name: &str,
        price: &str,
        quantity: Option<&str>,
    ) -> Result<Self, CartError> {
        let quantity = quantity.map_or(Ok(Quantity::ONE), |raw| {
            Quantity::parse_addition(raw, MAX_QUANTITY_PER_ADD)
        });
        Self::add_validated(name, UnitPrice::parse(price), quantity)
    }

    fn add_validated(
        name: &str,
        unit_price: Result<UnitPrice, CartError>,
        quantity: Result<Quantity, CartError>,
    ) -> Result<Self, CartError> {
        let unit_price = unit_price?;
        let quantity = quantity?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CartError::EmptyName);
        }

        Ok(Self::AddItem(NewItem {
            name: name.to_string(),
            unit_price,
            quantity,
        }))
    }
}

/// Record of a change applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// Units were added, either to a new line or merged into an existing one.
    ItemAdded {
        id: LineItemId,
        name: String,
        added: Quantity,
        quantity: Quantity,
        merged: bool,
    },
    QuantityIncreased {
        id: LineItemId,
        quantity: Quantity,
    },
    QuantityDecreased {
        id: LineItemId,
        quantity: Quantity,
    },
    /// The line was deleted; items after `position` moved up by one.
    ItemRemoved {
        id: LineItemId,
        name: String,
        position: usize,
    },
    /// The cart was emptied by a purchase.
    Purchased { item_count: u64, total: Decimal },
}

impl CartEvent {
    /// Whether the number of lines changed.
    #[must_use]
    pub const fn changes_line_count(&self) -> bool {
        match self {
            Self::ItemAdded { merged, .. } => !*merged,
            Self::ItemRemoved { .. } | Self::Purchased { .. } => true,
            Self::QuantityIncreased { .. } | Self::QuantityDecreased { .. } => false,
        }
    }
}

/// Ordered collection of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines already known to have distinct identity keys.
    pub(crate) const fn from_lines(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Current display position of a line.
    #[must_use]
    pub fn position(&self, id: LineItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Apply a validated command.
    ///
    /// # Errors
    ///
    /// Returns the `CartError` of the underlying operation; the cart is
    /// unchanged on error.
    pub fn apply(&mut self, command: CartCommand) -> Result<CartEvent, CartError> {
        match command {
            CartCommand::AddItem(item) => self.add(item),
            CartCommand::IncreaseQuantity(id) => self.increase_quantity(id),
            CartCommand::DecreaseQuantity(id) => self.decrease_quantity(id),
            CartCommand::RemoveItem(id) => self.remove_item(id),
            CartCommand::Purchase => self.purchase(),
        }
    }

    /// Validate raw input and add it to the cart.
    ///
    /// # Errors
    ///
    /// See [`CartCommand::add_item`].
    pub fn add_item(
        &mut self,
        name: &str,
        price: Decimal,
        quantity: i64,
    ) -> Result<CartEvent, CartError> {
        let command = CartCommand::add_item(name, price, quantity)?;
        self.apply(command)
    }

    /// Add units of `(name, unit_price)`, merging into an existing line.
    fn add(&mut self, item: NewItem) -> Result<CartEvent, CartError> {
        let NewItem {
            name,
            unit_price,
            quantity,
        } = item;
        self.ensure_total_fits(unit_price, quantity)?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.matches(&name, unit_price))
        {
            existing.quantity = existing.quantity.checked_add(quantity)?;
            return Ok(CartEvent::ItemAdded {
                id: existing.id,
                name,
                added: quantity,
                quantity: existing.quantity,
                merged: true,
            });
        }

        let item = LineItem::new(name.clone(), unit_price, quantity);
        let id = item.id;
        self.items.push(item);
        Ok(CartEvent::ItemAdded {
            id,
            name,
            added: quantity,
            quantity,
            merged: false,
        })
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// - `CartError::LineItemNotFound` if `id` is not in the cart
    /// - `CartError::QuantityOverflow` if the quantity or the cart total does not fit
    pub fn increase_quantity(&mut self, id: LineItemId) -> Result<CartEvent, CartError> {
        let unit_price = self.line_mut(id)?.unit_price;
        self.ensure_total_fits(unit_price, Quantity::ONE)?;

        let item = self.line_mut(id)?;
        item.quantity = item.quantity.checked_add(Quantity::ONE)?;
        Ok(CartEvent::QuantityIncreased {
            id,
            quantity: item.quantity,
        })
    }

    /// Take one unit off a line, removing the line when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineItemNotFound` if `id` is not in the cart.
    pub fn decrease_quantity(&mut self, id: LineItemId) -> Result<CartEvent, CartError> {
        let item = self.line_mut(id)?;
        match item.quantity.decremented() {
            Some(quantity) => {
                item.quantity = quantity;
                Ok(CartEvent::QuantityDecreased { id, quantity })
            }
            None => self.remove_item(id),
        }
    }

    /// Delete a line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineItemNotFound` if `id` is not in the cart.
    pub fn remove_item(&mut self, id: LineItemId) -> Result<CartEvent, CartError> {
        let position = self
            .position(id)
            .ok_or(CartError::LineItemNotFound(id))?;
        let item = self.items.remove(position);
        Ok(CartEvent::ItemRemoved {
            id,
            name: item.name,
            position,
        })
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptyCart` if there is nothing to purchase.
    pub fn purchase(&mut self) -> Result<CartEvent, CartError> {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let event = CartEvent::Purchased {
            item_count: self.total_item_count(),
            total: self.total_price(),
        };
        self.items.clear();
        Ok(event)
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of line subtotals.
    ///
    /// Saturates at `Decimal::MAX`; mutations that would overflow the total
    /// are rejected, so a cart's total always fits.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.checked_total_price().unwrap_or(Decimal::MAX)
    }

    /// Sum of line subtotals, or `None` on overflow.
    #[must_use]
    pub fn checked_total_price(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |total, item| {
            total.checked_add(item.checked_subtotal()?)
        })
    }

    /// Reject adding `quantity` units at `unit_price` when the total would overflow.
    fn ensure_total_fits(
        &self,
        unit_price: UnitPrice,
        quantity: Quantity,
    ) -> Result<(), CartError> {
        unit_price
            .checked_times(quantity)
            .zip(self.checked_total_price())
            .and_then(|(added, total)| total.checked_add(added))
            .map(|_| ())
            .ok_or(CartError::QuantityOverflow)
    }

    fn line_mut(&mut self, id: LineItemId) -> Result<&mut LineItem, CartError> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CartError::LineItemNotFound(id))
    }
}
