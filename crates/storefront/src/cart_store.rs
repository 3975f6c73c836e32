//! Cart state with persistence.
//!
//! `CartStore` is the effectful shell around the pure [`Cart`]: it loads the
//! cart from a [`KeyValueStore`] at startup, runs each mutation through the
//! core, writes the result back exactly once and reports what the shopper
//! should be told.
//!
//! A failed write never rolls back the in-memory change. The outcome carries
//! the storage error so the caller can warn the shopper; the next successful
//! write brings storage back in line.

use pocket_cart_core::{
    Cart, CartCommand, CartError, CartEvent, LineItemId, persisted,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::storage::{KeyValueStore, StoreError, StoreResult};

/// Default storage key for the cart.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Severity of a message shown to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the shopper after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// CSS class suffix used by the notice template.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

impl From<&CartError> for Notice {
    fn from(err: &CartError) -> Self {
        Self::error(err.user_message())
    }
}

/// Message shown when the cart could not be written to storage.
pub const PERSISTENCE_WARNING: &str = "Error saving cart. Please check your browser storage.";

/// Result of a successful mutation.
#[derive(Debug)]
pub struct CartOutcome {
    /// What changed.
    pub event: CartEvent,
    /// Set when the change is in memory but could not be saved.
    pub persist_error: Option<StoreError>,
}

impl CartOutcome {
    /// Whether the change reached storage.
    #[must_use]
    pub const fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Messages for the shopper, in display order.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();

        if self.persist_error.is_some() {
            notices.push(Notice::warning(PERSISTENCE_WARNING));
        }

        match &self.event {
            CartEvent::ItemAdded { name, added, .. } => {
                notices.push(Notice::info(format!("{added}x {name} added to cart!")));
            }
            CartEvent::Purchased { .. } => {
                notices.push(Notice::info("Purchase Successful!"));
            }
            CartEvent::QuantityIncreased { .. }
            | CartEvent::QuantityDecreased { .. }
            | CartEvent::ItemRemoved { .. } => {}
        }

        notices
    }
}

/// The shopper's cart, mirrored to a key-value store after every change.
pub struct CartStore {
    cart: Cart,
    storage: Box<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart stored under `key`.
    ///
    /// Never fails: a missing, unreadable or undecodable value yields an empty
    /// cart. Legacy records are migrated and written back once.
    #[instrument(skip_all, fields(key = %key.as_ref()))]
    pub fn initialize(storage: impl KeyValueStore + 'static, key: impl AsRef<str>) -> Self {
        let key = key.as_ref().to_string();
        let storage: Box<dyn KeyValueStore> = Box::new(storage);
        let cart = load(storage.as_ref(), &key);

        let store = Self { cart, storage, key };
        tracing::info!(
            lines = store.cart.len(),
            items = store.cart.total_item_count(),
            "Cart loaded"
        );
        store
    }

    /// Current cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage key the cart is saved under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sum of quantities, shown on the badge.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Run a command, then persist.
    ///
    /// # Errors
    ///
    /// Returns the `CartError` from validation; neither the cart nor storage
    /// is touched in that case.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn apply(&mut self, command: CartCommand) -> Result<CartOutcome, CartError> {
        let event = self.cart.apply(command).inspect_err(|e| {
            tracing::info!(error = %e, "Cart command rejected");
        })?;
        tracing::debug!(?event, "Cart updated");

        let persist_error = self.save().err();
        if let Some(e) = &persist_error {
            tracing::warn!(error = %e, "Failed to persist cart, keeping in-memory change");
        }

        Ok(CartOutcome {
            event,
            persist_error,
        })
    }

    /// Add `quantity` units of `(name, price)`.
    ///
    /// # Errors
    ///
    /// `InvalidPrice`, `QuantityLimitExceeded`, `InvalidQuantity`, `EmptyName`
    /// or `QuantityOverflow`.
    pub fn add_item(
        &mut self,
        name: &str,
        price: Decimal,
        quantity: i64,
    ) -> Result<CartOutcome, CartError> {
        self.apply(CartCommand::add_item(name, price, quantity)?)
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// `LineItemNotFound` for an unknown id.
    pub fn increase_quantity(&mut self, id: LineItemId) -> Result<CartOutcome, CartError> {
        self.apply(CartCommand::IncreaseQuantity(id))
    }

    /// Take one unit off a line, removing it at zero.
    ///
    /// # Errors
    ///
    /// `LineItemNotFound` for an unknown id.
    pub fn decrease_quantity(&mut self, id: LineItemId) -> Result<CartOutcome, CartError> {
        self.apply(CartCommand::DecreaseQuantity(id))
    }

    /// Delete a line.
    ///
    /// # Errors
    ///
    /// `LineItemNotFound` for an unknown id.
    pub fn remove_item(&mut self, id: LineItemId) -> Result<CartOutcome, CartError> {
        self.apply(CartCommand::RemoveItem(id))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// `EmptyCart` if there is nothing to purchase.
    pub fn purchase(&mut self) -> Result<CartOutcome, CartError> {
        self.apply(CartCommand::Purchase)
    }

    /// Write the current cart to storage.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails.
    pub fn save(&self) -> StoreResult<()> {
        let value = persisted::encode(&self.cart)
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;
        self.storage.set(&self.key, &value)
    }
}

fn load(storage: &dyn KeyValueStore, key: &str) -> Cart {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No stored cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
            return Cart::new();
        }
    };

    match persisted::decode(&raw) {
        Ok(decoded) => {
            if decoded.migrated {
                tracing::info!("Migrating stored cart to current format");
                match persisted::encode(&decoded.cart) {
                    Ok(value) => {
                        if let Err(e) = storage.set(key, &value) {
                            tracing::warn!(error = %e, "Failed to write migrated cart");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to encode migrated cart"),
                }
            }
            decoded.cart
        }
        Err(e) => {
            tracing::warn!(error = %e, "Stored cart is unreadable, starting empty");
            Cart::new()
        }
    }
}
