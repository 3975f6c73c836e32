//! Stored form of the cart.
//!
//! The cart is persisted under a single key as a JSON array:
//!
//! ```json
//! [{"id": "6f1c...", "name": "Burger", "price": 120.0, "qty": 3}]
//! ```
//!
//! Older stores wrote records without `id`, and the oldest without `qty`.
//! [`decode`] accepts those records, fills in a fresh id and a quantity of 1,
//! merges lines that share a `(name, price)` key and reports the value as
//! migrated so the caller can write the current format back once. Everything
//! [`encode`] writes carries all four fields.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, LineItem};
use crate::types::{LineItemId, Quantity, UnitPrice};

/// Errors decoding a stored cart value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored cart is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored cart record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// A decoded cart and whether the stored value needed migrating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCart {
    pub cart: Cart,
    pub migrated: bool,
}

#[derive(Serialize)]
struct StoredLineItem<'a> {
    id: LineItemId,
    name: &'a str,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    price: Decimal,
    qty: u32,
}

impl<'a> From<&'a LineItem> for StoredLineItem<'a> {
    fn from(item: &'a LineItem) -> Self {
        Self {
            id: item.id(),
            name: item.name(),
            price: item.unit_price().amount(),
            qty: item.quantity().get(),
        }
    }
}

/// Any record shape a store may hold, current or legacy.
#[derive(Deserialize)]
struct RawLineItem {
    #[serde(default)]
    id: Option<LineItemId>,
    name: String,
    price: Decimal,
    #[serde(default)]
    qty: Option<u32>,
}

/// Serialize a cart to its stored JSON form.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    let records: Vec<StoredLineItem<'_>> = cart.items().iter().map(StoredLineItem::from).collect();
    serde_json::to_string(&records)
}

/// Parse a stored cart value, migrating legacy records.
///
/// # Errors
///
/// - `DecodeError::Json` if the value is not an array of records
/// - `DecodeError::InvalidRecord` if a record has an empty name, an
///   invalid price or a zero quantity, or the cart total overflows
pub fn decode(raw: &str) -> Result<DecodedCart, DecodeError> {
    let records: Vec<RawLineItem> = serde_json::from_str(raw)?;

    let mut migrated = false;
    let mut seen_ids = HashSet::with_capacity(records.len());
    let mut items: Vec<LineItem> = Vec::with_capacity(records.len());
    let mut total = Decimal::ZERO;

    for (index, record) in records.into_iter().enumerate() {
        let invalid = |reason: &str| DecodeError::InvalidRecord {
            index,
            reason: reason.to_string(),
        };

        let name = record.name.trim();
        if name.is_empty() {
            return Err(invalid("empty name"));
        }
        let unit_price = UnitPrice::new(record.price).map_err(|_| invalid("invalid price"))?;
        let quantity = match record.qty {
            Some(qty) => Quantity::new(qty).ok_or_else(|| invalid("zero quantity"))?,
            None => {
                migrated = true;
                Quantity::ONE
            }
        };
        total = unit_price
            .checked_times(quantity)
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or_else(|| invalid("cart total overflow"))?;

        if let Some(existing) = items
            .iter_mut()
            .find(|item| item.matches(name, unit_price))
        {
            migrated = true;
            let merged = existing
                .quantity()
                .checked_add(quantity)
                .map_err(|_| invalid("quantity overflow while merging duplicates"))?;
            *existing = LineItem::with_id(existing.id(), name.to_string(), unit_price, merged);
            continue;
        }

        let id = match record.id {
            Some(id) if seen_ids.insert(id) => id,
            _ => {
                migrated = true;
                let id = LineItemId::generate();
                seen_ids.insert(id);
                id
            }
        };
        items.push(LineItem::with_id(id, name.to_string(), unit_price, quantity));
    }

    Ok(DecodedCart {
        cart: Cart::from_lines(items),
        migrated,
    })
}
