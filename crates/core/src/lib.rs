//! Pocket Cart Core - Cart state machine and shared types.
//!
//! This crate provides the pure cart logic used by the other Pocket Cart
//! components:
//! - `storefront` - HTTP cart page, badge and the `CartStore` shell
//! - `cli` - Command-line access to the same persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no
//! storage access, no rendering. Every mutation validates its input, applies
//! the change and returns a [`CartEvent`] describing what happened. Callers
//! decide what to persist, render and announce based on that event.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for line item IDs, unit prices and quantities
//! - [`cart`] - The `Cart` aggregate, its commands and events
//! - [`persisted`] - Stored JSON schema with legacy migration
//! - [`error`] - Validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod error;
pub mod persisted;
pub mod types;

pub use cart::{Cart, CartCommand, CartEvent, LineItem, MAX_QUANTITY_PER_ADD, NewItem};
pub use error::CartError;
pub use persisted::{DecodeError, DecodedCart};
pub use types::*;
