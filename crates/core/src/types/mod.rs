//! Core types for Pocket Cart.
//!
//! This module provides type-safe wrappers for the cart's domain values.

pub mod id;
pub mod price;

pub use id::LineItemId;
pub use price::{Quantity, UnitPrice};
