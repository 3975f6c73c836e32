//! Pocket Cart Storefront library.
//!
//! This crate provides the cart page, badge and cart persistence as a
//! library, allowing it to be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_store;
pub mod config;
pub mod error;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod state;
pub mod storage;

pub use cart_store::{CartOutcome, CartStore, Notice, NoticeLevel};
pub use config::StorefrontConfig;
pub use state::AppState;
