//! Integration tests for Pocket Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - HTTP cart routes through the full router
//! - `cart_persistence` - `CartStore` against the file store across restarts
//!
//! This crate also provides shared helpers for building a router around an
//! in-memory store and reading responses.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use pocket_cart_storefront::storage::MemoryStore;
use pocket_cart_storefront::{AppState, CartStore, StorefrontConfig, routes};

/// Router plus a handle on its backing store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub storage: Arc<MemoryStore>,
}

impl TestApp {
    /// Build an app over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStore::new()))
    }

    /// Build an app over the given store.
    #[must_use]
    pub fn with_storage(storage: Arc<MemoryStore>) -> Self {
        let config = StorefrontConfig::from_lookup(&|_| None).unwrap();
        let cart = CartStore::initialize(Arc::clone(&storage), &config.storage.key);
        let state = AppState::new(config, cart);

        Self {
            router: routes::app(state.clone()),
            state,
            storage,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a GET request.
#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Build a form POST request.
#[must_use]
pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
