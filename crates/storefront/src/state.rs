//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::cart_store::CartStore;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::render::PriceFormat;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart sits behind a mutex
/// so each request's mutation, save and render run as one uninterrupted
/// step, in arrival order.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    price_format: PriceFormat,
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create a new application state around an initialized cart store.
    #[must_use]
    pub fn new(config: StorefrontConfig, cart: CartStore) -> Self {
        let price_format = PriceFormat::new(config.currency_symbol.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                price_format,
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the price formatter for rendering.
    #[must_use]
    pub fn price_format(&self) -> &PriceFormat {
        &self.inner.price_format
    }

    /// Lock the cart for the duration of one action.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a previous holder panicked.
    pub fn cart(&self) -> Result<MutexGuard<'_, CartStore>, AppError> {
        self.inner
            .cart
            .lock()
            .map_err(|_| AppError::Internal("cart lock poisoned".to_string()))
    }
}
