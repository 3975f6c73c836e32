//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! GET  /cart/items             - Cart items fragment
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/add               - Add to cart (returns notice, triggers cart-updated)
//! POST /cart/increase          - Increase quantity (returns cart_items fragment)
//! POST /cart/decrease          - Decrease quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! POST /cart/purchase          - Purchase (returns cart_items fragment)
//! ```

pub mod cart;

use axum::{
    Router,
    middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{make_request_span, request_id_middleware};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/purchase", post(cart::purchase))
}

/// Create the application router with all routes and layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(|| async { Redirect::to("/cart") }))
        .nest("/cart", cart_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
