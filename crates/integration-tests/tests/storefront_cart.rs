//! Integration tests for the storefront cart routes.
//!
//! These drive the full router (middleware included) against an in-memory
//! store, the same way HTMX requests from the cart page would.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::StatusCode;
use pocket_cart_core::{LineItemId, persisted};
use pocket_cart_integration_tests::{TestApp, body_text, get, post_form};
use pocket_cart_storefront::storage::{KeyValueStore, MemoryStore};
use rust_decimal::Decimal;
use tower::ServiceExt;

fn line_ids(app: &TestApp) -> Vec<LineItemId> {
    let store = app.state.cart().unwrap();
    store.cart().items().iter().map(|item| item.id()).collect()
}

async fn add(app: &TestApp, form: &str) -> axum::response::Response {
    app.router
        .clone()
        .oneshot(post_form("/cart/add", form))
        .await
        .unwrap()
}

// =============================================================================
// Pages and Fragments
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_empty_cart_page() {
    let app = TestApp::new();
    let response = app.router.clone().oneshot(get("/cart")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Your cart is empty."));
    assert!(body.contains("Total: ₱0"));
    assert!(body.contains("Cart (0)"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .uri("/cart/count")
        .header("x-request-id", "req-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_merges_and_updates_badge() {
    let app = TestApp::new();

    let response = add(&app, "name=Burger&price=120&quantity=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["HX-Trigger"], "cart-updated");
    assert!(body_text(response).await.contains("2x Burger added to cart!"));

    let response = add(&app, "name=Burger&price=120").await;
    assert!(body_text(response).await.contains("1x Burger added to cart!"));

    let count = app.router.clone().oneshot(get("/cart/count")).await.unwrap();
    assert!(body_text(count).await.contains("Cart (3)"));

    let page = body_text(app.router.clone().oneshot(get("/cart")).await.unwrap()).await;
    assert!(page.contains("Burger - ₱120 each"));
    assert!(page.contains("Subtotal: ₱360"));
    assert!(page.contains("Total: ₱360"));
    assert_eq!(line_ids(&app).len(), 1);
}

#[tokio::test]
async fn test_add_same_name_different_price() {
    let app = TestApp::new();
    add(&app, "name=Coffee&price=80").await;
    add(&app, "name=Coffee&price=95").await;
    assert_eq!(line_ids(&app).len(), 2);
}

#[tokio::test]
async fn test_add_rejects_invalid_price() {
    let app = TestApp::new();

    for form in [
        "name=Burger&price=0&quantity=1",
        "name=Burger&price=-5&quantity=1",
        "name=Burger&price=abc&quantity=1",
    ] {
        let response = add(&app, form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!response.headers().contains_key("HX-Trigger"));
        assert_eq!(body_text(response).await, "Invalid item price.");
    }

    assert!(line_ids(&app).is_empty());
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_add_quantity_limit() {
    let app = TestApp::new();

    let response = add(&app, "name=Pizza&price=10&quantity=51").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Maximum quantity per addition is 50."
    );
    assert!(line_ids(&app).is_empty());

    let response = add(&app, "name=Pizza&price=10&quantity=50").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.state.cart().unwrap().total_item_count(), 50);
}

#[tokio::test]
async fn test_add_rejects_zero_quantity() {
    let app = TestApp::new();
    let response = add(&app, "name=Pizza&price=10&quantity=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(line_ids(&app).is_empty());
}

#[tokio::test]
async fn test_add_rejects_non_numeric_quantity() {
    let app = TestApp::new();

    for form in [
        "name=Pizza&price=10&quantity=",
        "name=Pizza&price=10&quantity=abc",
    ] {
        let response = add(&app, form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Quantity must be at least 1.");
    }

    // A bad price is still reported first
    let response = add(&app, "name=Pizza&price=free&quantity=abc").await;
    assert_eq!(body_text(response).await, "Invalid item price.");
    assert!(line_ids(&app).is_empty());
}

#[tokio::test]
async fn test_oversized_price_is_rejected_and_server_keeps_serving() {
    let app = TestApp::new();

    let response = add(&app, "name=Gold&price=79228162514264337593543950335&quantity=2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid item price.");

    let page = app.router.clone().oneshot(get("/cart")).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_total_overflow_is_rejected_and_server_keeps_serving() {
    let storage = Arc::new(MemoryStore::with_value(
        "cart",
        r#"[{"name":"Gold","price":1e24,"qty":79228}]"#,
    ));
    let app = TestApp::with_storage(storage);
    let ids = line_ids(&app);

    let response = app
        .router
        .clone()
        .oneshot(post_form("/cart/increase", &format!("line_id={}", ids[0])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Quantity is too large.");

    let response = add(&app, "name=Silver&price=1000000000000000000000000").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let page = app.router.clone().oneshot(get("/cart")).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("Cart (79228)"));
}

// =============================================================================
// Quantity Changes and Removal
// =============================================================================

#[tokio::test]
async fn test_increase_and_decrease() {
    let app = TestApp::new();
    add(&app, "name=A&price=10&quantity=2").await;
    add(&app, "name=B&price=5&quantity=1").await;
    let ids = line_ids(&app);

    let response = app
        .router
        .clone()
        .oneshot(post_form("/cart/increase", &format!("line_id={}", ids[0])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["HX-Trigger"], "cart-updated");
    let body = body_text(response).await;
    assert!(body.contains("Subtotal: ₱30"));
    assert!(body.contains("Total: ₱35"));

    // Decrease at quantity 1 removes the line entirely
    let response = app
        .router
        .clone()
        .oneshot(post_form("/cart/decrease", &format!("line_id={}", ids[1])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("B - ₱5 each"));
    assert_eq!(line_ids(&app), vec![ids[0]]);
}

#[tokio::test]
async fn test_remove_first_line() {
    let app = TestApp::new();
    add(&app, "name=A&price=10&quantity=2").await;
    add(&app, "name=B&price=5&quantity=1").await;
    let ids = line_ids(&app);

    let response = app
        .router
        .clone()
        .oneshot(post_form("/cart/remove", &format!("line_id={}", ids[0])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("B - ₱5 each"));
    assert!(body.contains("Total: ₱5"));
    assert_eq!(line_ids(&app), vec![ids[1]]);
    assert_eq!(app.state.cart().unwrap().total_item_count(), 1);
}

#[tokio::test]
async fn test_stale_line_id_is_not_found() {
    let app = TestApp::new();
    add(&app, "name=A&price=10&quantity=1").await;
    let ids = line_ids(&app);

    let remove = || {
        app.router
            .clone()
            .oneshot(post_form("/cart/remove", &format!("line_id={}", ids[0])))
    };
    assert_eq!(remove().await.unwrap().status(), StatusCode::OK);

    // A second click from the same stale page
    let response = remove().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(line_ids(&app).is_empty());
}

#[tokio::test]
async fn test_malformed_line_id_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(post_form("/cart/increase", "line_id=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Purchase
// =============================================================================

#[tokio::test]
async fn test_purchase_empty_cart() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(post_form("/cart/purchase", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Your cart is empty.");
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_purchase_clears_cart_and_storage() {
    let app = TestApp::new();
    add(&app, "name=A&price=10&quantity=2").await;
    add(&app, "name=B&price=5&quantity=1").await;

    let response = app
        .router
        .clone()
        .oneshot(post_form("/cart/purchase", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Purchase Successful!"));
    assert!(body.contains("Your cart is empty."));

    assert_eq!(app.state.cart().unwrap().total_item_count(), 0);
    let stored = app.storage.get("cart").unwrap().unwrap();
    assert_eq!(stored, "[]");
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_mutations_are_persisted() {
    let app = TestApp::new();
    add(&app, "name=Burger&price=120&quantity=2").await;
    add(&app, "name=Iced+Tea&price=35.5&quantity=2").await;

    let stored = app.storage.get("cart").unwrap().unwrap();
    let decoded = persisted::decode(&stored).unwrap();
    assert_eq!(decoded.cart.len(), 2);
    assert_eq!(decoded.cart.items()[1].name(), "Iced Tea");
    assert_eq!(decoded.cart.total_price(), Decimal::from(311));

    // A restarted server sees the same cart
    let restarted = TestApp::with_storage(Arc::clone(&app.storage));
    assert_eq!(line_ids(&restarted), line_ids(&app));
}

#[tokio::test]
async fn test_persistence_failure_is_a_warning() {
    let app = TestApp::new();
    app.storage.set_unavailable(true);

    let response = add(&app, "name=Burger&price=120&quantity=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Error saving cart. Please check your browser storage."));
    assert!(body.contains("1x Burger added to cart!"));

    // The in-memory cart kept the change
    assert_eq!(app.state.cart().unwrap().total_item_count(), 1);
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_legacy_storage_is_migrated_on_start() {
    let storage = Arc::new(MemoryStore::with_value(
        "cart",
        r#"[{"name":"Burger","price":120},{"name":"Fries","price":45,"qty":2}]"#,
    ));
    let app = TestApp::with_storage(storage);

    let count = app.router.clone().oneshot(get("/cart/count")).await.unwrap();
    assert!(body_text(count).await.contains("Cart (3)"));

    let stored = app.storage.get("cart").unwrap().unwrap();
    assert!(!persisted::decode(&stored).unwrap().migrated);
}

#[tokio::test]
async fn test_corrupt_storage_starts_empty() {
    let storage = Arc::new(MemoryStore::with_value("cart", "][ definitely not json"));
    let app = TestApp::with_storage(storage);

    let page = body_text(app.router.clone().oneshot(get("/cart")).await.unwrap()).await;
    assert!(page.contains("Cart (0)"));

    add(&app, "name=A&price=1").await;
    let stored = app.storage.get("cart").unwrap().unwrap();
    assert_eq!(persisted::decode(&stored).unwrap().cart.len(), 1);
}
