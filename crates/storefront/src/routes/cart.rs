//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutating response carries an `HX-Trigger: cart-updated` header so
//! the navigation badge refetches its count.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use pocket_cart_core::{CartCommand, LineItemId};
use serde::Deserialize;
use tracing::instrument;

use crate::cart_store::{CartOutcome, Notice};
use crate::error::{AppError, Result};
use crate::render::{CartView, badge_label};
use crate::state::AppState;

/// HTMX event fired after every cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Add to cart form data.
///
/// `price` and `quantity` stay text so that bad values are reported with the
/// cart's own messages rather than a form decoding error.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub name: String,
    pub price: String,
    pub quantity: Option<String>,
}

/// Form data for actions addressing a single line.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub line_id: String,
}

impl LineForm {
    fn id(&self) -> Result<LineItemId> {
        self.line_id
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid line id: {}", self.line_id)))
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub badge: String,
    pub notices: Vec<Notice>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub notices: Vec<Notice>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub label: String,
}

/// Confirmation fragment returned after adding an item (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_added.html")]
pub struct CartAddedTemplate {
    pub notices: Vec<Notice>,
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CartShowTemplate> {
    let cart = {
        let store = state.cart()?;
        CartView::build(store.cart(), state.price_format())
    };

    Ok(CartShowTemplate {
        badge: badge_label(cart.item_count),
        cart,
        notices: Vec::new(),
    })
}

/// Cart items fragment (HTMX).
#[instrument(skip(state))]
pub async fn items(State(state): State<AppState>) -> Result<CartItemsTemplate> {
    let store = state.cart()?;
    Ok(CartItemsTemplate {
        cart: CartView::build(store.cart(), state.price_format()),
        notices: Vec::new(),
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<CartCountTemplate> {
    let count = state.cart()?.total_item_count();
    Ok(CartCountTemplate {
        label: badge_label(count),
    })
}

/// Add item to cart (HTMX).
///
/// Merges into an existing line with the same name and price. Returns the
/// confirmation notice with an HTMX trigger to update the cart count badge.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let command =
        CartCommand::add_item_from_input(&form.name, &form.price, form.quantity.as_deref())?;
    let outcome = state.cart()?.apply(command)?;

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartAddedTemplate {
            notices: outcome.notices(),
        },
    )
        .into_response())
}

/// Increase a line's quantity by one (HTMX).
#[instrument(skip(state))]
pub async fn increase(
    State(state): State<AppState>,
    Form(form): Form<LineForm>,
) -> Result<Response> {
    mutate(&state, CartCommand::IncreaseQuantity(form.id()?))
}

/// Decrease a line's quantity by one, removing it at zero (HTMX).
#[instrument(skip(state))]
pub async fn decrease(
    State(state): State<AppState>,
    Form(form): Form<LineForm>,
) -> Result<Response> {
    mutate(&state, CartCommand::DecreaseQuantity(form.id()?))
}

/// Remove a line regardless of quantity (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<LineForm>,
) -> Result<Response> {
    mutate(&state, CartCommand::RemoveItem(form.id()?))
}

/// Purchase and empty the cart (HTMX).
#[instrument(skip(state))]
pub async fn purchase(State(state): State<AppState>) -> Result<Response> {
    mutate(&state, CartCommand::Purchase)
}

/// Apply a command and re-render the whole item list.
fn mutate(state: &AppState, command: CartCommand) -> Result<Response> {
    let (outcome, cart): (CartOutcome, CartView) = {
        let mut store = state.cart()?;
        let outcome = store.apply(command)?;
        (outcome, CartView::build(store.cart(), state.price_format()))
    };

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartItemsTemplate {
            cart,
            notices: outcome.notices(),
        },
    )
        .into_response())
}
