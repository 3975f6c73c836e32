//! Cart commands.
//!
//! Each command loads the cart from the configured file store, applies one
//! action, saves and prints what the storefront would have shown: notices,
//! the re-rendered cart and the badge.

#![allow(clippy::print_stdout)]

use std::fmt::Write as _;

use pocket_cart_core::{CartCommand, CartError, LineItemId};
use pocket_cart_storefront::config::ConfigError;
use pocket_cart_storefront::render::{CartView, PriceFormat, badge_label};
use pocket_cart_storefront::storage::StoreError;
use pocket_cart_storefront::{CartOutcome, CartStore, NoticeLevel, StorefrontConfig};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cart rejected the action.
    #[error("{}", .0.user_message())]
    Cart(#[from] CartError),

    /// The line id argument is not a valid id.
    #[error("Invalid line id: {0}")]
    InvalidLineId(String),

    /// Writing the cart failed outside of a cart mutation.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Load configuration from the environment and `.env`.
///
/// # Errors
///
/// Returns `CommandError::Config` if a variable is invalid.
pub fn load_config() -> Result<StorefrontConfig, CommandError> {
    Ok(StorefrontConfig::from_env()?)
}

/// Open the cart stored in the configured file store.
#[must_use]
pub fn open_store(config: &StorefrontConfig) -> CartStore {
    CartStore::initialize(config.storage.file_store(), &config.storage.key)
}

/// Print the cart.
pub fn show(store: &CartStore, config: &StorefrontConfig) {
    print!("{}", render_cart(store, &price_format(config)));
}

/// Print the badge.
pub fn count(store: &CartStore) {
    println!("{}", badge_label(store.total_item_count()));
}

/// Add an item and print the confirmation.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the input is rejected.
pub fn add(
    store: &mut CartStore,
    name: &str,
    price: &str,
    quantity: i64,
) -> Result<(), CommandError> {
    let outcome = store.apply(CartCommand::add_item_from_str(name, price, quantity)?)?;
    print!("{}", render_notices(&outcome));
    println!("{}", badge_label(store.total_item_count()));
    Ok(())
}

/// Increase a line's quantity and print the cart.
///
/// # Errors
///
/// Returns an error if the line id is invalid or unknown.
pub fn increase(
    store: &mut CartStore,
    config: &StorefrontConfig,
    line_id: &str,
) -> Result<(), CommandError> {
    let outcome = store.increase_quantity(parse_line_id(line_id)?)?;
    print_after_mutation(store, config, &outcome);
    Ok(())
}

/// Decrease a line's quantity and print the cart.
///
/// # Errors
///
/// Returns an error if the line id is invalid or unknown.
pub fn decrease(
    store: &mut CartStore,
    config: &StorefrontConfig,
    line_id: &str,
) -> Result<(), CommandError> {
    let outcome = store.decrease_quantity(parse_line_id(line_id)?)?;
    print_after_mutation(store, config, &outcome);
    Ok(())
}

/// Remove a line and print the cart.
///
/// # Errors
///
/// Returns an error if the line id is invalid or unknown.
pub fn remove(
    store: &mut CartStore,
    config: &StorefrontConfig,
    line_id: &str,
) -> Result<(), CommandError> {
    let outcome = store.remove_item(parse_line_id(line_id)?)?;
    print_after_mutation(store, config, &outcome);
    Ok(())
}

/// Purchase and print the confirmation.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the cart is empty.
pub fn purchase(store: &mut CartStore) -> Result<(), CommandError> {
    let outcome = store.purchase()?;
    print!("{}", render_notices(&outcome));
    println!("{}", badge_label(store.total_item_count()));
    Ok(())
}

/// Write the loaded cart back in the current format.
///
/// Loading already migrates legacy data; this forces a write even when the
/// stored value needed no changes.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the write fails.
pub fn migrate_storage(store: &CartStore) -> Result<(), CommandError> {
    store.save()?;
    tracing::info!(key = store.key(), "Stored cart rewritten");
    println!(
        "Stored cart rewritten ({} lines, {})",
        store.cart().len(),
        badge_label(store.total_item_count())
    );
    Ok(())
}

fn print_after_mutation(store: &CartStore, config: &StorefrontConfig, outcome: &CartOutcome) {
    print!("{}", render_notices(outcome));
    print!("{}", render_cart(store, &price_format(config)));
}

fn price_format(config: &StorefrontConfig) -> PriceFormat {
    PriceFormat::new(config.currency_symbol.clone())
}

fn parse_line_id(raw: &str) -> Result<LineItemId, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidLineId(raw.to_string()))
}

/// Text rendering of the cart, one line per item followed by the total.
fn render_cart(store: &CartStore, format: &PriceFormat) -> String {
    let view = CartView::build(store.cart(), format);
    let mut out = String::new();

    if view.is_empty() {
        out.push_str("Your cart is empty.\n");
    }
    for item in &view.items {
        let _ = writeln!(
            out,
            "{}  {} - {} each  x{}  Subtotal: {}",
            item.id, item.name, item.price, item.quantity, item.line_price
        );
    }
    let _ = writeln!(out, "Total: {}", view.total);
    let _ = writeln!(out, "{}", badge_label(view.item_count));
    out
}

fn render_notices(outcome: &CartOutcome) -> String {
    outcome
        .notices()
        .iter()
        .map(|notice| match notice.level {
            NoticeLevel::Info => format!("{}\n", notice.message),
            NoticeLevel::Warning => format!("warning: {}\n", notice.message),
            NoticeLevel::Error => format!("error: {}\n", notice.message),
        })
        .collect()
}
