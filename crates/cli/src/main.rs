//! Pocket Cart CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart with line ids, subtotals and total
//! pocket-cart show
//!
//! # Add two burgers at 120 each
//! pocket-cart add Burger 120 -q 2
//!
//! # Adjust or remove a line by id (from `show`)
//! pocket-cart increase 1b4e28ba-2fa1-11d2-883f-0016d3cca427
//! pocket-cart decrease 1b4e28ba-2fa1-11d2-883f-0016d3cca427
//! pocket-cart remove 1b4e28ba-2fa1-11d2-883f-0016d3cca427
//!
//! # Check out (clears the cart)
//! pocket-cart purchase
//!
//! # Rewrite legacy stored data in the current format
//! pocket-cart migrate-storage
//! ```
//!
//! Reads the same `CART_STORAGE_*` environment variables as the storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pocket-cart")]
#[command(author, version, about = "Pocket Cart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cart contents and total
    Show,
    /// Print the badge count
    Count,
    /// Add an item to the cart
    Add {
        /// Item name
        name: String,

        /// Unit price
        price: String,

        /// Quantity to add (1-50)
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Increase a line's quantity by one
    Increase {
        /// Line id as printed by `show`
        line_id: String,
    },
    /// Decrease a line's quantity by one, removing it at zero
    Decrease {
        /// Line id as printed by `show`
        line_id: String,
    },
    /// Remove a line regardless of quantity
    Remove {
        /// Line id as printed by `show`
        line_id: String,
    },
    /// Purchase and empty the cart
    Purchase,
    /// Rewrite the stored cart in the current format
    MigrateStorage,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let config = commands::load_config()?;
    let mut store = commands::open_store(&config);

    match cli.command {
        Commands::Show => commands::show(&store, &config),
        Commands::Count => commands::count(&store),
        Commands::Add {
            name,
            price,
            quantity,
        } => commands::add(&mut store, &name, &price, quantity)?,
        Commands::Increase { line_id } => commands::increase(&mut store, &config, &line_id)?,
        Commands::Decrease { line_id } => commands::decrease(&mut store, &config, &line_id)?,
        Commands::Remove { line_id } => commands::remove(&mut store, &config, &line_id)?,
        Commands::Purchase => commands::purchase(&mut store)?,
        Commands::MigrateStorage => commands::migrate_storage(&store)?,
    }
    Ok(())
}
