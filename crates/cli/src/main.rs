//! EcoStore CLI - offline tools over the pricing rules and demo catalog.
//!
//! # Usage
//!
//! ```bash
//! # Export the demo catalog
//! ecostore catalog --format yaml
//!
//! # Price a cart: two of product 1, one of product 3, with a promo code
//! ecostore quote --item 1:2 --item 3:1 --promo save10
//!
//! # Where does a balance sit in the tier table?
//! ecostore tier 420
//!
//! # Hash a password read from stdin
//! echo 'correct horse' | ecostore hash-password
//! ```
//!
//! `quote` honours the same `ECOSTORE_TAX_RATE`,
//! `ECOSTORE_FREE_SHIPPING_THRESHOLD` and `ECOSTORE_SHIPPING_FEE` variables
//! as the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::catalog::Format;
use commands::quote::LineArg;

#[derive(Parser)]
#[command(name = "ecostore")]
#[command(author, version, about = "EcoStore CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the demo catalog
    Catalog {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Price a cart against the demo catalog
    Quote {
        /// Cart line as PRODUCT_ID:QUANTITY (repeatable)
        #[arg(short, long = "item", required = true, value_parser = commands::quote::parse_line)]
        items: Vec<LineArg>,

        /// Promo code to apply
        #[arg(short, long)]
        promo: Option<String>,
    },
    /// Show the loyalty tier for a points balance
    Tier {
        /// Points balance
        points: u64,
    },
    /// Hash a password from stdin with argon2id
    HashPassword,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Catalog { format } => commands::catalog::print(format),
        Commands::Quote { items, promo } => commands::quote::print(&items, promo.as_deref()),
        Commands::Tier { points } => {
            commands::tier::print(points);
            Ok(())
        }
        Commands::HashPassword => commands::password::hash_from_stdin(),
    }
}
