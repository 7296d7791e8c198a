//! # Margin Report
//!
//! Prints pricing reports from the local database.
//!
//! ## Usage
//! ```bash
//! # List stored products
//! cargo run -p margin-session --bin margin-report -- --list
//!
//! # Full report of one product (id or SKU), as JSON
//! cargo run -p margin-session --bin margin-report -- --product CAS-CANECA-0001
//!
//! # Suggested prices for a landed cost of R$40.00 on every channel
//! cargo run -p margin-session --bin margin-report -- --quote 4000
//! ```
//!
//! Configuration comes from the environment, see `margin_session::config`.

use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;

use margin_core::{Money, ProductCost};
use margin_db::{Database, DbConfig};
use margin_session::{build_report, quote, ChannelManager, SessionConfig};

enum Command {
    List,
    Product(String),
    Quote(i64),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig::load()?;
    init_tracing(&config.log_filter);

    let args: Vec<String> = env::args().collect();
    let command = match args.get(1).map(String::as_str) {
        Some("--list" | "-l") => Command::List,
        Some("--product" | "-p") => match args.get(2) {
            Some(id) => Command::Product(id.clone()),
            None => return usage(),
        },
        Some("--quote" | "-q") => match args.get(2).and_then(|c| c.parse().ok()) {
            Some(cents) => Command::Quote(cents),
            None => return usage(),
        },
        _ => return usage(),
    };

    match command {
        Command::Quote(cents) => {
            let cost =
                ProductCost::new(Money::from_cents(cents), Money::zero(), config.default_tax)?;
            let suggestions = quote(&cost, config.target_margin)?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        Command::List => {
            let db = open_database(&config).await?;
            for product in db.products_for(&config.tenant_id).list(1000).await? {
                println!(
                    "{}  {:<24} {:<32} {}",
                    product.id,
                    product.sku,
                    product.name,
                    product.cost.total_cost()
                );
            }
            db.close().await;
        }
        Command::Product(key) => {
            let db = open_database(&config).await?;
            let product_id = match db.products_for(&config.tenant_id).get_by_sku(&key).await? {
                Some(product) => product.id,
                None => key,
            };
            let mut manager = ChannelManager::load(&db, &product_id).await?;
            let report = build_report(&mut manager, config.target_margin)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            db.close().await;
        }
    }

    Ok(())
}

/// Creates the data directory on first use.
async fn open_database(config: &SessionConfig) -> Result<Database, Box<dyn std::error::Error>> {
    if let Some(dir) = config.database_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    info!(db_path = ?config.database_path, "Opening database");
    Ok(Database::new(DbConfig::new(config.database_path.clone())).await?)
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("Margin Report");
    println!();
    println!("Usage: margin-report <COMMAND>");
    println!();
    println!("Commands:");
    println!("  -l, --list                 List stored products");
    println!("  -p, --product <ID|SKU>     Print the pricing report of a product");
    println!("  -q, --quote <COST_CENTS>   Suggested prices on every channel");
    Ok(())
}
