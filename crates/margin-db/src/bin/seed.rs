//! # Seed Data Generator
//!
//! Populates the database with demo products, each with a complete channel
//! set, for development of the pricing screens.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p margin-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p margin-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p margin-db --bin seed -- --db ./data/margin.db
//!
//! # Seed another tenant
//! MARGIN_TENANT_ID=7d3c9a52-0b8e-4f61-9c2d-5e4a1b6f8c03 cargo run -p margin-db --bin seed
//! ```
//!
//! Without `--db` the seed writes to the same file `margin-report` reads:
//! `MARGIN_DB_PATH`, or `<platform data dir>/margin.db`.
//!
//! ## Generated Products
//! Each product has:
//! - Unique SKU: `{CATEGORY}-{NAME}-{INDEX}`
//! - Item cost R$5.00 - R$85.00 plus packaging
//! - Tax rate: 0%, 4%, 7.25%, 12%
//! - Every channel type stored; a rotating subset enabled, priced at the
//!   channel's 25%-margin price

use std::env;
use std::path::PathBuf;

use margin_core::{
    create_default_channel, price_for_target_margin, ChannelType, Money, Percent, ProductCost,
    SalesChannel, DEFAULT_TENANT_ID,
};
use margin_db::{database_path_from, Database, DbConfig, Product};
use tracing_subscriber::EnvFilter;

/// Demo catalogue: category code and product names.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "CAS",
        &[
            "Caneca Ceramica",
            "Garrafa Termica",
            "Porta Copos",
            "Tabua de Corte",
            "Pote Hermetico",
        ],
    ),
    (
        "ELE",
        &[
            "Fone Bluetooth",
            "Carregador USB-C",
            "Cabo HDMI",
            "Mouse Sem Fio",
            "Hub USB",
        ],
    ),
    (
        "PAP",
        &[
            "Caderno Pontilhado",
            "Agenda Semanal",
            "Kit Canetas",
            "Estojo Duplo",
            "Planner Mensal",
        ],
    ),
    (
        "PET",
        &[
            "Comedouro Inox",
            "Coleira Ajustavel",
            "Cama Pet",
            "Brinquedo Corda",
            "Escova Removedora",
        ],
    ),
];

/// Tax rates in basis points
const TAX_RATES: &[i64] = &[0, 400, 725, 1200];

/// Shipping paid by the seller, cents
const SHIPPING: &[i64] = &[0, 1590, 2290, 2990];

const TARGET_MARGIN: Percent = Percent::from_bps(2_500);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path: Option<PathBuf> = None;
    let tenant_id = env::var("MARGIN_TENANT_ID").unwrap_or_else(|_| DEFAULT_TENANT_ID.to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Margin Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: $MARGIN_DB_PATH or <data dir>/margin.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Margin Seed Data Generator");
    println!("==========================");
    let db_path = match db_path.or_else(|| database_path_from(|key| env::var(key).ok())) {
        Some(path) => path,
        None => {
            eprintln!("No data directory on this platform, pass --db <PATH>");
            return Ok(());
        }
    };
    if let Some(dir) = db_path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    println!("Database: {}", db_path.display());
    println!("Tenant:   {}", tenant_id);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let products = db.products_for(&tenant_id);

    let (total, applied) = margin_db::migrations::migration_status(db.pool()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);

    let existing = products.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut seed = 0usize;

    'outer: loop {
        for (category_code, names) in CATEGORIES {
            for name in names.iter() {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(category_code, name, seed)?.in_tenant(&tenant_id);
                seed += 1;

                if let Err(e) = products.insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.sku, e);
                    continue;
                }

                let channels = generate_channels(&product.cost, seed)?;
                db.channels().replace_all(&product.id, &channels).await?;

                generated += 1;

                if generated % 50 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    if let Some(first) = products.list(1).await?.into_iter().next() {
        let stored = db.channels().count_for_product(&first.id).await?;
        println!("  {} has {} stored channels", first.sku, stored);
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic demo costs.
fn generate_product(
    category: &str,
    name: &str,
    seed: usize,
) -> Result<Product, Box<dyn std::error::Error>> {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(4)
        .collect::<String>()
        .to_uppercase();
    let sku = format!("{}-{}-{:04}", category, prefix, seed);

    let item_cost = Money::from_cents(500 + ((seed * 37) % 8000) as i64);
    let packaging = Money::from_cents(50 + ((seed * 13) % 250) as i64);
    let tax = Percent::from_bps(TAX_RATES[seed % TAX_RATES.len()]);

    let cost = ProductCost::new(item_cost, packaging, tax)?;
    let full_name = format!("{} #{}", name, seed + 1);

    Ok(Product::new(&sku, &full_name, cost)?)
}

/// Builds the full channel set; roughly half the channels are enabled.
fn generate_channels(
    cost: &ProductCost,
    seed: usize,
) -> Result<Vec<SalesChannel>, Box<dyn std::error::Error>> {
    let mut channels = Vec::with_capacity(ChannelType::ALL.len());

    for channel_type in ChannelType::ALL {
        let mut channel = create_default_channel(channel_type);
        let model = margin_core::defaults_for(channel_type);

        if model.applies(margin_core::FeeField::Shipping) {
            channel.fees.shipping_cost = Money::from_cents(SHIPPING[(seed + channel_type.ordinal()) % SHIPPING.len()]);
        } else {
            channel.fees.fulfillment_fee = Money::from_cents(900 + (seed % 7) as i64 * 100);
        }

        let suggested = price_for_target_margin(
            cost.total_cost(),
            cost.tax_percent(),
            &channel.fees,
            TARGET_MARGIN,
        )?;

        if let Some(price) = suggested {
            channel.selling_price = price;
            channel.enabled = (seed + channel_type.ordinal()) % 2 == 0;
        }

        channels.push(channel);
    }

    Ok(channels)
}
