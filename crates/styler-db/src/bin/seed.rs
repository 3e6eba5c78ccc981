//! # Seed Data Generator
//!
//! Populates the database with demo accounts for local development.
//!
//! ## Usage
//! ```bash
//! # Create 10 demo users (default)
//! cargo run -p styler-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p styler-db --bin seed -- --users 50 --db ./data/styler.db
//! ```
//!
//! ## Generated Data
//! For every index `N`:
//! - user `demo<N>@styler.test` with password `password123`
//! - a cart with two lines
//! - one itemized order (subtotal + flat shipping + 18% tax)

use chrono::{Duration, Utc};
use std::env;
use styler_core::order::NewOrder;
use styler_core::{Money, NewCartItem, NewUser, OrderItem, ShippingAddress};
use styler_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Catalogue the demo carts and orders draw from: (name, category, price in cents).
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("Linen Shirt", "Shirts", 1899),
    ("Slim Chinos", "Trousers", 2499),
    ("Denim Jacket", "Jackets", 4999),
    ("Cotton Kurta", "Ethnic", 1599),
    ("Silk Scarf", "Accessories", 899),
    ("Canvas Sneakers", "Footwear", 2999),
    ("Wool Sweater", "Knitwear", 3499),
    ("Leather Belt", "Accessories", 1199),
];

const COLORS: &[&str] = &["Black", "Navy", "Olive", "White", "Maroon"];
const SIZES: &[&str] = &["S", "M", "L", "XL"];
const CITIES: &[(&str, &str, &str)] = &[
    ("Pune", "MH", "411001"),
    ("Bengaluru", "KA", "560001"),
    ("Jaipur", "RJ", "302001"),
    ("Kochi", "KL", "682001"),
];

const DEMO_PASSWORD: &str = "password123";
const FLAT_SHIPPING_CENTS: i64 = 99;
const TAX_BASIS_POINTS: i64 = 1800;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seed=info,styler_db=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut users: usize = 10;
    let mut db_path = String::from("./styler.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--users" | "-u" => {
                if i + 1 < args.len() {
                    users = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Styler Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -u, --users <N>    Number of demo users to create (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./styler.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, users, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let start = std::time::Instant::now();
    let mut created = 0;

    for n in 0..users {
        let email = format!("demo{n}@styler.test");
        if db.users().exists_by_email(&email).await? {
            warn!(email = %email, "Demo user already exists, skipping");
            continue;
        }

        let now = Utc::now();
        let user = db.users().insert(&demo_user(n, email), now - Duration::days(n as i64)).await?;

        db.carts().replace(user.id, &demo_cart(n)).await?;

        let items = demo_order_items(n);
        let subtotal = items
            .iter()
            .map(OrderItem::line_total)
            .collect::<Option<Vec<_>>>()
            .and_then(Money::checked_sum)
            .ok_or("demo order subtotal out of range")?;
        let tax = Money::from_cents(subtotal.cents() * TAX_BASIS_POINTS / 10_000);
        let order = NewOrder::itemized(
            user.id,
            items,
            demo_address(n, &user.first_name, &user.last_name),
            subtotal,
            Money::from_cents(FLAT_SHIPPING_CENTS),
            tax,
            now - Duration::hours(n as i64),
        )?;
        let order = db.orders().create(&order).await?;

        info!(email = %user.email, order_id = %order.order_id, total = %order.total_amount, "Seeded user");
        created += 1;
    }

    info!(created, elapsed = ?start.elapsed(), "Seed complete");

    Ok(())
}

fn demo_user(n: usize, email: String) -> NewUser {
    NewUser {
        email,
        password: DEMO_PASSWORD.to_string(),
        first_name: "Demo".to_string(),
        last_name: format!("User{n}"),
        phone: Some(format!("98{:08}", n)),
    }
}

fn product(seed: usize) -> (&'static str, &'static str, i64) {
    PRODUCTS[seed % PRODUCTS.len()]
}

fn demo_cart(n: usize) -> Vec<NewCartItem> {
    (0..2)
        .map(|k| {
            let (name, category, price) = product(n + k);
            NewCartItem {
                product_id: ((n + k) % PRODUCTS.len()) as i64 + 1,
                product_name: Some(name.to_string()),
                price: Money::from_cents(price),
                quantity: (k + 1) as i64,
                color: Some(COLORS[(n + k) % COLORS.len()].to_string()),
                size: Some(SIZES[(n + k) % SIZES.len()].to_string()),
                category: Some(category.to_string()),
                image: None,
            }
        })
        .collect()
}

fn demo_order_items(n: usize) -> Vec<OrderItem> {
    (0..1 + n % 3)
        .map(|k| {
            let seed = n * 3 + k;
            let (name, category, price) = product(seed);
            OrderItem {
                product_id: (seed % PRODUCTS.len()) as i64 + 1,
                product_name: name.to_string(),
                product_category: category.to_string(),
                price: Money::from_cents(price),
                quantity: 1 + (seed % 2) as i64,
                color: COLORS[seed % COLORS.len()].to_string(),
                size: SIZES[seed % SIZES.len()].to_string(),
                image_url: String::new(),
            }
        })
        .collect()
}

fn demo_address(n: usize, first_name: &str, last_name: &str) -> ShippingAddress {
    let (city, state, postal_code) = CITIES[n % CITIES.len()];
    ShippingAddress {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        address_line_1: format!("{} Market Road", 10 + n),
        address_line_2: String::new(),
        city: city.to_string(),
        state: state.to_string(),
        postal_code: postal_code.to_string(),
        landmark: String::new(),
    }
}
