//! Deterministic demo fixtures for local development and smoke checks.
//!
//! Seeding is idempotent: rows are keyed by fixed ids and re-running the
//! seed against an already-seeded database inserts nothing.

use chrono::Utc;
use sellery_core::auth::passwords::hash_password;
use sqlx::Row;

use crate::DbPool;

pub const DEMO_SELLER_ID: &str = "U-demo-seller";
pub const DEMO_SELLER_USERNAME: &str = "demo-seller";
pub const DEMO_SELLER_EMAIL: &str = "demo@sellery.local";
pub const DEMO_SELLER_PASSWORD: &str = "demo-password-123";

const DEMO_PRODUCTS: &[(&str, &str, &str, &str, i64, i64)] = &[
    (
        "P-demo-0001",
        "LEDSONE 18W Ceiling LED Light Round Warm White",
        "LEDSONE",
        "Warm White",
        245_000,
        40,
    ),
    (
        "P-demo-0002",
        "Samsung 25W Fast Charger Type-C Adaptive Power Adapter",
        "Samsung",
        "Black",
        389_500,
        120,
    ),
    (
        "P-demo-0003",
        "Philips LED Bulb 12W B22 Base Cool Daylight Pack of 2",
        "Philips",
        "Cool Daylight",
        112_000,
        300,
    ),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub users_inserted: u32,
    pub products_inserted: u32,
}

pub async fn seed_demo_data(pool: &DbPool) -> Result<SeedResult, sqlx::Error> {
    let mut result = SeedResult::default();
    let now = Utc::now().to_rfc3339();

    let existing_user =
        sqlx::query("SELECT COUNT(*) AS count FROM users WHERE id = ?")
            .bind(DEMO_SELLER_ID)
            .fetch_one(pool)
            .await?
            .get::<i64, _>("count");
    if existing_user == 0 {
        sqlx::query(
            "INSERT INTO users (id, username, name, email, password_hash, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(DEMO_SELLER_ID)
        .bind(DEMO_SELLER_USERNAME)
        .bind("Demo Seller")
        .bind(DEMO_SELLER_EMAIL)
        .bind(hash_password(DEMO_SELLER_PASSWORD))
        .bind(&now)
        .execute(pool)
        .await?;
        result.users_inserted += 1;
    }

    for (id, title, brand, colour, price_cents, stock) in DEMO_PRODUCTS {
        let existing = sqlx::query("SELECT COUNT(*) AS count FROM products WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?
            .get::<i64, _>("count");
        if existing > 0 {
            continue;
        }

        sqlx::query(
            "INSERT INTO products (id, title, brand, colour, size, material, description,
                 price_cents, stock, image, created_at, updated_at)
             VALUES (?, ?, ?, ?, '', '', '', ?, ?, NULL, ?, ?)",
        )
        .bind(id)
        .bind(title)
        .bind(brand)
        .bind(colour)
        .bind(price_cents)
        .bind(stock)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;
        result.products_inserted += 1;
    }

    Ok(result)
}
