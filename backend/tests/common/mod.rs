//! Shared helpers for the integration test suite
#![allow(dead_code)]

use metrify_backend::db;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// A fresh in-memory database with the schema applied. A single connection
/// keeps the in-memory store alive and shared for the whole test.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    db::init_schema(&pool).await.expect("schema init");
    pool
}

/// Current stock for a SKU, read straight from the store.
pub async fn current_stock(pool: &SqlitePool, sku: &str) -> f64 {
    sqlx::query_scalar("SELECT estoque FROM produtos WHERE sku = ?1")
        .bind(sku)
        .fetch_one(pool)
        .await
        .expect("product row")
}
