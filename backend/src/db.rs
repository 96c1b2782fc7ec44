//! SQLite pool setup and schema initialization

use std::time::Duration;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Open the connection pool described by the configuration.
pub async fn connect_pool(cfg: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&cfg.url)
        .await
}

/// Schema statements, run in order on every startup. All of them are
/// idempotent: existing tables and the seeded settings row are never touched.
const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS produtos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sku TEXT NOT NULL UNIQUE,
        titulo TEXT NOT NULL DEFAULT '',
        estoque REAL NOT NULL DEFAULT 0,
        custo_unitario REAL NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vendas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sku TEXT NOT NULL,
        titulo TEXT NOT NULL DEFAULT '',
        quantidade REAL NOT NULL DEFAULT 0,
        receita REAL NOT NULL DEFAULT 0,
        comissao REAL NOT NULL DEFAULT 0,
        preco_medio REAL NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS estoque_mov (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sku TEXT NOT NULL,
        data TEXT NOT NULL,
        tipo TEXT NOT NULL,
        quantidade REAL NOT NULL,
        obs TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS settings (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        imposto_pct REAL NOT NULL DEFAULT 5.0,
        despesa_pct REAL NOT NULL DEFAULT 3.5
    )
    "#,
    "INSERT OR IGNORE INTO settings (id, imposto_pct, despesa_pct) VALUES (1, 5.0, 3.5)",
];

/// Create the tables and seed the settings singleton.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
