//! Product catalog model

use serde::{Deserialize, Serialize};

/// A catalog product, keyed by `sku` (the business key; `id` is the storage
/// key). `estoque` is signed and fractional: outbound movements may drive it
/// negative, and adjustments can set fractional quantities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub titulo: String,
    pub estoque: f64,
    pub custo_unitario: f64,
}
