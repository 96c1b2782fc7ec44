//! Consolidated sale records

use serde::{Deserialize, Serialize};

/// One imported sale line. Rows are append-only: multiple rows may share a
/// SKU (one per import batch/line) and are never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleRecord {
    pub id: i64,
    pub sku: String,
    /// Title snapshot at import time; the catalog title may drift later.
    pub titulo: String,
    pub quantidade: f64,
    pub receita: f64,
    pub comissao: f64,
    pub preco_medio: f64,
}
