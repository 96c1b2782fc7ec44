//! Stock movement log models

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of stock movement.
///
/// Sign convention: `entrada` and `ajuste` rows store the signed delta
/// directly (`ajuste` stores `new − previous`, which may be negative);
/// `saida` rows store the positive magnitude and the kind carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Entrada,
    Saida,
    Ajuste,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entrada => "entrada",
            MovementKind::Saida => "saida",
            MovementKind::Ajuste => "ajuste",
        }
    }
}

/// Raised when a movement request names a kind outside entrada/saida/ajuste.
#[derive(Debug, Error)]
#[error("unknown movement kind: {0}")]
pub struct UnknownMovementKind(pub String);

impl FromStr for MovementKind {
    type Err = UnknownMovementKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrada" => Ok(MovementKind::Entrada),
            "saida" => Ok(MovementKind::Saida),
            "ajuste" => Ok(MovementKind::Ajuste),
            other => Err(UnknownMovementKind(other.to_string())),
        }
    }
}

/// One append-only entry in the stock movement log. Entries are never
/// updated or deleted; the product's stock must equal its creation stock
/// plus the signed sum of its entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: i64,
    pub sku: String,
    pub data: NaiveDate,
    pub tipo: MovementKind,
    pub quantidade: f64,
    pub obs: Option<String>,
}

impl StockMovement {
    /// The movement's effect on stock, folding the kind's sign convention
    /// into a plain signed delta.
    pub fn signed_delta(&self) -> f64 {
        match self.tipo {
            MovementKind::Saida => -self.quantidade,
            MovementKind::Entrada | MovementKind::Ajuste => self.quantidade,
        }
    }
}
