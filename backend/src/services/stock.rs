//! Stock movement ledger service
//!
//! Owns the append-only `estoque_mov` log and keeps `produtos.estoque`
//! consistent with it: every mutation updates the stock and appends the log
//! entry inside one transaction, so a crash can never leave one without the
//! other.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{MovementKind, StockMovement};
use shared::validation::NumberField;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};

/// Adjustments whose target is within this window of the current stock are
/// reported as already at target and write no movement row.
pub const ADJUST_EPSILON: f64 = 1e-4;

const DEFAULT_MOVEMENT_LIMIT: i64 = 50;

/// Stock ledger service
#[derive(Clone)]
pub struct StockService {
    db: SqlitePool,
}

/// Input for recording a stock movement
#[derive(Debug, Deserialize)]
pub struct RecordMovementInput {
    pub sku: String,
    /// entrada, saida or ajuste
    pub tipo: String,
    /// Quantity moved; required positive for entrada/saida.
    #[serde(default)]
    pub quantidade: Option<NumberField>,
    /// Target absolute quantity; required for ajuste.
    #[serde(default)]
    pub nova_quantidade: Option<NumberField>,
    #[serde(default)]
    pub obs: Option<String>,
    /// Movement date; defaults to today.
    #[serde(default)]
    pub data: Option<NaiveDate>,
}

/// Result of a movement request
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MovementOutcome {
    /// The movement was applied and logged; `estoque` is the new stock.
    Applied {
        movement: StockMovement,
        estoque: f64,
    },
    /// An ajuste whose target already matches the current stock within
    /// [`ADJUST_EPSILON`]; nothing was written.
    AlreadyAtTarget { estoque: f64 },
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record an entrada, saida or ajuste movement against a SKU
    pub async fn record_movement(&self, input: RecordMovementInput) -> AppResult<MovementOutcome> {
        let sku = input.sku.trim().to_string();
        let tipo: MovementKind = input.tipo.parse().map_err(|_| {
            AppError::validation(
                "tipo",
                "unknown movement kind",
                "Tipo de movimentação inválido",
            )
        })?;

        let estoque_atual = sqlx::query_scalar::<_, f64>(
            "SELECT estoque FROM produtos WHERE sku = ?1",
        )
        .bind(&sku)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("SKU".to_string()))?;

        let data = input.data.unwrap_or_else(|| Utc::now().date_naive());
        let obs = input
            .obs
            .map(|obs| obs.trim().to_string())
            .filter(|obs| !obs.is_empty());

        match tipo {
            MovementKind::Entrada | MovementKind::Saida => {
                let quantidade = input.quantidade.map(|n| n.value).unwrap_or(0.0);
                if quantidade <= 0.0 {
                    return Err(AppError::validation(
                        "quantidade",
                        "quantity must be positive",
                        "Quantidade deve ser maior que zero",
                    ));
                }

                let novo_estoque = match tipo {
                    MovementKind::Entrada => estoque_atual + quantidade,
                    _ => estoque_atual - quantidade,
                };

                // Saida rows store the positive magnitude; the kind carries
                // the sign.
                let movement = self
                    .apply(&sku, tipo, novo_estoque, quantidade, data, obs)
                    .await?;
                Ok(MovementOutcome::Applied {
                    movement,
                    estoque: novo_estoque,
                })
            }
            MovementKind::Ajuste => {
                let alvo = input.nova_quantidade.ok_or_else(|| {
                    AppError::validation(
                        "nova_quantidade",
                        "target quantity is required for adjustments",
                        "Informe a nova quantidade para ajuste",
                    )
                })?;
                if alvo.defaulted {
                    return Err(AppError::validation(
                        "nova_quantidade",
                        "target quantity is not a valid number",
                        "Nova quantidade inválida",
                    ));
                }

                let diff = alvo.value - estoque_atual;
                if diff.abs() < ADJUST_EPSILON {
                    return Ok(MovementOutcome::AlreadyAtTarget {
                        estoque: estoque_atual,
                    });
                }

                // Ajuste rows store the signed difference applied, not the
                // absolute target.
                let movement = self.apply(&sku, tipo, alvo.value, diff, data, obs).await?;
                Ok(MovementOutcome::Applied {
                    movement,
                    estoque: alvo.value,
                })
            }
        }
    }

    /// Update the stock and append the log entry in one transaction.
    async fn apply(
        &self,
        sku: &str,
        tipo: MovementKind,
        novo_estoque: f64,
        quantidade: f64,
        data: NaiveDate,
        obs: Option<String>,
    ) -> AppResult<StockMovement> {
        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE produtos SET estoque = ?2 WHERE sku = ?1")
            .bind(sku)
            .bind(novo_estoque)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "INSERT INTO estoque_mov (sku, data, tipo, quantidade, obs) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(sku)
        .bind(data)
        .bind(tipo.as_str())
        .bind(quantidade)
        .bind(&obs)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(sku = %sku, tipo = tipo.as_str(), quantidade, "movement recorded");

        Ok(StockMovement {
            id: result.last_insert_rowid(),
            sku: sku.to_string(),
            data,
            tipo,
            quantidade,
            obs,
        })
    }

    /// Most recent movements across all SKUs, newest first
    pub async fn list_movements(&self, limit: Option<i64>) -> AppResult<Vec<StockMovement>> {
        let limit = limit.unwrap_or(DEFAULT_MOVEMENT_LIMIT).clamp(1, 500);

        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, sku, data, tipo, quantidade, obs FROM estoque_mov ORDER BY id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Full movement history for one SKU in ledger order (oldest first)
    pub async fn movements_for_sku(&self, sku: &str) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, sku, data, tipo, quantidade, obs FROM estoque_mov WHERE sku = ?1 ORDER BY id",
        )
        .bind(sku)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
