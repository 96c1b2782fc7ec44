//! HTTP handlers for the stock ledger

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::models::StockMovement;

use crate::error::AppResult;
use crate::services::stock::{MovementOutcome, RecordMovementInput, StockService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MovementListQuery {
    pub limit: Option<i64>,
    pub sku: Option<String>,
}

/// Recent stock movements, newest first; `?sku=` lists one SKU's full
/// history in ledger order instead
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementListQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockService::new(state.db);
    let movements = match query.sku {
        Some(sku) => service.movements_for_sku(&sku).await?,
        None => service.list_movements(query.limit).await?,
    };
    Ok(Json(movements))
}

/// Record an entrada/saida/ajuste movement
pub async fn record_movement(
    State(state): State<AppState>,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<impl IntoResponse> {
    let service = StockService::new(state.db);
    let outcome = service.record_movement(input).await?;

    let status = match &outcome {
        MovementOutcome::Applied { .. } => StatusCode::CREATED,
        MovementOutcome::AlreadyAtTarget { .. } => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}
