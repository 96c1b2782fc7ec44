//! HTTP handlers for the settings singleton

use axum::{extract::State, Json};
use shared::models::Settings;

use crate::error::AppResult;
use crate::services::settings::{SettingsService, UpdateSettingsInput};
use crate::AppState;

/// Current tax and expense percentages
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<Settings>> {
    let service = SettingsService::new(state.db);
    Ok(Json(service.get().await?))
}

/// Update the tax and expense percentages
pub async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<UpdateSettingsInput>,
) -> AppResult<Json<Settings>> {
    let service = SettingsService::new(state.db);
    Ok(Json(service.update(input).await?))
}
