//! HTTP handlers for the product catalog

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::models::Product;

use crate::error::AppResult;
use crate::services::catalog::{CatalogService, CreateProductInput, UpdateProductInput};
use crate::AppState;

/// List all products, ordered by title
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<impl IntoResponse> {
    let service = CatalogService::new(state.db);
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Fetch one product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.get(product_id).await?))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.update(product_id, input).await?))
}

/// Delete a product; its movement and sale history is kept
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = CatalogService::new(state.db);
    service.delete(product_id).await?;
    Ok(Json(()))
}
