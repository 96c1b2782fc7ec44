//! Route definitions for the Metrify API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product catalog
        .nest("/products", product_routes())
        // Stock ledger
        .nest("/stock", stock_routes())
        // Tax and expense settings
        .nest("/settings", settings_routes())
        // Sales import and its template
        .nest("/import", import_routes())
        // Dashboard and consolidated report
        .nest("/reports", report_routes())
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

/// Stock ledger routes
fn stock_routes() -> Router<AppState> {
    Router::new().route(
        "/movements",
        get(handlers::list_movements).post(handlers::record_movement),
    )
}

/// Settings routes
fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::get_settings).put(handlers::update_settings),
    )
}

/// Import routes
fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::import_sales))
        .route("/template", get(handlers::export_template))
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/consolidated", get(handlers::get_consolidated_report))
}
