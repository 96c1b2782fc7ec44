//! Reporting handlers: dashboard metrics and the consolidated report

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::consolidation::ConsolidationService;
use crate::services::reporting::{DashboardMetrics, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Dashboard summary
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    Ok(Json(service.get_dashboard_metrics().await?))
}

/// Consolidated profitability report; `?format=csv` downloads the sheet
pub async fn get_consolidated_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ConsolidationService::new(state.db);

    if query.format.as_deref() == Some("csv") {
        let csv = service.export_report_csv().await?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"relatorio_lucro_metrify.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(service.report().await?).into_response())
    }
}
