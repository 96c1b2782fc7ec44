//! HTTP handlers for the sales import

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::services::consolidation::ConsolidationService;
use crate::services::import::{ImportService, ImportSummary};
use crate::AppState;

/// Import a CSV sales sheet uploaded as the multipart field "arquivo"
pub async fn import_sales(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    let bytes = loop {
        let field = multipart.next_field().await.map_err(|e| {
            AppError::validation("arquivo", &format!("invalid upload: {e}"), "Upload inválido")
        })?;

        match field {
            Some(field) if field.name() == Some("arquivo") => {
                break field.bytes().await.map_err(|e| {
                    AppError::validation(
                        "arquivo",
                        &format!("invalid upload: {e}"),
                        "Upload inválido",
                    )
                })?;
            }
            Some(_) => continue,
            None => {
                return Err(AppError::validation(
                    "arquivo",
                    "no file uploaded",
                    "Nenhum arquivo enviado",
                ));
            }
        }
    };

    let service = ImportService::new(state.db);
    let summary = service.import(&bytes).await?;
    Ok(Json(summary))
}

/// Template CSV download for the import sheet
pub async fn export_template() -> AppResult<impl IntoResponse> {
    let csv = ConsolidationService::template_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"template_consolidacao.csv\"",
            ),
        ],
        csv,
    ))
}
