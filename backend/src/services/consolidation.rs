//! Consolidated profitability report service
//!
//! Loads the full sales set, the unit-cost map and fresh settings on every
//! invocation and delegates the math to [`shared::consolidation`]. The
//! report is always recomputed from persisted state, never cached.

use std::collections::HashMap;
use std::fmt::Display;

use shared::consolidation::{consolidate, ConsolidatedReport};
use shared::import::{REPORT_COLUMNS, TEMPLATE_COLUMNS};
use shared::models::SaleRecord;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::services::SettingsService;

/// Consolidation service
#[derive(Clone)]
pub struct ConsolidationService {
    db: SqlitePool,
}

impl ConsolidationService {
    /// Create a new ConsolidationService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Recompute the consolidated report from current persisted state
    pub async fn report(&self) -> AppResult<ConsolidatedReport> {
        let sales = sqlx::query_as::<_, SaleRecord>(
            "SELECT id, sku, titulo, quantidade, receita, comissao, preco_medio FROM vendas",
        )
        .fetch_all(&self.db)
        .await?;

        let unit_costs: HashMap<String, f64> =
            sqlx::query_as::<_, (String, f64)>("SELECT sku, custo_unitario FROM produtos")
                .fetch_all(&self.db)
                .await?
                .into_iter()
                .collect();

        let settings = SettingsService::new(self.db.clone()).get().await?;

        Ok(consolidate(&sales, &unit_costs, &settings))
    }

    /// The consolidated report as a CSV sheet with the contract's fixed
    /// header row
    pub async fn export_report_csv(&self) -> AppResult<String> {
        let report = self.report().await?;

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_record(REPORT_COLUMNS).map_err(csv_error)?;
        for row in &report.rows {
            let record = [
                row.sku.clone(),
                row.titulo.clone(),
                row.quantidade.to_string(),
                row.receita.to_string(),
                row.comissao.to_string(),
                row.imposto.to_string(),
                row.despesas.to_string(),
                row.custo_unitario.to_string(),
                row.custo_total.to_string(),
                row.lucro.to_string(),
                row.preco_medio_venda.to_string(),
            ];
            writer.write_record(&record).map_err(csv_error)?;
        }

        finish_csv(writer)
    }

    /// An empty template sheet with exactly the import column set
    pub fn template_csv() -> AppResult<String> {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_record(TEMPLATE_COLUMNS).map_err(csv_error)?;
        finish_csv(writer)
    }
}

fn csv_error(e: impl Display) -> AppError {
    AppError::Internal(anyhow::anyhow!("CSV serialization error: {e}"))
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV writer error: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("UTF-8 conversion error: {e}")))
}
