//! Dashboard metrics service

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: SqlitePool,
}

/// Dashboard summary figures
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_produtos: i64,
    pub estoque_total: f64,
    pub receita_total: f64,
    pub comissao_total: f64,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let (total_produtos, estoque_total): (i64, f64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(estoque), 0.0) FROM produtos")
                .fetch_one(&self.db)
                .await?;

        let (receita_total, comissao_total): (f64, f64) = sqlx::query_as(
            "SELECT COALESCE(SUM(receita), 0.0), COALESCE(SUM(comissao), 0.0) FROM vendas",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            total_produtos,
            estoque_total,
            receita_total,
            comissao_total,
        })
    }
}
