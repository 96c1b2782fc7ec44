//! Bulk sales import
//!
//! Decodes a CSV sheet against the import contract, then applies each
//! accepted line atomically: upsert the product, insert the sale record,
//! decrement stock and append the outbound movement. One transaction per
//! line, so a failure partway never leaves a committed line's stock without
//! its log entry.

use chrono::Utc;
use serde::Serialize;
use shared::import::{SaleLine, REQUIRED_COLUMNS};
use shared::validation::parse_flexible;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::services::catalog::upsert_product;

/// Note attached to the outbound movement of every imported sale line.
pub const IMPORT_MOVEMENT_NOTE: &str = "Venda importada";

/// Sales import service
#[derive(Clone)]
pub struct ImportService {
    db: SqlitePool,
}

/// Outcome of an import batch
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    /// Numeric cells that fell back to zero during decoding.
    pub defaulted_values: usize,
}

impl ImportService {
    /// Create a new ImportService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Decode a CSV batch into typed sale lines.
    ///
    /// The whole batch is rejected when a required column is missing; no
    /// rows are processed in that case.
    pub fn parse(bytes: &[u8]) -> AppResult<Vec<SaleLine>> {
        let mut reader = csv::Reader::from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| {
                AppError::validation(
                    "arquivo",
                    &format!("could not read the sheet: {e}"),
                    "Erro ao ler a planilha",
                )
            })?
            .clone();

        let mut missing: Vec<&str> = Vec::new();
        let mut column = |name: &'static str| match headers.iter().position(|h| h == name) {
            Some(index) => index,
            None => {
                missing.push(name);
                usize::MAX
            }
        };
        let col_sku = column(REQUIRED_COLUMNS[0]);
        let col_titulo = column(REQUIRED_COLUMNS[1]);
        let col_quantidade = column(REQUIRED_COLUMNS[2]);
        let col_receita = column(REQUIRED_COLUMNS[3]);
        let col_comissao = column(REQUIRED_COLUMNS[4]);
        if !missing.is_empty() {
            return Err(AppError::validation(
                "arquivo",
                &format!("missing required columns: {}", missing.join(", ")),
                "Planilha inválida. Use o template gerado pelo sistema",
            ));
        }
        let col_preco_medio = headers.iter().position(|h| h == "PrecoMedio");

        let mut lines = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                AppError::validation(
                    "arquivo",
                    &format!("could not read the sheet: {e}"),
                    "Erro ao ler a planilha",
                )
            })?;

            let mut defaulted = Vec::new();
            let mut number = |name: &str, index: usize| {
                let raw = record.get(index).unwrap_or("").trim();
                let parsed = parse_flexible(raw);
                // An empty cell is an ordinary zero; only unparseable text
                // counts as a flagged fallback.
                if parsed.defaulted && !raw.is_empty() {
                    defaulted.push(name.to_string());
                }
                parsed.value
            };

            let quantidade = number("Quantidade", col_quantidade);
            let receita = number("Receita", col_receita);
            let comissao = number("Comissao", col_comissao);
            let preco_medio = match col_preco_medio {
                Some(index) => number("PrecoMedio", index),
                None => 0.0,
            };

            lines.push(SaleLine {
                sku: record.get(col_sku).unwrap_or("").trim().to_string(),
                titulo: record.get(col_titulo).unwrap_or("").trim().to_string(),
                quantidade,
                receita,
                comissao,
                preco_medio,
                defaulted,
            });
        }

        Ok(lines)
    }

    /// Decode and apply an import batch
    pub async fn import(&self, bytes: &[u8]) -> AppResult<ImportSummary> {
        let lines = Self::parse(bytes)?;
        let mut summary = ImportSummary {
            total: lines.len(),
            ..Default::default()
        };

        for line in &lines {
            summary.defaulted_values += line.defaulted.len();
            if !line.defaulted.is_empty() {
                tracing::warn!(
                    sku = %line.sku,
                    columns = ?line.defaulted,
                    "unparseable cells defaulted to zero"
                );
            }

            if !line.importable() {
                summary.skipped += 1;
                continue;
            }

            self.apply_sale_line(line).await?;
            summary.imported += 1;
        }

        tracing::info!(
            total = summary.total,
            imported = summary.imported,
            skipped = summary.skipped,
            "sales import finished"
        );

        Ok(summary)
    }

    /// Upsert the product, insert the sale, decrement stock and append the
    /// outbound movement, atomically for this line.
    async fn apply_sale_line(&self, line: &SaleLine) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // New SKUs enter the catalog with zero stock and zero cost; the
        // decrement below then takes them negative by the sold quantity.
        upsert_product(&mut *tx, &line.sku, &line.titulo, 0.0, 0.0).await?;

        sqlx::query(
            "INSERT INTO vendas (sku, titulo, quantidade, receita, comissao, preco_medio) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&line.sku)
        .bind(&line.titulo)
        .bind(line.quantidade)
        .bind(line.receita)
        .bind(line.comissao)
        .bind(line.preco_medio)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE produtos SET estoque = estoque - ?2 WHERE sku = ?1")
            .bind(&line.sku)
            .bind(line.quantidade)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO estoque_mov (sku, data, tipo, quantidade, obs) \
             VALUES (?1, ?2, 'saida', ?3, ?4)",
        )
        .bind(&line.sku)
        .bind(Utc::now().date_naive())
        .bind(line.quantidade)
        .bind(IMPORT_MOVEMENT_NOTE)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
