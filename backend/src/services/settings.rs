//! Tax and expense settings service

use serde::Deserialize;
use shared::models::Settings;
use shared::validation::NumberField;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};

/// Settings service for the singleton configuration record
#[derive(Clone)]
pub struct SettingsService {
    db: SqlitePool,
}

/// Input for updating the settings
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsInput {
    pub imposto_pct: NumberField,
    pub despesa_pct: NumberField,
}

impl SettingsService {
    /// Create a new SettingsService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Fetch the singleton fresh on every call. There is no process-wide
    /// cache, so an update is visible to the very next consolidation.
    pub async fn get(&self) -> AppResult<Settings> {
        let settings = sqlx::query_as::<_, Settings>(
            "SELECT imposto_pct, despesa_pct FROM settings WHERE id = 1",
        )
        .fetch_optional(&self.db)
        .await?
        .unwrap_or_default();

        Ok(settings)
    }

    /// Update the percentages. Both must be finite and non-negative.
    pub async fn update(&self, input: UpdateSettingsInput) -> AppResult<Settings> {
        for (field, number) in [
            ("imposto_pct", &input.imposto_pct),
            ("despesa_pct", &input.despesa_pct),
        ] {
            if number.defaulted || number.value < 0.0 {
                return Err(AppError::validation(
                    field,
                    "percentage must be a non-negative number",
                    "Percentual deve ser um número maior ou igual a zero",
                ));
            }
        }

        sqlx::query(
            "INSERT INTO settings (id, imposto_pct, despesa_pct) VALUES (1, ?1, ?2) \
             ON CONFLICT(id) DO UPDATE SET \
                 imposto_pct = excluded.imposto_pct, \
                 despesa_pct = excluded.despesa_pct",
        )
        .bind(input.imposto_pct.value)
        .bind(input.despesa_pct.value)
        .execute(&self.db)
        .await?;

        self.get().await
    }
}
