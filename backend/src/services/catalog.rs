//! Product catalog service

use serde::Deserialize;
use shared::models::Product;
use shared::validation::NumberField;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::number_or_zero;

/// Catalog service for product CRUD and the idempotent import upsert
#[derive(Clone)]
pub struct CatalogService {
    db: SqlitePool,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub sku: String,
    pub titulo: Option<String>,
    #[serde(default)]
    pub estoque: Option<NumberField>,
    #[serde(default)]
    pub custo_unitario: Option<NumberField>,
}

/// Input for updating a product. Absent fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub sku: String,
    pub titulo: Option<String>,
    #[serde(default)]
    pub estoque: Option<NumberField>,
    #[serde(default)]
    pub custo_unitario: Option<NumberField>,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all products, ordered by title
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, sku, titulo, estoque, custo_unitario FROM produtos ORDER BY titulo",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Fetch one product by storage id
    pub async fn get(&self, id: i64) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "SELECT id, sku, titulo, estoque, custo_unitario FROM produtos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto".to_string()))
    }

    /// Fetch one product by its business key
    pub async fn get_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, sku, titulo, estoque, custo_unitario FROM produtos WHERE sku = ?1",
        )
        .bind(sku)
        .fetch_optional(&self.db)
        .await?;

        Ok(product)
    }

    /// Create a product from manual entry
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        let sku = input.sku.trim().to_string();
        if sku.is_empty() {
            return Err(AppError::validation(
                "sku",
                "sku is required",
                "SKU é obrigatório",
            ));
        }

        let titulo = input.titulo.unwrap_or_default().trim().to_string();
        let estoque = number_or_zero("estoque", input.estoque);
        let custo_unitario = number_or_zero("custo_unitario", input.custo_unitario);

        let taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM produtos WHERE sku = ?1")
            .bind(&sku)
            .fetch_one(&self.db)
            .await?;
        if taken > 0 {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        let result = sqlx::query(
            "INSERT INTO produtos (sku, titulo, estoque, custo_unitario) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&sku)
        .bind(&titulo)
        .bind(estoque)
        .bind(custo_unitario)
        .execute(&self.db)
        .await?;

        tracing::info!(sku = %sku, "product created");

        self.get(result.last_insert_rowid()).await
    }

    /// Update a product; absent fields keep their stored value
    pub async fn update(&self, id: i64, input: UpdateProductInput) -> AppResult<Product> {
        let current = self.get(id).await?;

        let sku = input.sku.trim().to_string();
        if sku.is_empty() {
            return Err(AppError::validation(
                "sku",
                "sku is required",
                "SKU é obrigatório",
            ));
        }

        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM produtos WHERE sku = ?1 AND id != ?2",
        )
        .bind(&sku)
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        if taken > 0 {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        let titulo = match input.titulo {
            Some(titulo) => titulo.trim().to_string(),
            None => current.titulo,
        };
        let estoque = input.estoque.map_or(current.estoque, |n| {
            number_or_zero("estoque", Some(n))
        });
        let custo_unitario = input.custo_unitario.map_or(current.custo_unitario, |n| {
            number_or_zero("custo_unitario", Some(n))
        });

        sqlx::query(
            "UPDATE produtos SET sku = ?2, titulo = ?3, estoque = ?4, custo_unitario = ?5 WHERE id = ?1",
        )
        .bind(id)
        .bind(&sku)
        .bind(&titulo)
        .bind(estoque)
        .bind(custo_unitario)
        .execute(&self.db)
        .await?;

        self.get(id).await
    }

    /// Hard-delete a product. Movement and sale history is kept; those rows
    /// keep referencing the SKU and history listings never join against
    /// `produtos`, so reads stay orphan-tolerant.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Produto".to_string()));
        }

        tracing::info!(id, "product deleted, history rows kept");
        Ok(())
    }

    /// Idempotent create-or-get: unknown SKUs are inserted with the given
    /// initial stock and cost; known SKUs are left untouched apart from the
    /// title refresh described on [`upsert_product`].
    pub async fn create_or_get(
        &self,
        sku: &str,
        titulo: &str,
        estoque: f64,
        custo_unitario: f64,
    ) -> AppResult<Product> {
        let mut conn = self.db.acquire().await?;
        upsert_product(&mut *conn, sku, titulo, estoque, custo_unitario).await?;
        drop(conn);

        self.get_by_sku(sku)
            .await?
            .ok_or_else(|| AppError::NotFound("Produto".to_string()))
    }
}

/// Create the product if the SKU is unknown; otherwise leave the row
/// untouched except for refreshing the title when a non-empty, different
/// title is supplied. Takes a plain connection so the import service can run
/// it inside its per-line transaction.
pub(crate) async fn upsert_product(
    conn: &mut SqliteConnection,
    sku: &str,
    titulo: &str,
    estoque: f64,
    custo_unitario: f64,
) -> Result<(), sqlx::Error> {
    let existing =
        sqlx::query_as::<_, (i64, String)>("SELECT id, titulo FROM produtos WHERE sku = ?1")
            .bind(sku)
            .fetch_optional(&mut *conn)
            .await?;

    match existing {
        None => {
            sqlx::query(
                "INSERT INTO produtos (sku, titulo, estoque, custo_unitario) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(sku)
            .bind(titulo)
            .bind(estoque)
            .bind(custo_unitario)
            .execute(&mut *conn)
            .await?;
        }
        Some((id, current_titulo)) => {
            if !titulo.is_empty() && titulo != current_titulo {
                sqlx::query("UPDATE produtos SET titulo = ?2 WHERE id = ?1")
                    .bind(id)
                    .bind(titulo)
                    .execute(&mut *conn)
                    .await?;
            }
        }
    }

    Ok(())
}
