//! Sales import tests
//!
//! Covers the import contract: whole-batch rejection on missing required
//! columns, silent row skipping, product auto-creation with the immediate
//! stock decrement, title refresh, lenient numeric decoding, and the
//! template round-trip.

mod common;

use metrify_backend::error::AppError;
use metrify_backend::services::catalog::{CatalogService, CreateProductInput};
use metrify_backend::services::consolidation::ConsolidationService;
use metrify_backend::services::import::{ImportService, IMPORT_MOVEMENT_NOTE};
use shared::import::{OPTIONAL_COLUMNS, REQUIRED_COLUMNS, TEMPLATE_COLUMNS};
use shared::models::MovementKind;
use shared::validation::NumberField;

const EPS: f64 = 1e-9;

async fn table_count(pool: &sqlx::SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

#[tokio::test]
async fn import_creates_the_product_and_decrements_its_stock() {
    let pool = common::test_pool().await;
    let sheet = "SKU,Titulo,Quantidade,Receita,Comissao,PrecoMedio\n\
                 NOVO-1,Produto Novo,3,30,3,10\n";

    let summary = ImportService::new(pool.clone())
        .import(sheet.as_bytes())
        .await
        .unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped, 0);

    // Created at zero stock, then immediately decremented by the sold qty.
    assert!((common::current_stock(&pool, "NOVO-1").await - (-3.0)).abs() < EPS);

    assert_eq!(
        table_count(&pool, "SELECT COUNT(*) FROM vendas WHERE sku = 'NOVO-1'").await,
        1
    );

    let (tipo, quantidade, obs): (String, f64, String) =
        sqlx::query_as("SELECT tipo, quantidade, obs FROM estoque_mov WHERE sku = 'NOVO-1'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(tipo, MovementKind::Saida.as_str());
    assert!((quantidade - 3.0).abs() < EPS);
    assert_eq!(obs, IMPORT_MOVEMENT_NOTE);
}

#[tokio::test]
async fn rows_with_empty_sku_or_non_positive_quantity_are_skipped() {
    let pool = common::test_pool().await;
    let sheet = "SKU,Titulo,Quantidade,Receita,Comissao\n\
                 BOM-1,Bom,1,10,1\n\
                 ,Sem SKU,2,20,2\n\
                 ZERO-1,Zerado,0,30,3\n";

    let summary = ImportService::new(pool.clone())
        .import(sheet.as_bytes())
        .await
        .unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped, 2);

    // Skipped lines leave no sale, no movement and no product behind.
    assert_eq!(table_count(&pool, "SELECT COUNT(*) FROM vendas").await, 1);
    assert_eq!(table_count(&pool, "SELECT COUNT(*) FROM estoque_mov").await, 1);
    assert_eq!(table_count(&pool, "SELECT COUNT(*) FROM produtos").await, 1);
}

#[tokio::test]
async fn missing_required_column_rejects_the_whole_batch() {
    let pool = common::test_pool().await;
    // No Comissao column, even though the rows look plausible.
    let sheet = "SKU,Titulo,Quantidade,Receita\n\
                 BOM-1,Bom,1,10\n";

    let err = ImportService::new(pool.clone())
        .import(sheet.as_bytes())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { field, .. } if field == "arquivo"));

    assert_eq!(table_count(&pool, "SELECT COUNT(*) FROM vendas").await, 0);
    assert_eq!(table_count(&pool, "SELECT COUNT(*) FROM estoque_mov").await, 0);
    assert_eq!(table_count(&pool, "SELECT COUNT(*) FROM produtos").await, 0);
}

#[tokio::test]
async fn import_updates_known_products_in_place() {
    let pool = common::test_pool().await;
    CatalogService::new(pool.clone())
        .create(CreateProductInput {
            sku: "VELHO-1".to_string(),
            titulo: Some("Título velho".to_string()),
            estoque: Some(NumberField::parsed(10.0)),
            custo_unitario: Some(NumberField::parsed(7.5)),
        })
        .await
        .unwrap();

    let sheet = "SKU,Titulo,Quantidade,Receita,Comissao\n\
                 VELHO-1,Título novo,4,40,4\n";
    ImportService::new(pool.clone())
        .import(sheet.as_bytes())
        .await
        .unwrap();

    let product = CatalogService::new(pool.clone())
        .get_by_sku("VELHO-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.titulo, "Título novo");
    assert!((product.estoque - 6.0).abs() < EPS);
    // Unit cost is never touched by imports.
    assert!((product.custo_unitario - 7.5).abs() < EPS);
}

#[tokio::test]
async fn preco_medio_defaults_to_zero_when_the_column_is_absent() {
    let pool = common::test_pool().await;
    let sheet = "SKU,Titulo,Quantidade,Receita,Comissao\n\
                 SEM-PRECO,Produto,2,20,2\n";

    ImportService::new(pool.clone())
        .import(sheet.as_bytes())
        .await
        .unwrap();

    let preco_medio: f64 =
        sqlx::query_scalar("SELECT preco_medio FROM vendas WHERE sku = 'SEM-PRECO'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!((preco_medio - 0.0).abs() < EPS);
}

#[tokio::test]
async fn unparseable_cells_default_to_zero_and_are_counted() {
    let pool = common::test_pool().await;
    let sheet = "SKU,Titulo,Quantidade,Receita,Comissao\n\
                 SUJO-1,Produto,2,abc,1\n";

    let summary = ImportService::new(pool.clone())
        .import(sheet.as_bytes())
        .await
        .unwrap();
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.defaulted_values, 1);

    let receita: f64 = sqlx::query_scalar("SELECT receita FROM vendas WHERE sku = 'SUJO-1'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!((receita - 0.0).abs() < EPS);
}

#[tokio::test]
async fn comma_decimals_are_normalized() {
    let pool = common::test_pool().await;
    let sheet = "SKU,Titulo,Quantidade,Receita,Comissao\n\
                 BR-1,Produto,\"2,5\",\"1.234,56\",\"12,34\"\n";

    let summary = ImportService::new(pool.clone())
        .import(sheet.as_bytes())
        .await
        .unwrap();
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.defaulted_values, 0);

    let (quantidade, receita, comissao): (f64, f64, f64) =
        sqlx::query_as("SELECT quantidade, receita, comissao FROM vendas WHERE sku = 'BR-1'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!((quantidade - 2.5).abs() < EPS);
    assert!((receita - 1234.56).abs() < EPS);
    assert!((comissao - 12.34).abs() < EPS);
    assert!((common::current_stock(&pool, "BR-1").await - (-2.5)).abs() < EPS);
}

#[test]
fn template_round_trips_through_the_importer() {
    let template = ConsolidationService::template_csv().unwrap();

    let header = template.lines().next().unwrap();
    let headers: Vec<&str> = header.split(',').collect();
    assert_eq!(headers, TEMPLATE_COLUMNS.to_vec());
    for column in REQUIRED_COLUMNS.iter().chain(OPTIONAL_COLUMNS.iter()) {
        assert!(headers.contains(column), "missing {column}");
    }

    // The empty template is a valid, zero-line import batch.
    let lines = ImportService::parse(template.as_bytes()).unwrap();
    assert!(lines.is_empty());
}
