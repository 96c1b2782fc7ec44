//! Tabular import contract
//!
//! The bulk sales import consumes a CSV sheet whose header must contain the
//! required columns below, case-sensitively; the whole batch is rejected
//! when any of them is missing. `PrecoMedio` is optional and defaults to
//! zero. The template export reproduces exactly this column set so exported
//! templates round-trip through the importer.

use serde::{Deserialize, Serialize};

/// Columns that must be present for an import batch to be accepted.
pub const REQUIRED_COLUMNS: [&str; 5] = ["SKU", "Titulo", "Quantidade", "Receita", "Comissao"];

/// Columns the importer understands but does not require.
pub const OPTIONAL_COLUMNS: [&str; 1] = ["PrecoMedio"];

/// Header row of the template sheet: the required columns followed by the
/// optional ones.
pub const TEMPLATE_COLUMNS: [&str; 6] = [
    "SKU",
    "Titulo",
    "Quantidade",
    "Receita",
    "Comissao",
    "PrecoMedio",
];

/// Header row of the consolidated report export.
pub const REPORT_COLUMNS: [&str; 11] = [
    "SKU",
    "Titulo",
    "Quantidade",
    "Receita",
    "Comissao",
    "Imposto",
    "Despesas",
    "CustoUnitario",
    "CustoTotal",
    "Lucro",
    "PrecoMedioVenda",
];

/// One decoded sale line, after header validation and numeric normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub sku: String,
    pub titulo: String,
    pub quantidade: f64,
    pub receita: f64,
    pub comissao: f64,
    pub preco_medio: f64,
    /// Columns whose value could not be parsed and fell back to zero.
    pub defaulted: Vec<String>,
}

impl SaleLine {
    /// Lines with an empty SKU or non-positive quantity are skipped
    /// silently by the importer.
    pub fn importable(&self) -> bool {
        !self.sku.is_empty() && self.quantidade > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_required_plus_optional_columns() {
        let expected: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .chain(OPTIONAL_COLUMNS.iter())
            .copied()
            .collect();
        assert_eq!(TEMPLATE_COLUMNS.to_vec(), expected);
    }

    #[test]
    fn skip_rule_matches_contract() {
        let line = |sku: &str, qtd: f64| SaleLine {
            sku: sku.to_string(),
            titulo: "Produto".to_string(),
            quantidade: qtd,
            receita: 10.0,
            comissao: 1.0,
            preco_medio: 10.0,
            defaulted: Vec::new(),
        };

        assert!(line("ABC-1", 1.0).importable());
        assert!(!line("", 1.0).importable());
        assert!(!line("ABC-1", 0.0).importable());
        assert!(!line("ABC-1", -3.0).importable());
    }
}
