//! Profitability consolidation
//!
//! Aggregates raw sale lines into one financial row per (sku, titulo) group,
//! applying the configured tax percentage, the marketplace expense percentage
//! over the net base, and cost of goods. The whole computation is a pure
//! function of its inputs; callers reload persisted state on every
//! invocation, so the report is always re-derivable and never cached.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{SaleRecord, Settings};

/// One row of the consolidated profitability report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub sku: String,
    pub titulo: String,
    pub quantidade: f64,
    pub receita: f64,
    pub comissao: f64,
    pub imposto: f64,
    pub despesas: f64,
    pub custo_unitario: f64,
    pub custo_total: f64,
    pub lucro: f64,
    pub preco_medio_venda: f64,
}

/// Elementwise sums over all report rows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportTotals {
    pub quantidade: f64,
    pub receita: f64,
    pub comissao: f64,
    pub imposto: f64,
    pub despesas: f64,
    pub custo_total: f64,
    pub lucro: f64,
}

/// The full consolidated report, with the settings it was derived under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedReport {
    pub rows: Vec<ReportRow>,
    pub totals: ReportTotals,
    pub settings: Settings,
}

#[derive(Default)]
struct GroupAcc {
    quantidade: f64,
    receita: f64,
    comissao: f64,
    preco_medio_sum: f64,
    linhas: u32,
}

/// Consolidate raw sale lines into the per-SKU profitability report.
///
/// Per (sku, titulo) group: quantities, revenue and commission are summed,
/// the average sale price is the mean over the group's lines, unit cost
/// comes from `unit_costs` (zero for SKUs without a catalog entry), and
///
/// ```text
/// imposto      = receita × imposto_pct / 100
/// base_liquida = max(receita − comissao, 0)
/// despesas     = base_liquida × despesa_pct / 100
/// custo_total  = custo_unitario × quantidade
/// lucro        = receita − (comissao + imposto + despesas + custo_total)
/// ```
///
/// Rows come out ordered by `lucro` descending; groups with equal profit are
/// tie-broken by `sku` ascending so the output is deterministic.
pub fn consolidate(
    sales: &[SaleRecord],
    unit_costs: &HashMap<String, f64>,
    settings: &Settings,
) -> ConsolidatedReport {
    let imposto_frac = settings.imposto_pct / 100.0;
    let despesa_frac = settings.despesa_pct / 100.0;

    let mut groups: BTreeMap<(String, String), GroupAcc> = BTreeMap::new();
    for sale in sales {
        let acc = groups
            .entry((sale.sku.clone(), sale.titulo.clone()))
            .or_default();
        acc.quantidade += sale.quantidade;
        acc.receita += sale.receita;
        acc.comissao += sale.comissao;
        acc.preco_medio_sum += sale.preco_medio;
        acc.linhas += 1;
    }

    let mut rows = Vec::with_capacity(groups.len());
    let mut totals = ReportTotals::default();

    for ((sku, titulo), acc) in groups {
        let custo_unitario = unit_costs.get(&sku).copied().unwrap_or(0.0);
        let custo_total = custo_unitario * acc.quantidade;
        let imposto = acc.receita * imposto_frac;
        let base_liquida = (acc.receita - acc.comissao).max(0.0);
        let despesas = base_liquida * despesa_frac;
        let lucro = acc.receita - (acc.comissao + imposto + despesas + custo_total);
        let preco_medio_venda = if acc.linhas > 0 {
            acc.preco_medio_sum / acc.linhas as f64
        } else {
            0.0
        };

        totals.quantidade += acc.quantidade;
        totals.receita += acc.receita;
        totals.comissao += acc.comissao;
        totals.imposto += imposto;
        totals.despesas += despesas;
        totals.custo_total += custo_total;
        totals.lucro += lucro;

        rows.push(ReportRow {
            sku,
            titulo,
            quantidade: acc.quantidade,
            receita: acc.receita,
            comissao: acc.comissao,
            imposto,
            despesas,
            custo_unitario,
            custo_total,
            lucro,
            preco_medio_venda,
        });
    }

    rows.sort_by(|a, b| {
        b.lucro
            .partial_cmp(&a.lucro)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.sku.cmp(&b.sku))
    });

    ConsolidatedReport {
        rows,
        totals,
        settings: *settings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sale(sku: &str, titulo: &str, qtd: f64, receita: f64, comissao: f64, preco: f64) -> SaleRecord {
        SaleRecord {
            id: 0,
            sku: sku.to_string(),
            titulo: titulo.to_string(),
            quantidade: qtd,
            receita,
            comissao,
            preco_medio: preco,
        }
    }

    fn costs(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(s, c)| (s.to_string(), *c)).collect()
    }

    #[test]
    fn profit_formula_reference_case() {
        // revenue 1000, commission 100, unit cost 2, qty 50, tax 5%, expense 3.5%
        let sales = vec![sale("A", "Produto A", 50.0, 1000.0, 100.0, 20.0)];
        let settings = Settings {
            imposto_pct: 5.0,
            despesa_pct: 3.5,
        };

        let report = consolidate(&sales, &costs(&[("A", 2.0)]), &settings);
        let row = &report.rows[0];

        assert!((row.imposto - 50.0).abs() < EPS);
        assert!((row.despesas - 31.5).abs() < EPS);
        assert!((row.custo_total - 100.0).abs() < EPS);
        assert!((row.lucro - 718.5).abs() < EPS);
    }

    #[test]
    fn net_base_is_floored_at_zero() {
        // Commission larger than revenue: expense base must clamp to zero,
        // never go negative.
        let sales = vec![sale("A", "Produto A", 1.0, 100.0, 150.0, 0.0)];
        let settings = Settings {
            imposto_pct: 0.0,
            despesa_pct: 10.0,
        };

        let report = consolidate(&sales, &HashMap::new(), &settings);
        assert!((report.rows[0].despesas - 0.0).abs() < EPS);
        assert!((report.rows[0].lucro - (100.0 - 150.0)).abs() < EPS);
    }

    #[test]
    fn lines_group_by_sku_and_title() {
        let sales = vec![
            sale("A", "Produto A", 2.0, 20.0, 2.0, 10.0),
            sale("A", "Produto A", 3.0, 30.0, 3.0, 12.0),
            sale("A", "Produto A (novo)", 1.0, 10.0, 1.0, 10.0),
        ];
        let report = consolidate(&sales, &HashMap::new(), &Settings::default());

        assert_eq!(report.rows.len(), 2);
        let merged = report
            .rows
            .iter()
            .find(|r| r.titulo == "Produto A")
            .unwrap();
        assert!((merged.quantidade - 5.0).abs() < EPS);
        assert!((merged.receita - 50.0).abs() < EPS);
        // Mean of 10.0 and 12.0
        assert!((merged.preco_medio_venda - 11.0).abs() < EPS);
    }

    #[test]
    fn unknown_sku_costs_zero() {
        let sales = vec![sale("GHOST", "Sem cadastro", 4.0, 40.0, 0.0, 10.0)];
        let report = consolidate(&sales, &costs(&[("OTHER", 9.9)]), &Settings::default());

        assert!((report.rows[0].custo_unitario - 0.0).abs() < EPS);
        assert!((report.rows[0].custo_total - 0.0).abs() < EPS);
    }

    #[test]
    fn rows_are_ranked_by_profit_with_sku_tiebreak() {
        let settings = Settings {
            imposto_pct: 0.0,
            despesa_pct: 0.0,
        };
        let sales = vec![
            sale("C", "C", 1.0, 50.0, 0.0, 0.0),
            sale("A", "A", 1.0, 100.0, 0.0, 0.0),
            // B and D tie on profit; B must come first.
            sale("D", "D", 1.0, 75.0, 0.0, 0.0),
            sale("B", "B", 1.0, 75.0, 0.0, 0.0),
        ];

        let report = consolidate(&sales, &HashMap::new(), &settings);
        let order: Vec<&str> = report.rows.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn totals_match_independent_sums() {
        let sales = vec![
            sale("A", "A", 2.0, 200.0, 20.0, 100.0),
            sale("B", "B", 1.0, 80.0, 120.0, 80.0),
            sale("A", "A", 3.0, 290.0, 30.0, 95.0),
            sale("C", "C", 10.0, 55.5, 5.5, 5.55),
        ];
        let unit_costs = costs(&[("A", 12.0), ("B", 1.5)]);
        let settings = Settings {
            imposto_pct: 7.0,
            despesa_pct: 2.5,
        };

        let report = consolidate(&sales, &unit_costs, &settings);

        let qtd: f64 = sales.iter().map(|s| s.quantidade).sum();
        let receita: f64 = sales.iter().map(|s| s.receita).sum();
        let comissao: f64 = sales.iter().map(|s| s.comissao).sum();
        assert!((report.totals.quantidade - qtd).abs() < EPS);
        assert!((report.totals.receita - receita).abs() < EPS);
        assert!((report.totals.comissao - comissao).abs() < EPS);

        let row_lucro: f64 = report.rows.iter().map(|r| r.lucro).sum();
        assert!((report.totals.lucro - row_lucro).abs() < EPS);
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = consolidate(&[], &HashMap::new(), &Settings::default());
        assert!(report.rows.is_empty());
        assert_eq!(report.totals, ReportTotals::default());
    }
}
