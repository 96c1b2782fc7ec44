//! Business logic services for the Metrify backend

pub mod catalog;
pub mod consolidation;
pub mod import;
pub mod reporting;
pub mod settings;
pub mod stock;

pub use catalog::CatalogService;
pub use consolidation::ConsolidationService;
pub use import::ImportService;
pub use reporting::ReportingService;
pub use settings::SettingsService;
pub use stock::StockService;

use shared::validation::NumberField;

/// Resolve an optional lenient numeric input to its value, logging the
/// explicit zero fallback when the input could not be parsed.
pub(crate) fn number_or_zero(field: &'static str, value: Option<NumberField>) -> f64 {
    match value {
        Some(number) => {
            if number.defaulted {
                tracing::warn!(field, "unparseable numeric input, defaulting to zero");
            }
            number.value
        }
        None => 0.0,
    }
}
