//! Tax and expense settings

use serde::{Deserialize, Serialize};

/// Default tax percentage seeded at initialization.
pub const DEFAULT_IMPOSTO_PCT: f64 = 5.0;

/// Default marketplace-expense percentage seeded at initialization.
pub const DEFAULT_DESPESA_PCT: f64 = 3.5;

/// The singleton configuration record (row id = 1). Percentages are stored
/// as human percentage points: 5.0 means 5%.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Settings {
    pub imposto_pct: f64,
    pub despesa_pct: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            imposto_pct: DEFAULT_IMPOSTO_PCT,
            despesa_pct: DEFAULT_DESPESA_PCT,
        }
    }
}
