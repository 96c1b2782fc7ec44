//! Input normalization helpers
//!
//! Numeric fields arrive from web forms and spreadsheets in pt-BR shapes
//! ("1.234,56", "12,5") or not at all. The policy is lenient: values that
//! cannot be parsed become zero, but the fallback is always explicit via
//! [`NumberField::defaulted`], so callers surface and log it instead of
//! absorbing bad data silently.

use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of leniently parsing a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberField {
    pub value: f64,
    /// True when the input was missing or unparseable and zero was used.
    pub defaulted: bool,
}

impl NumberField {
    pub fn parsed(value: f64) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    /// The zero fallback for missing or unparseable input.
    pub fn fallback() -> Self {
        Self {
            value: 0.0,
            defaulted: true,
        }
    }
}

/// Parse a human-entered number, accepting a comma decimal separator.
///
/// When the input contains a comma, periods are treated as thousands
/// separators and stripped ("1.234,56" → 1234.56). Empty or unparseable
/// input falls back to zero with `defaulted` set.
pub fn parse_flexible(raw: &str) -> NumberField {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NumberField::fallback();
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => NumberField::parsed(value),
        _ => NumberField::fallback(),
    }
}

impl<'de> Deserialize<'de> for NumberField {
    /// Accepts a JSON number or a numeric string (comma decimals allowed);
    /// anything else becomes the explicit zero fallback.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Num(value)) if value.is_finite() => NumberField::parsed(value),
            Some(Raw::Num(_)) | None => NumberField::fallback(),
            Some(Raw::Text(text)) => parse_flexible(&text),
        })
    }
}
