//! Descriptive and financial attributes of a listed company.
//!
//! Feeds deliver these as a loose key-value mapping that may be partial or
//! absent. Known keys are lifted into typed optional fields; anything else
//! is kept verbatim in [`CompanyAttributes::extra`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyAttributes {
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub full_time_employees: Option<u64>,
    #[serde(deserialize_with = "lenient_number")]
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE", deserialize_with = "lenient_number")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE", deserialize_with = "lenient_number")]
    pub forward_pe: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub peg_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub price_to_book: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub dividend_yield: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub beta: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub fifty_two_week_low: Option<f64>,
    /// Keys the typed fields don't cover.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CompanyAttributes {
    /// Parse a feed's JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Display name, falling back to the ticker.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.long_name.as_deref().unwrap_or(symbol)
    }

    /// Market capitalisation, ignoring zero placeholders.
    pub fn market_cap(&self) -> Option<f64> {
        self.market_cap.filter(|cap| *cap > 0.0)
    }
}

/// A finite number, or a string holding one. Anything else ("N/A", null,
/// objects) reads as missing instead of failing the whole mapping.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

/// A non-negative whole number, accepting `161000.0` and `"161000"`.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let number = lenient_number(deserializer)?;
    Ok(number
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
        .map(|n| n as u64))
}
