//! Feature schema shared by model training and inference.
//!
//! A single source of truth for the feature order, so a model fitted on
//! rows built here can never be fed a differently ordered vector.
//!
//! # Usage
//!
//! ```
//! use types::features::{idx, FEATURE_NAMES, N_FEATURES};
//!
//! let mut values = [0.0; N_FEATURES];
//! values[idx::RSI_14] = 55.0;
//! assert_eq!(FEATURE_NAMES[idx::RSI_14], "rsi_14");
//! ```

use serde::{Deserialize, Serialize};

use crate::ids::Timestamp;

// =============================================================================
// Constants
// =============================================================================

/// Total number of features per row.
pub const N_FEATURES: usize = 9;

/// Bars of history needed before every feature is defined.
pub const MAX_LOOKBACK: usize = 20;

/// Window for the rolling return volatility feature.
pub const VOLATILITY_WINDOW: usize = 10;

/// Multi-bar return horizon.
pub const RETURN_HORIZON: usize = 5;

/// Named feature indices.
pub mod idx {
    /// One-bar percentage return.
    pub const RETURN_1: usize = 0;
    /// Five-bar percentage return.
    pub const RETURN_5: usize = 1;
    /// Percentage distance of close from SMA_20.
    pub const SMA_20_DISTANCE: usize = 2;
    /// RSI(14).
    pub const RSI_14: usize = 3;
    /// Bollinger %B.
    pub const BB_PERCENT_B: usize = 4;
    /// ATR as a percentage of close.
    pub const ATR_RATIO: usize = 5;
    /// Sample std of the last 10 one-bar returns.
    pub const VOLATILITY_10: usize = 6;
    /// Volume over its 20-bar average.
    pub const VOLUME_RATIO: usize = 7;
    /// High-low range as a percentage of close.
    pub const RANGE_PCT: usize = 8;
}

/// Feature names, in index order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "return_1",
    "return_5",
    "sma_20_distance",
    "rsi_14",
    "bb_percent_b",
    "atr_ratio",
    "volatility_10",
    "volume_ratio",
    "range_pct",
];

/// Bars needed before each feature is defined, in index order.
pub const FEATURE_LOOKBACKS: [usize; N_FEATURES] = [
    2,
    RETURN_HORIZON + 1,
    20,
    15,
    20,
    14,
    VOLATILITY_WINDOW + 1,
    20,
    1,
];

// =============================================================================
// Rows
// =============================================================================

/// Fixed-order feature vector for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Timestamp of the bar the features describe.
    pub timestamp: Timestamp,
    pub values: [f64; N_FEATURES],
}

impl FeatureRow {
    pub fn new(timestamp: Timestamp, values: [f64; N_FEATURES]) -> Self {
        Self { timestamp, values }
    }

    /// Value by feature name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }
}

/// A feature row with its realized next-bar label.
///
/// `label` is `None` only for the most recent row, which is reserved for
/// inference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub features: FeatureRow,
    pub label: Option<f64>,
}

// =============================================================================
// Pure Computation Functions
// =============================================================================

/// Percentage change from `past` to `current`.
///
/// Returns `None` if `past` is not positive.
#[inline]
pub fn price_change_pct(current: f64, past: f64) -> Option<f64> {
    (past > 0.0).then(|| (current - past) / past * 100.0)
}

/// Bollinger %B (normalized position within bands).
///
/// A zero-width band (constant prices) puts price at the midpoint.
#[inline]
pub fn bollinger_percent_b(price: f64, upper: f64, lower: f64) -> f64 {
    let width = upper - lower;
    if width > 0.0 {
        (price - lower) / width
    } else {
        0.5
    }
}

/// `value / base`, with a neutral 1.0 when the base is not positive.
#[inline]
pub fn ratio_or_neutral(value: f64, base: f64) -> f64 {
    if base > 0.0 { value / base } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_consistent() {
        assert_eq!(FEATURE_NAMES.len(), N_FEATURES);
        assert_eq!(FEATURE_LOOKBACKS.iter().copied().max(), Some(MAX_LOOKBACK));
        assert_eq!(FEATURE_NAMES[idx::RETURN_1], "return_1");
        assert_eq!(FEATURE_NAMES[idx::VOLUME_RATIO], "volume_ratio");
        assert_eq!(FEATURE_NAMES[idx::RANGE_PCT], "range_pct");
    }

    #[test]
    fn test_price_change_pct() {
        assert!((price_change_pct(110.0, 100.0).unwrap() - 10.0).abs() < 1e-12);
        assert!(price_change_pct(110.0, 0.0).is_none());
    }

    #[test]
    fn test_percent_b() {
        assert!((bollinger_percent_b(15.0, 20.0, 10.0) - 0.5).abs() < 1e-12);
        assert!((bollinger_percent_b(20.0, 20.0, 10.0) - 1.0).abs() < 1e-12);
        assert_eq!(bollinger_percent_b(10.0, 10.0, 10.0), 0.5);
    }

    #[test]
    fn test_feature_lookup_by_name() {
        let mut values = [0.0; N_FEATURES];
        values[idx::ATR_RATIO] = 2.5;
        let row = FeatureRow::new(7, values);
        assert_eq!(row.get("atr_ratio"), Some(2.5));
        assert_eq!(row.get("missing"), None);
    }
}
