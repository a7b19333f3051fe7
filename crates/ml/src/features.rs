//! Feature and label extraction from an indicator-augmented series.
//!
//! # Features Extracted (9 total)
//!
//! - **Price history** (3): 1-bar return, 5-bar return, high-low range
//! - **Technical indicators** (4): distance from SMA_20, RSI, Bollinger %B, ATR ratio
//! - **Volatility / volume** (2): 10-bar return volatility, volume vs. its 20-bar average
//!
//! Order and names come from [`types::features`], so training and inference
//! rows always agree.
//!
//! # Labels
//!
//! The label of row `i` is the percentage return from `Close[i]` to
//! `Close[i + 1]`. The final row has no label and is kept for inference.

use quant::stats;
use types::features::{
    MAX_LOOKBACK, RETURN_HORIZON, VOLATILITY_WINDOW, bollinger_percent_b, idx, price_change_pct,
    ratio_or_neutral,
};
use types::{AnalyzedSeries, FeatureRow, LabeledRow, N_FEATURES};

/// Builds feature rows and next-bar labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// All rows whose features are fully defined, oldest first.
    ///
    /// Every row carries a label except the series' final bar, which is
    /// returned last with `label: None` when its features are defined.
    pub fn build(analyzed: &AnalyzedSeries) -> Vec<LabeledRow> {
        let closes = analyzed.series().closes();
        let last = analyzed.len().saturating_sub(1);

        (MAX_LOOKBACK - 1..analyzed.len())
            .filter_map(|i| {
                let features = Self::features_at(analyzed, &closes, i)?;
                if i == last {
                    return Some(LabeledRow {
                        features,
                        label: None,
                    });
                }
                let label = price_change_pct(closes[i + 1], closes[i])?;
                Some(LabeledRow {
                    features,
                    label: Some(label),
                })
            })
            .collect()
    }

    /// The unlabelled inference row, if the final bar has every feature.
    pub fn latest_row(rows: &[LabeledRow]) -> Option<FeatureRow> {
        rows.last()
            .filter(|row| row.label.is_none())
            .map(|row| row.features)
    }

    /// Feature vector of row `i`, or `None` if any feature is undefined.
    fn features_at(analyzed: &AnalyzedSeries, closes: &[f64], i: usize) -> Option<FeatureRow> {
        let (bar, ind) = analyzed.at(i)?;
        let close = bar.close;
        if close <= 0.0 {
            return None;
        }

        let mut values = [0.0; N_FEATURES];
        values[idx::RETURN_1] = price_change_pct(close, closes[i.checked_sub(1)?])?;
        values[idx::RETURN_5] = price_change_pct(close, closes[i.checked_sub(RETURN_HORIZON)?])?;
        values[idx::SMA_20_DISTANCE] = price_change_pct(close, ind.sma_20?)?;
        values[idx::RSI_14] = ind.rsi_14?;
        values[idx::BB_PERCENT_B] = bollinger_percent_b(close, ind.bb_upper?, ind.bb_lower?);
        values[idx::ATR_RATIO] = ind.atr_14? / close * 100.0;
        values[idx::VOLATILITY_10] = return_volatility(closes, i)?;
        values[idx::VOLUME_RATIO] = ratio_or_neutral(bar.volume, ind.volume_sma_20?);
        values[idx::RANGE_PCT] = bar.range() / close * 100.0;

        Some(FeatureRow::new(bar.timestamp, values))
    }
}

/// Sample std of the last [`VOLATILITY_WINDOW`] one-bar percentage returns
/// ending at row `i`.
fn return_volatility(closes: &[f64], i: usize) -> Option<f64> {
    let start = i.checked_sub(VOLATILITY_WINDOW)?;
    let window = &closes[start..=i];
    let returns: Vec<f64> = window
        .windows(2)
        .map(|w| price_change_pct(w[1], w[0]))
        .collect::<Option<_>>()?;
    stats::sample_std_dev(&returns)
}
