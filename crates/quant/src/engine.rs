//! Indicator engine: one pass from a price series to its indicator table.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌─────────────────────┐    ┌────────────────┐
//! │ PriceSeries  │ ─▶ │   IndicatorEngine   │ ─▶ │ AnalyzedSeries │
//! └──────────────┘    │  SMA EMA RSI MACD   │    │ bars + rows    │
//!                     │  Bollinger ATR Vol  │    └────────────────┘
//!                     └─────────────────────┘
//! ```
//!
//! Every column is computed over the whole series, then zipped row-wise
//! into [`IndicatorRow`]s. The input series is never modified.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use types::indicators::periods;
use types::{AnalyzedSeries, IndicatorRow, PriceSeries};

use crate::error::{IndicatorError, Result};
use crate::indicators::{
    Atr, BollingerBands, Column, Ema, Indicator, Macd, Rsi, RsiSmoothing, Sma,
};

/// Tunable parts of the standard indicator set.
///
/// Window lengths are fixed by [`periods`]; only the methods are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// How RSI averages gains and losses.
    pub rsi_smoothing: RsiSmoothing,
    /// Bollinger band width in standard deviations.
    pub bollinger_k: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_smoothing: RsiSmoothing::Simple,
            bollinger_k: 2.0,
        }
    }
}

impl IndicatorConfig {
    pub fn rsi_smoothing(mut self, smoothing: RsiSmoothing) -> Self {
        self.rsi_smoothing = smoothing;
        self
    }

    /// Band width; negative or non-finite values fall back to 2.0.
    pub fn bollinger_k(mut self, k: f64) -> Self {
        self.bollinger_k = k;
        self.sanitized()
    }

    /// Replace settings that would invert the bands.
    fn sanitized(mut self) -> Self {
        if !(self.bollinger_k.is_finite() && self.bollinger_k >= 0.0) {
            warn!(bollinger_k = self.bollinger_k, "invalid Bollinger width, using default");
            self.bollinger_k = Self::default().bollinger_k;
        }
        self
    }
}

/// Computes the standard indicator table for a price series.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Augment `series` with one [`IndicatorRow`] per bar.
    ///
    /// # Errors
    /// [`IndicatorError::EmptySeries`] when the series has no bars. Any
    /// shorter history succeeds with `None` in the unfilled columns.
    pub fn compute(&self, series: &PriceSeries) -> Result<AnalyzedSeries> {
        if series.is_empty() {
            return Err(IndicatorError::EmptySeries(series.symbol().to_string()));
        }

        let bars = series.bars();
        let closes = series.closes();

        let sma_20 = Sma::calculate_from_prices(&closes, periods::SMA_SHORT);
        let sma_50 = Sma::calculate_from_prices(&closes, periods::SMA_LONG);
        let ema_12 = Ema::calculate_from_prices(&closes, periods::MACD_FAST);
        let ema_26 = Ema::calculate_from_prices(&closes, periods::MACD_SLOW);
        let rsi = Rsi::calculate_from_prices(&closes, periods::RSI, self.config.rsi_smoothing);
        let macd = Macd::new(periods::MACD_FAST, periods::MACD_SLOW, periods::MACD_SIGNAL)
            .calculate_full_from_prices(&closes);
        let bands = BollingerBands::new(periods::BOLLINGER, self.config.bollinger_k)
            .calculate_full_from_prices(&closes);
        let atr: Column = Atr::new(periods::ATR).calculate(bars);
        let volume_sma = Sma::calculate_from_prices(&series.volumes(), periods::VOLUME_AVG);

        let rows: Vec<IndicatorRow> = (0..bars.len())
            .map(|i| IndicatorRow {
                sma_20: sma_20[i],
                sma_50: sma_50[i],
                ema_12: ema_12[i],
                ema_26: ema_26[i],
                rsi_14: rsi[i],
                macd: macd.line[i],
                macd_signal: macd.signal[i],
                macd_histogram: macd.histogram[i],
                bb_upper: bands[i].map(|b| b.upper),
                bb_middle: bands[i].map(|b| b.middle),
                bb_lower: bands[i].map(|b| b.lower),
                atr_14: atr[i],
                volume_sma_20: volume_sma[i],
            })
            .collect();

        debug!(
            symbol = %series.symbol(),
            bars = bars.len(),
            defined_rows = rows.iter().filter(|r| !r.is_undefined()).count(),
            "computed indicators"
        );

        Ok(AnalyzedSeries::new(series.clone(), rows))
    }
}
