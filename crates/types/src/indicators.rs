//! Technical indicator types.
//!
//! Indicator values live in a fixed-schema [`IndicatorRow`] aligned 1:1
//! with the bars of a [`PriceSeries`]. Every column is an `Option<f64>`:
//! `None` means the lookback window was not yet full at that row, which is
//! distinct from a computed zero.

use serde::{Deserialize, Serialize};

use crate::market_data::{Bar, PriceSeries};

// =============================================================================
// Standard Periods
// =============================================================================

/// Lookback periods used by the standard indicator set.
pub mod periods {
    /// Short simple moving average.
    pub const SMA_SHORT: usize = 20;
    /// Long simple moving average.
    pub const SMA_LONG: usize = 50;
    /// RSI period (number of price changes).
    pub const RSI: usize = 14;
    /// MACD fast EMA.
    pub const MACD_FAST: usize = 12;
    /// MACD slow EMA.
    pub const MACD_SLOW: usize = 26;
    /// MACD signal EMA.
    pub const MACD_SIGNAL: usize = 9;
    /// Bollinger middle band / deviation window.
    pub const BOLLINGER: usize = 20;
    /// ATR period.
    pub const ATR: usize = 14;
    /// Volume average window.
    pub const VOLUME_AVG: usize = 20;
}

// =============================================================================
// Indicator Kind
// =============================================================================

/// Column identifier for the indicator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndicatorKind {
    Sma20,
    Sma50,
    Ema12,
    Ema26,
    Rsi14,
    Macd,
    MacdSignal,
    MacdHistogram,
    BbUpper,
    BbMiddle,
    BbLower,
    Atr14,
    VolumeSma20,
}

impl IndicatorKind {
    /// Every column, in table order.
    pub const ALL: [IndicatorKind; 13] = [
        IndicatorKind::Sma20,
        IndicatorKind::Sma50,
        IndicatorKind::Ema12,
        IndicatorKind::Ema26,
        IndicatorKind::Rsi14,
        IndicatorKind::Macd,
        IndicatorKind::MacdSignal,
        IndicatorKind::MacdHistogram,
        IndicatorKind::BbUpper,
        IndicatorKind::BbMiddle,
        IndicatorKind::BbLower,
        IndicatorKind::Atr14,
        IndicatorKind::VolumeSma20,
    ];

    /// Display name of the column.
    pub fn name(self) -> &'static str {
        match self {
            IndicatorKind::Sma20 => "SMA_20",
            IndicatorKind::Sma50 => "SMA_50",
            IndicatorKind::Ema12 => "EMA_12",
            IndicatorKind::Ema26 => "EMA_26",
            IndicatorKind::Rsi14 => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::MacdSignal => "MACD_signal",
            IndicatorKind::MacdHistogram => "MACD_histogram",
            IndicatorKind::BbUpper => "BB_upper",
            IndicatorKind::BbMiddle => "BB_middle",
            IndicatorKind::BbLower => "BB_lower",
            IndicatorKind::Atr14 => "ATR",
            IndicatorKind::VolumeSma20 => "Volume_SMA_20",
        }
    }

    /// Number of bars needed before the first defined value.
    ///
    /// The first defined row index is `lookback() - 1`.
    pub fn lookback(self) -> usize {
        use periods::*;
        match self {
            IndicatorKind::Sma20 => SMA_SHORT,
            IndicatorKind::Sma50 => SMA_LONG,
            IndicatorKind::Ema12 => MACD_FAST,
            IndicatorKind::Ema26 | IndicatorKind::Macd => MACD_SLOW,
            IndicatorKind::MacdSignal | IndicatorKind::MacdHistogram => MACD_SLOW + MACD_SIGNAL - 1,
            IndicatorKind::Rsi14 => RSI + 1,
            IndicatorKind::BbUpper | IndicatorKind::BbMiddle | IndicatorKind::BbLower => BOLLINGER,
            IndicatorKind::Atr14 => ATR,
            IndicatorKind::VolumeSma20 => VOLUME_AVG,
        }
    }
}

// =============================================================================
// Indicator Row
// =============================================================================

/// Indicator values for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub atr_14: Option<f64>,
    pub volume_sma_20: Option<f64>,
}

impl IndicatorRow {
    /// Look up a column by kind.
    pub fn get(&self, kind: IndicatorKind) -> Option<f64> {
        match kind {
            IndicatorKind::Sma20 => self.sma_20,
            IndicatorKind::Sma50 => self.sma_50,
            IndicatorKind::Ema12 => self.ema_12,
            IndicatorKind::Ema26 => self.ema_26,
            IndicatorKind::Rsi14 => self.rsi_14,
            IndicatorKind::Macd => self.macd,
            IndicatorKind::MacdSignal => self.macd_signal,
            IndicatorKind::MacdHistogram => self.macd_histogram,
            IndicatorKind::BbUpper => self.bb_upper,
            IndicatorKind::BbMiddle => self.bb_middle,
            IndicatorKind::BbLower => self.bb_lower,
            IndicatorKind::Atr14 => self.atr_14,
            IndicatorKind::VolumeSma20 => self.volume_sma_20,
        }
    }

    /// True when no column has a value yet.
    pub fn is_undefined(&self) -> bool {
        IndicatorKind::ALL.iter().all(|k| self.get(*k).is_none())
    }
}

// =============================================================================
// Bollinger Output
// =============================================================================

/// Bollinger Bands output values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BollingerOutput {
    /// Upper band.
    pub upper: f64,
    /// Middle band (SMA).
    pub middle: f64,
    /// Lower band.
    pub lower: f64,
    /// %B: where price is relative to bands (0 = lower, 1 = upper).
    pub percent_b: f64,
}

// =============================================================================
// Analyzed Series
// =============================================================================

/// A price series augmented with one [`IndicatorRow`] per bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedSeries {
    series: PriceSeries,
    rows: Vec<IndicatorRow>,
}

impl AnalyzedSeries {
    /// Pair a series with its indicator rows.
    ///
    /// # Panics
    /// Panics if `rows` is not aligned 1:1 with the bars.
    pub fn new(series: PriceSeries, rows: Vec<IndicatorRow>) -> Self {
        assert_eq!(
            series.len(),
            rows.len(),
            "indicator rows must align with bars"
        );
        Self { series, rows }
    }

    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn bars(&self) -> &[Bar] {
        self.series.bars()
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bar and indicators at `index`.
    pub fn at(&self, index: usize) -> Option<(&Bar, &IndicatorRow)> {
        Some((self.series.bars().get(index)?, self.rows.get(index)?))
    }

    /// Most recent bar and its indicators.
    pub fn latest(&self) -> Option<(&Bar, &IndicatorRow)> {
        self.at(self.len().checked_sub(1)?)
    }

    /// Bar and indicators one step before the latest.
    pub fn previous(&self) -> Option<(&Bar, &IndicatorRow)> {
        self.at(self.len().checked_sub(2)?)
    }

    /// A whole indicator column, oldest first.
    pub fn column(&self, kind: IndicatorKind) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.get(kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_matches_fields() {
        let row = IndicatorRow {
            sma_20: Some(1.0),
            rsi_14: Some(55.0),
            bb_lower: Some(0.5),
            ..Default::default()
        };
        assert_eq!(row.get(IndicatorKind::Sma20), Some(1.0));
        assert_eq!(row.get(IndicatorKind::Rsi14), Some(55.0));
        assert_eq!(row.get(IndicatorKind::BbLower), Some(0.5));
        assert_eq!(row.get(IndicatorKind::Macd), None);
        assert!(!row.is_undefined());
        assert!(IndicatorRow::default().is_undefined());
    }

    #[test]
    fn test_lookbacks() {
        assert_eq!(IndicatorKind::Sma20.lookback(), 20);
        assert_eq!(IndicatorKind::Rsi14.lookback(), 15);
        assert_eq!(IndicatorKind::Macd.lookback(), 26);
        assert_eq!(IndicatorKind::MacdSignal.lookback(), 34);
        assert_eq!(IndicatorKind::Atr14.lookback(), 14);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = IndicatorKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), IndicatorKind::ALL.len());
    }
}
