//! Exponential Moving Average (EMA) indicator.

use super::{Column, Indicator, closes};
use types::Bar;

/// Exponential Moving Average indicator.
///
/// Gives more weight to recent prices using exponential smoothing.
/// Multiplier = 2 / (period + 1). The first value is the SMA of the first
/// `period` prices.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
}

impl Ema {
    /// Create a new EMA indicator with the given period.
    ///
    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self { period }
    }

    /// Smoothing multiplier for `period`.
    #[inline]
    pub fn multiplier(period: usize) -> f64 {
        2.0 / (period as f64 + 1.0)
    }

    /// Calculate the EMA column from a slice of prices.
    /// Uses SMA of first `period` values as the initial EMA value.
    pub fn calculate_from_prices(prices: &[f64], period: usize) -> Column {
        if period == 0 || prices.len() < period {
            return vec![None; prices.len()];
        }

        let multiplier = Self::multiplier(period);
        let initial_sma = prices[..period].iter().sum::<f64>() / period as f64;

        let mut column = vec![None; period - 1];
        column.push(Some(initial_sma));
        let mut prev = initial_sma;
        for price in &prices[period..] {
            prev = (price - prev) * multiplier + prev;
            column.push(Some(prev));
        }
        column
    }

    /// EMA over a column whose defined values form a contiguous suffix.
    ///
    /// Used for the MACD signal line: the seed is the SMA of the first
    /// `period` defined values.
    pub fn calculate_from_optional(values: &[Option<f64>], period: usize) -> Column {
        let start = values.iter().position(Option::is_some).unwrap_or(values.len());
        let defined: Vec<f64> = values[start..].iter().map_while(|v| *v).collect();

        let mut column = vec![None; start];
        column.extend(Self::calculate_from_prices(&defined, period));
        column.resize(values.len(), None);
        column
    }
}

impl Indicator for Ema {
    fn calculate(&self, bars: &[Bar]) -> Column {
        Self::calculate_from_prices(&closes(bars), self.period)
    }

    fn required_periods(&self) -> usize {
        self.period
    }
}
