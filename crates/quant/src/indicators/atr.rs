//! Average True Range (ATR) indicator.

use super::sma::Sma;
use super::{Column, Indicator};
use types::Bar;

/// Average True Range indicator.
///
/// Measures market volatility by decomposing the entire range of price movement.
/// True Range is max of: High-Low, |High-PrevClose|, |Low-PrevClose|. The
/// first bar has no previous close, so its true range is High-Low.
///
/// The average is a simple trailing mean of the last `period` true ranges.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator with the given period.
    ///
    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "ATR period must be > 0");
        Self { period }
    }

    /// True range of every bar.
    pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let prev_close = i.checked_sub(1).map(|p| bars[p].close);
                bar.true_range(prev_close)
            })
            .collect()
    }
}

impl Indicator for Atr {
    fn calculate(&self, bars: &[Bar]) -> Column {
        Sma::calculate_from_prices(&Self::true_ranges(bars), self.period)
    }

    fn required_periods(&self) -> usize {
        self.period
    }
}
