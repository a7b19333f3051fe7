//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::Ema;
use super::{Column, Indicator, closes};
use types::Bar;

/// All three MACD columns, aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    /// Fast EMA minus slow EMA.
    pub line: Column,
    /// EMA of the MACD line.
    pub signal: Column,
    /// Line minus signal.
    pub histogram: Column,
}

/// MACD indicator.
///
/// Shows the relationship between two EMAs and includes a signal line.
/// Standard configuration is (12, 26, 9).
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD indicator with custom periods.
    ///
    /// # Panics
    /// Panics if any period is 0 or if fast_period >= slow_period.
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(fast_period > 0, "MACD fast period must be > 0");
        assert!(slow_period > 0, "MACD slow period must be > 0");
        assert!(signal_period > 0, "MACD signal period must be > 0");
        assert!(
            fast_period < slow_period,
            "MACD fast period must be < slow period"
        );
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Create MACD with standard (12, 26, 9) configuration.
    pub fn standard() -> Self {
        Self::new(12, 26, 9)
    }

    /// Bars needed before the signal and histogram are defined.
    pub fn signal_required_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    /// Calculate line, signal and histogram columns.
    pub fn calculate_full(&self, bars: &[Bar]) -> MacdSeries {
        self.calculate_full_from_prices(&closes(bars))
    }

    /// Calculate line, signal and histogram columns from price data.
    pub fn calculate_full_from_prices(&self, prices: &[f64]) -> MacdSeries {
        let fast = Ema::calculate_from_prices(prices, self.fast_period);
        let slow = Ema::calculate_from_prices(prices, self.slow_period);

        let line: Column = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = Ema::calculate_from_optional(&line, self.signal_period);
        let histogram = line
            .iter()
            .zip(&signal)
            .map(|(l, s)| Some((*l)? - (*s)?))
            .collect();

        MacdSeries {
            line,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn calculate(&self, bars: &[Bar]) -> Column {
        // Returns just the MACD line for trait compatibility
        self.calculate_full(bars).line
    }

    fn required_periods(&self) -> usize {
        self.slow_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_standard() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();
        let macd = Macd::standard();
        let output = macd.calculate_full_from_prices(&prices);

        assert!(output.line[24].is_none());
        assert!(output.line[25].is_some());
        assert!(output.signal[32].is_none());
        assert!(output.signal[33].is_some());
        assert_eq!(macd.signal_required_periods(), 34);

        // Histogram should be MACD - Signal
        for i in 33..40 {
            let (l, s, h) = (
                output.line[i].unwrap(),
                output.signal[i].unwrap(),
                output.histogram[i].unwrap(),
            );
            assert!((h - (l - s)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_macd_of_constant_prices_is_zero() {
        let prices = vec![50.0; 40];
        let output = Macd::standard().calculate_full_from_prices(&prices);
        assert_eq!(output.line[39], Some(0.0));
        assert_eq!(output.signal[39], Some(0.0));
        assert_eq!(output.histogram[39], Some(0.0));
    }

    #[test]
    #[should_panic(expected = "fast period must be < slow period")]
    fn test_macd_rejects_inverted_periods() {
        Macd::new(26, 12, 9);
    }
}
