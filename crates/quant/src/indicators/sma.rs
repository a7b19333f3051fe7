//! Simple Moving Average (SMA) indicator.

use super::{Column, Indicator, closes};
use types::Bar;

/// Simple Moving Average indicator.
///
/// Computes the arithmetic mean of the closing prices over a specified period.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA indicator with the given period.
    ///
    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self { period }
    }

    /// Calculate the SMA column from a slice of values.
    ///
    /// Each window is summed directly rather than through a running total,
    /// so a defined value is exactly the mean of its `period` inputs.
    pub fn calculate_from_prices(prices: &[f64], period: usize) -> Column {
        if period == 0 {
            return vec![None; prices.len()];
        }
        let mut column = vec![None; prices.len().min(period - 1)];
        column.extend(
            prices
                .windows(period)
                .map(|w| Some(w.iter().sum::<f64>() / period as f64)),
        );
        column
    }
}

impl Indicator for Sma {
    fn calculate(&self, bars: &[Bar]) -> Column {
        Self::calculate_from_prices(&closes(bars), self.period)
    }

    fn required_periods(&self) -> usize {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_matches_hand_computed_fixture() {
        // 25 synthetic closes
        let prices = [
            10.0, 10.5, 11.0, 10.8, 11.2, 11.5, 11.3, 11.9, 12.4, 12.1, 12.6, 13.0, 12.7, 13.3,
            13.8, 13.5, 14.1, 14.4, 14.0, 14.6, 15.0, 14.7, 15.2, 15.6, 15.9,
        ];
        let column = Sma::calculate_from_prices(&prices, 20);
        assert_eq!(column.len(), 25);
        assert!(column[..19].iter().all(Option::is_none));

        // Row 19: mean of prices[0..=19]
        let expected_19 = 248.7 / 20.0;
        assert!((column[19].unwrap() - expected_19).abs() < 1e-9);

        // Row 24: mean of prices[5..=24]
        let expected_24 = 271.6 / 20.0;
        assert!((column[24].unwrap() - expected_24).abs() < 1e-9);
    }

    #[test]
    fn test_sma_short_input() {
        assert_eq!(Sma::calculate_from_prices(&[1.0, 2.0], 5), vec![None, None]);
        assert!(Sma::calculate_from_prices(&[], 5).is_empty());
    }
}
