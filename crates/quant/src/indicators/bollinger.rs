//! Bollinger Bands indicator.

use super::{Column, Indicator, closes};
use crate::stats;
use types::features::bollinger_percent_b;
use types::{Bar, BollingerOutput};

/// Bollinger Bands indicator.
///
/// Volatility bands placed above and below a moving average.
/// Default is 20-period SMA with 2 sample standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with custom parameters.
    ///
    /// # Arguments
    /// * `period` - SMA period for middle band
    /// * `std_dev_multiplier` - Number of standard deviations for bands (typically 2.0)
    ///
    /// # Panics
    /// Panics if period is less than 2, or the multiplier is negative or
    /// not finite.
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Bollinger period must be > 1");
        assert!(
            std_dev_multiplier.is_finite() && std_dev_multiplier >= 0.0,
            "Bollinger multiplier must be finite and >= 0"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Create Bollinger Bands with standard (20, 2.0) configuration.
    pub fn standard() -> Self {
        Self::new(20, 2.0)
    }

    /// Calculate the bands at every bar.
    pub fn calculate_full(&self, bars: &[Bar]) -> Vec<Option<BollingerOutput>> {
        self.calculate_full_from_prices(&closes(bars))
    }

    /// Calculate the bands at every price. `percent_b` is relative to the
    /// price at the same row.
    pub fn calculate_full_from_prices(&self, prices: &[f64]) -> Vec<Option<BollingerOutput>> {
        let mut out = vec![None; prices.len().min(self.period - 1)];
        out.extend(prices.windows(self.period).map(|window| {
            let middle = stats::mean(window)?;
            let std_dev = stats::sample_std_dev(window)?;
            let upper = middle + std_dev * self.std_dev_multiplier;
            let lower = middle - std_dev * self.std_dev_multiplier;
            let price = *window.last()?;
            Some(BollingerOutput {
                upper,
                middle,
                lower,
                percent_b: bollinger_percent_b(price, upper, lower),
            })
        }));
        out
    }
}

impl Indicator for BollingerBands {
    fn calculate(&self, bars: &[Bar]) -> Column {
        // Returns middle band (SMA) for trait compatibility
        self.calculate_full(bars)
            .into_iter()
            .map(|b| b.map(|b| b.middle))
            .collect()
    }

    fn required_periods(&self) -> usize {
        self.period
    }
}
