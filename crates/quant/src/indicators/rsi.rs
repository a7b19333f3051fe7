//! Relative Strength Index (RSI) indicator.

use serde::{Deserialize, Serialize};

use super::{Column, Indicator, closes};
use types::Bar;

/// How average gains and losses are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSmoothing {
    /// Trailing mean of the last `period` changes at every row.
    #[default]
    Simple,
    /// Wilder's recursive smoothing, seeded with the first simple mean.
    Wilder,
}

/// Relative Strength Index indicator.
///
/// Measures the speed and change of price movements on a 0-100 scale.
/// RSI > 70 is typically considered overbought, < 30 oversold.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    smoothing: RsiSmoothing,
}

impl Rsi {
    /// Create a new RSI indicator with the given period.
    ///
    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        Self::with_smoothing(period, RsiSmoothing::default())
    }

    /// Create an RSI with an explicit smoothing method.
    pub fn with_smoothing(period: usize, smoothing: RsiSmoothing) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self { period, smoothing }
    }

    /// Calculate the RSI column from a slice of prices.
    ///
    /// The first defined row is `period`: it needs `period` price changes.
    pub fn calculate_from_prices(prices: &[f64], period: usize, smoothing: RsiSmoothing) -> Column {
        // Need at least period + 1 prices for period changes
        if period == 0 || prices.len() < period + 1 {
            return vec![None; prices.len()];
        }

        let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
        let mut column = vec![None; period];

        match smoothing {
            RsiSmoothing::Simple => {
                column.extend(changes.windows(period).map(|w| {
                    let (gain, loss) = split_gains(w);
                    Some(rsi_value(gain / period as f64, loss / period as f64))
                }));
            }
            RsiSmoothing::Wilder => {
                let (gain, loss) = split_gains(&changes[..period]);
                let mut avg_gain = gain / period as f64;
                let mut avg_loss = loss / period as f64;
                column.push(Some(rsi_value(avg_gain, avg_loss)));

                // Wilder's smoothing for remaining periods
                for &change in &changes[period..] {
                    let (gain, loss) = if change > 0.0 { (change, 0.0) } else { (0.0, -change) };
                    avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
                    avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
                    column.push(Some(rsi_value(avg_gain, avg_loss)));
                }
            }
        }
        column
    }
}

/// Sum of gains and sum of losses (as a positive number).
fn split_gains(changes: &[f64]) -> (f64, f64) {
    changes.iter().fold((0.0, 0.0), |(g, l), &change| {
        if change > 0.0 { (g + change, l) } else { (g, l - change) }
    })
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0; // No losses = max RSI
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

impl Indicator for Rsi {
    fn calculate(&self, bars: &[Bar]) -> Column {
        Self::calculate_from_prices(&closes(bars), self.period, self.smoothing)
    }

    fn required_periods(&self) -> usize {
        self.period + 1
    }
}
