//! Technical indicators for market analysis.
//!
//! Every indicator produces a full column: one `Option<f64>` per input bar,
//! `None` until its lookback window is full. Values at row `i` depend only
//! on bars `0..=i`.
//!
//! # Supported Indicators
//! - **SMA** - Simple Moving Average
//! - **EMA** - Exponential Moving Average (SMA-seeded)
//! - **RSI** - Relative Strength Index (simple or Wilder smoothing)
//! - **MACD** - Moving Average Convergence Divergence
//! - **Bollinger Bands** - Volatility bands around SMA
//! - **ATR** - Average True Range
//!
//! # Example
//! ```
//! use quant::indicators::{Indicator, Sma};
//! use types::Bar;
//!
//! let bars: Vec<Bar> = (0..5)
//!     .map(|i| Bar::new(i, 10.0, 11.0, 9.0, 10.0 + i as f64, 100.0))
//!     .collect();
//! let column = Sma::new(3).calculate(&bars);
//! assert_eq!(column, vec![None, None, Some(11.0), Some(12.0), Some(13.0)]);
//! ```

use types::Bar;

// =============================================================================
// Indicator Modules
// =============================================================================

mod atr;
mod bollinger;
mod ema;
mod macd;
mod rsi;
mod sma;

// =============================================================================
// Re-exports
// =============================================================================

pub use atr::Atr;
pub use bollinger::BollingerBands;
pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use rsi::{Rsi, RsiSmoothing};
pub use sma::Sma;

/// One value per bar, `None` while the lookback window is filling.
pub type Column = Vec<Option<f64>>;

// =============================================================================
// Indicator Trait
// =============================================================================

/// Trait for single-column technical indicators.
///
/// Multi-output indicators (MACD, Bollinger) return their primary line here
/// and expose the rest through their own `calculate_full` methods.
pub trait Indicator: Send + Sync {
    /// Calculate the indicator column from bars ordered oldest to newest.
    fn calculate(&self, bars: &[Bar]) -> Column;

    /// Minimum number of bars before the first defined value.
    fn required_periods(&self) -> usize;
}

/// Closing prices of `bars`, oldest first.
pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

// =============================================================================
// Tests
// =============================================================================
