//! Thresholds for the insight rules.

use serde::{Deserialize, Serialize};

/// Thresholds used by [`crate::InsightGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Momentum
    // ─────────────────────────────────────────────────────────────────────────
    /// RSI above this is overbought.
    pub rsi_overbought: f64,
    /// RSI below this is oversold.
    pub rsi_oversold: f64,

    // ─────────────────────────────────────────────────────────────────────────
    // Price Action
    // ─────────────────────────────────────────────────────────────────────────
    /// Absolute one-bar change (percent) worded as a strong move.
    pub strong_move_pct: f64,

    // ─────────────────────────────────────────────────────────────────────────
    // Volatility / Volume
    // ─────────────────────────────────────────────────────────────────────────
    /// ATR as a percentage of close above which volatility is high.
    pub high_volatility_pct: f64,
    /// ATR as a percentage of close below which volatility is low.
    pub low_volatility_pct: f64,
    /// Volume over its 20-bar average at or above which volume is heavy.
    pub volume_spike_ratio: f64,
    /// Volume over its 20-bar average at or below which volume is light.
    pub volume_light_ratio: f64,

    // ─────────────────────────────────────────────────────────────────────────
    // Valuation
    // ─────────────────────────────────────────────────────────────────────────
    /// Trailing P/E above this reads as rich.
    pub pe_rich: f64,
    /// Positive trailing P/E below this reads as modest.
    pub pe_modest: f64,
    /// Distance (percent) from a 52-week extreme that counts as "near".
    pub range_proximity_pct: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            strong_move_pct: 2.0,
            high_volatility_pct: 3.0,
            low_volatility_pct: 1.0,
            volume_spike_ratio: 1.5,
            volume_light_ratio: 0.5,
            pe_rich: 30.0,
            pe_modest: 15.0,
            range_proximity_pct: 5.0,
        }
    }
}

impl InsightConfig {
    pub fn rsi_bounds(mut self, oversold: f64, overbought: f64) -> Self {
        self.rsi_oversold = oversold;
        self.rsi_overbought = overbought;
        self
    }

    pub fn strong_move_pct(mut self, pct: f64) -> Self {
        self.strong_move_pct = pct;
        self
    }

    pub fn volatility_bounds(mut self, low_pct: f64, high_pct: f64) -> Self {
        self.low_volatility_pct = low_pct;
        self.high_volatility_pct = high_pct;
        self
    }

    pub fn volume_bounds(mut self, light_ratio: f64, spike_ratio: f64) -> Self {
        self.volume_light_ratio = light_ratio;
        self.volume_spike_ratio = spike_ratio;
        self
    }
}
