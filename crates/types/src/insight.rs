//! Qualitative market insights.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Directional reading of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Polarity::Bullish => "bullish",
            Polarity::Bearish => "bearish",
            Polarity::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// Which rule produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Latest vs. previous close. Always the first insight.
    PriceDirection,
    /// RSI overbought / oversold reading.
    Momentum,
    /// Close vs. moving averages.
    Trend,
    /// SMA 20/50 golden or death cross.
    Crossover,
    /// MACD vs. its signal line.
    Macd,
    /// Close outside the Bollinger Bands.
    Bands,
    /// ATR relative to price.
    Volatility,
    /// Volume vs. its 20-bar average.
    Volume,
    /// Valuation and 52-week range from company attributes.
    Valuation,
}

/// A short statement tagged with a polarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub polarity: Polarity,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, polarity: Polarity, message: impl Into<String>) -> Self {
        Self {
            kind,
            polarity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.polarity, self.message)
    }
}
