//! Market data types for a single instrument.
//!
//! This module contains the OHLCV bar, the validated [`PriceSeries`] handed
//! to the indicator engine, and the enumerated history [`Period`]s a data
//! source can be asked for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::{Symbol, Timestamp};

// =============================================================================
// OHLCV Bar
// =============================================================================

/// OHLCV bar for a single time period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar timestamp (period start).
    pub timestamp: Timestamp,
    /// Opening price.
    pub open: f64,
    /// Highest price during the period.
    pub high: f64,
    /// Lowest price during the period.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume during the period.
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(
        timestamp: Timestamp,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get the bar range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True range against the previous close.
    ///
    /// Without a previous close this is the plain high-low range.
    #[inline]
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let hl = self.range();
        match prev_close {
            Some(pc) => hl.max((self.high - pc).abs()).max((self.low - pc).abs()),
            None => hl,
        }
    }

    fn validate(&self, index: usize) -> Result<(), SeriesError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SeriesError::NonFinite { index, field });
            }
        }
        if self.volume < 0.0 {
            return Err(SeriesError::NegativeVolume {
                index,
                volume: self.volume,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Series Errors
// =============================================================================

/// Reasons a set of bars cannot form a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("bar {index}: {field} is not finite")]
    NonFinite { index: usize, field: &'static str },

    #[error("bar {index}: negative volume {volume}")]
    NegativeVolume { index: usize, volume: f64 },

    #[error("bar {index}: timestamp {timestamp} does not follow {previous}")]
    NotIncreasing {
        index: usize,
        previous: Timestamp,
        timestamp: Timestamp,
    },
}

// =============================================================================
// Price Series
// =============================================================================

/// Time-ordered OHLCV history for one symbol.
///
/// Construction validates that every field is finite, volume is
/// non-negative and timestamps are strictly increasing. The series is
/// immutable afterwards; the indicator engine produces an augmented copy.
/// An empty series is representable; rejecting it is the engine's call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a validated series.
    pub fn new(symbol: impl Into<Symbol>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate(index)?;
        }
        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(SeriesError::NotIncreasing {
                    index: index + 1,
                    previous: pair[0].timestamp,
                    timestamp: pair[1].timestamp,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Ticker this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Bars ordered from oldest to newest.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes, oldest first.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

// =============================================================================
// History Period
// =============================================================================

/// Amount of history requested from a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    /// Every supported period, shortest first.
    pub const ALL: [Period; 6] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
    ];

    /// Feed identifier ("1mo", "1y", ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
        }
    }

    /// Approximate number of daily trading sessions in the period.
    pub fn trading_days(self) -> usize {
        match self {
            Period::OneMonth => 21,
            Period::ThreeMonths => 63,
            Period::SixMonths => 126,
            Period::OneYear => 252,
            Period::TwoYears => 504,
            Period::FiveYears => 1260,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unsupported period '{}' (expected one of 1mo, 3mo, 6mo, 1y, 2y, 5y)", s)
            })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: Timestamp, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 1000.0)
    }

    #[test]
    fn test_series_accepts_increasing_timestamps() {
        let bars = vec![bar(1, 10.0), bar(2, 11.0), bar(5, 12.0)];
        let series = PriceSeries::new("TEST", bars).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "TEST");
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_series_rejects_duplicate_timestamp() {
        let err = PriceSeries::new("TEST", vec![bar(1, 10.0), bar(1, 11.0)]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NotIncreasing {
                index: 1,
                previous: 1,
                timestamp: 1
            }
        );
    }

    #[test]
    fn test_series_rejects_non_finite_and_negative_volume() {
        let mut nan = bar(1, 10.0);
        nan.high = f64::NAN;
        assert!(matches!(
            PriceSeries::new("TEST", vec![nan]),
            Err(SeriesError::NonFinite { index: 0, field: "high" })
        ));

        let mut neg = bar(1, 10.0);
        neg.volume = -1.0;
        assert!(matches!(
            PriceSeries::new("TEST", vec![neg]),
            Err(SeriesError::NegativeVolume { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_series_is_representable() {
        let series = PriceSeries::new("TEST", vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn test_true_range() {
        let b = Bar::new(2, 10.0, 12.0, 9.0, 11.0, 0.0);
        assert_eq!(b.true_range(None), 3.0);
        // Gap up: |high - prev_close| dominates
        assert_eq!(b.true_range(Some(5.0)), 7.0);
        // Gap down: |low - prev_close| dominates
        assert_eq!(b.true_range(Some(15.0)), 6.0);
    }

    #[test]
    fn test_period_parse_and_display() {
        for p in Period::ALL {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
        }
        assert_eq!("1Y".parse::<Period>().unwrap(), Period::OneYear);
        assert!("10y".parse::<Period>().is_err());
        assert_eq!(Period::SixMonths.to_string(), "6mo");
        assert_eq!(serde_json::to_string(&Period::TwoYears).unwrap(), "\"2y\"");
    }
}
