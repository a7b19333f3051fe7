//! Market data sources.
//!
//! The analyzer only depends on the [`MarketDataSource`] trait. Two
//! implementations ship with the crate:
//!
//! - [`InMemorySource`] - snapshots supplied by the caller (tests, callers
//!   with their own feed)
//! - [`SyntheticSource`] - seeded geometric random walk, for demos and
//!   offline runs

use std::collections::HashMap;

use parking_lot::RwLock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use types::{Bar, CompanyAttributes, Period, PriceSeries, SeriesError, Timestamp};

/// Failures reported by a data source.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("data feed error for {symbol}: {reason}")]
    Feed { symbol: String, reason: String },

    #[error("feed returned invalid bars: {0}")]
    Series(#[from] SeriesError),
}

/// One fetch result: history, descriptive attributes and a data version.
///
/// `version` changes whenever the underlying data changes; it is part of
/// the result cache key.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub series: PriceSeries,
    pub attributes: CompanyAttributes,
    pub version: u64,
}

/// Supplies OHLCV history and company attributes for a symbol.
pub trait MarketDataSource: Send + Sync {
    fn fetch(&self, symbol: &str, period: Period) -> Result<MarketSnapshot, DataSourceError>;
}

impl<S: MarketDataSource + ?Sized> MarketDataSource for Box<S> {
    fn fetch(&self, symbol: &str, period: Period) -> Result<MarketSnapshot, DataSourceError> {
        (**self).fetch(symbol, period)
    }
}

// =============================================================================
// In-Memory Source
// =============================================================================

/// Caller-supplied snapshots keyed by upper-cased symbol.
///
/// A fetch returns the most recent `period.trading_days()` bars.
#[derive(Debug, Default)]
pub struct InMemorySource {
    snapshots: RwLock<HashMap<String, MarketSnapshot>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the data for `symbol` and return its new version.
    pub fn insert(&self, series: PriceSeries, attributes: CompanyAttributes) -> u64 {
        let key = series.symbol().to_ascii_uppercase();
        let mut snapshots = self.snapshots.write();
        let version = snapshots.get(&key).map_or(1, |s| s.version + 1);
        snapshots.insert(
            key,
            MarketSnapshot {
                series,
                attributes,
                version,
            },
        );
        version
    }

    pub fn remove(&self, symbol: &str) -> bool {
        self.snapshots
            .write()
            .remove(&symbol.to_ascii_uppercase())
            .is_some()
    }
}

impl MarketDataSource for InMemorySource {
    fn fetch(&self, symbol: &str, period: Period) -> Result<MarketSnapshot, DataSourceError> {
        let snapshots = self.snapshots.read();
        let snapshot = snapshots
            .get(&symbol.to_ascii_uppercase())
            .ok_or_else(|| DataSourceError::UnknownSymbol(symbol.to_string()))?;

        let bars = snapshot.series.bars();
        let start = bars.len().saturating_sub(period.trading_days());
        Ok(MarketSnapshot {
            series: PriceSeries::new(snapshot.series.symbol(), bars[start..].to_vec())?,
            attributes: snapshot.attributes.clone(),
            version: snapshot.version,
        })
    }
}

// =============================================================================
// Synthetic Source
// =============================================================================

const MILLIS_PER_DAY: Timestamp = 86_400_000;

/// Seeded geometric random walk.
///
/// The same `(seed, symbol, period)` always produces the same bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSource {
    pub seed: u64,
    /// First open of the walk.
    pub initial_price: f64,
    /// Mean daily log return.
    pub drift: f64,
    /// Std of daily log returns.
    pub volatility: f64,
    /// Average shares traded per bar.
    pub base_volume: f64,
    /// Timestamp (ms) of the first bar.
    pub start_timestamp: Timestamp,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_price: 100.0,
            drift: 0.0004,
            volatility: 0.015,
            base_volume: 1_000_000.0,
            start_timestamp: 1_704_067_200_000, // 2024-01-01
        }
    }
}

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    fn bars(&self, symbol: &str, count: usize) -> Result<Vec<Bar>, DataSourceError> {
        let feed_err = |reason: String| DataSourceError::Feed {
            symbol: symbol.to_string(),
            reason,
        };
        let returns: Normal<f64> =
            Normal::new(self.drift, self.volatility).map_err(|e| feed_err(e.to_string()))?;
        let noise: Normal<f64> = Normal::new(0.0, 1.0).map_err(|e| feed_err(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(self.seed ^ symbol_hash(symbol));

        let mut close = self.initial_price;
        let bars = (0..count)
            .map(|i| {
                let open = close;
                close = open * returns.sample(&mut rng).exp();
                let wick = self.volatility * 0.5;
                let high = open.max(close) * (1.0 + wick * noise.sample(&mut rng).abs());
                let low = open.min(close) * (1.0 - wick * noise.sample(&mut rng).abs()).max(0.5);
                let volume = (self.base_volume * (1.0 + 0.25 * noise.sample(&mut rng)))
                    .max(0.0)
                    .round();
                Bar::new(
                    self.start_timestamp + i as Timestamp * MILLIS_PER_DAY,
                    open,
                    high,
                    low,
                    close,
                    volume,
                )
            })
            .collect();
        Ok(bars)
    }

    fn attributes(symbol: &str, bars: &[Bar]) -> CompanyAttributes {
        let year = &bars[bars.len().saturating_sub(Period::OneYear.trading_days())..];
        let high = year.iter().map(|b| b.high).reduce(f64::max);
        let low = year.iter().map(|b| b.low).reduce(f64::min);
        CompanyAttributes {
            long_name: Some(format!("{} Synthetic Holdings", symbol)),
            sector: Some("Synthetic".to_string()),
            market_cap: bars.last().map(|b| b.close * 1_000_000_000.0),
            fifty_two_week_high: high,
            fifty_two_week_low: low,
            ..Default::default()
        }
    }
}

impl MarketDataSource for SyntheticSource {
    fn fetch(&self, symbol: &str, period: Period) -> Result<MarketSnapshot, DataSourceError> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(DataSourceError::UnknownSymbol(symbol));
        }
        let bars = self.bars(&symbol, period.trading_days())?;
        let attributes = Self::attributes(&symbol, &bars);
        Ok(MarketSnapshot {
            series: PriceSeries::new(symbol, bars)?,
            attributes,
            version: self.seed,
        })
    }
}

/// FNV-1a, so a symbol maps to the same stream on every platform.
fn symbol_hash(symbol: &str) -> u64 {
    symbol.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
