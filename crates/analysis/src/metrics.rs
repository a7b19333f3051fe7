//! Headline numbers shown next to the chart.

use serde::Serialize;

use types::features::price_change_pct;
use types::{AnalyzedSeries, CompanyAttributes};

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const MEGA_CAP: f64 = 1e12;
const LARGE_CAP: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi > RSI_OVERBOUGHT {
            RsiZone::Overbought
        } else if rsi < RSI_OVERSOLD {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCapTier {
    /// Above one trillion.
    Mega,
    /// Above one billion.
    Large,
    Other,
}

impl MarketCapTier {
    pub fn from_market_cap(cap: f64) -> Self {
        if cap > MEGA_CAP {
            MarketCapTier::Mega
        } else if cap > LARGE_CAP {
            MarketCapTier::Large
        } else {
            MarketCapTier::Other
        }
    }
}

/// Latest-bar summary of an analyzed series.
///
/// Every field that needs history the series doesn't have is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub latest_price: f64,
    /// Absolute change from the previous close.
    pub price_change: Option<f64>,
    pub price_change_pct: Option<f64>,
    pub volume: f64,
    /// Latest volume against its 20-bar average, in percent.
    pub volume_change_pct: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_zone: Option<RsiZone>,
    /// Distance of close from SMA_20, in percent.
    pub sma_20_distance_pct: Option<f64>,
    pub above_sma_20: Option<bool>,
    pub market_cap: Option<f64>,
    pub market_cap_tier: Option<MarketCapTier>,
}

impl KeyMetrics {
    /// Metrics for the latest bar, or `None` for an empty series.
    pub fn from_series(analyzed: &AnalyzedSeries, attributes: &CompanyAttributes) -> Option<Self> {
        let (bar, row) = analyzed.latest()?;
        let prev_close = analyzed.previous().map(|(prev, _)| prev.close);

        let volume_change_pct = row.volume_sma_20.map(|avg| {
            if avg > 0.0 {
                (bar.volume - avg) / avg * 100.0
            } else {
                0.0
            }
        });
        let sma_20_distance_pct = row.sma_20.and_then(|sma| price_change_pct(bar.close, sma));
        let market_cap = attributes.market_cap();

        Some(Self {
            latest_price: bar.close,
            price_change: prev_close.map(|pc| bar.close - pc),
            price_change_pct: prev_close.and_then(|pc| price_change_pct(bar.close, pc)),
            volume: bar.volume,
            volume_change_pct,
            rsi: row.rsi_14,
            rsi_zone: row.rsi_14.map(RsiZone::from_rsi),
            sma_20_distance_pct,
            above_sma_20: row.sma_20.map(|sma| bar.close > sma),
            market_cap,
            market_cap_tier: market_cap.map(MarketCapTier::from_market_cap),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Bar, IndicatorRow, PriceSeries};

    fn analyzed(closes: &[f64], last_row: IndicatorRow) -> AnalyzedSeries {
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c + 1.0, c - 1.0, c, 1_500.0))
            .collect();
        let mut rows = vec![IndicatorRow::default(); bars.len()];
        if let Some(last) = rows.last_mut() {
            *last = last_row;
        }
        AnalyzedSeries::new(PriceSeries::new("KM", bars).unwrap(), rows)
    }

    #[test]
    fn test_single_bar_has_no_changes() {
        let series = analyzed(&[50.0], IndicatorRow::default());
        let metrics = KeyMetrics::from_series(&series, &CompanyAttributes::default()).unwrap();
        assert_eq!(metrics.latest_price, 50.0);
        assert_eq!(metrics.price_change, None);
        assert_eq!(metrics.price_change_pct, None);
        assert_eq!(metrics.rsi_zone, None);
        assert_eq!(metrics.market_cap_tier, None);
    }

    #[test]
    fn test_changes_and_zones() {
        let row = IndicatorRow {
            rsi_14: Some(75.0),
            sma_20: Some(100.0),
            volume_sma_20: Some(1_000.0),
            ..Default::default()
        };
        let attrs = CompanyAttributes {
            market_cap: Some(2.5e12),
            ..Default::default()
        };
        let metrics = KeyMetrics::from_series(&analyzed(&[100.0, 105.0], row), &attrs).unwrap();
        assert!((metrics.price_change.unwrap() - 5.0).abs() < 1e-12);
        assert!((metrics.price_change_pct.unwrap() - 5.0).abs() < 1e-12);
        assert!((metrics.volume_change_pct.unwrap() - 50.0).abs() < 1e-12);
        assert!((metrics.sma_20_distance_pct.unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(metrics.above_sma_20, Some(true));
        assert_eq!(metrics.rsi_zone, Some(RsiZone::Overbought));
        assert_eq!(metrics.market_cap_tier, Some(MarketCapTier::Mega));
    }

    #[test]
    fn test_zero_volume_average() {
        let row = IndicatorRow {
            volume_sma_20: Some(0.0),
            ..Default::default()
        };
        let series = analyzed(&[10.0, 10.0], row);
        let metrics = KeyMetrics::from_series(&series, &CompanyAttributes::default()).unwrap();
        assert_eq!(metrics.volume_change_pct, Some(0.0));
    }

    #[test]
    fn test_empty_series() {
        let empty = AnalyzedSeries::new(PriceSeries::new("KM", vec![]).unwrap(), vec![]);
        assert!(KeyMetrics::from_series(&empty, &CompanyAttributes::default()).is_none());
    }

    #[test]
    fn test_tiers() {
        assert_eq!(RsiZone::from_rsi(25.0), RsiZone::Oversold);
        assert_eq!(RsiZone::from_rsi(70.0), RsiZone::Neutral);
        assert_eq!(MarketCapTier::from_market_cap(5e9), MarketCapTier::Large);
        assert_eq!(MarketCapTier::from_market_cap(5e8), MarketCapTier::Other);
    }
}
