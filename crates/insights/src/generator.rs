//! Insight rules.
//!
//! Each rule reads the latest bar (and sometimes the one before it) and
//! returns at most one insight. Rules run in a fixed order after the
//! headline.

use tracing::debug;

use types::features::price_change_pct;
use types::{AnalyzedSeries, Bar, CompanyAttributes, IndicatorRow, Insight, InsightKind, Polarity};

use crate::config::InsightConfig;

/// Latest and previous bar with their indicator rows.
struct Snapshot<'a> {
    name: &'a str,
    bar: &'a Bar,
    row: &'a IndicatorRow,
    prev: Option<(&'a Bar, &'a IndicatorRow)>,
}

/// Stateless rule engine turning indicators into [`Insight`]s.
#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    config: InsightConfig,
}

impl InsightGenerator {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Ordered insights for the latest bar; the headline comes first.
    ///
    /// An empty series yields no insights.
    pub fn generate(
        &self,
        analyzed: &AnalyzedSeries,
        attributes: &CompanyAttributes,
    ) -> Vec<Insight> {
        let Some((bar, row)) = analyzed.latest() else {
            return Vec::new();
        };
        let snap = Snapshot {
            name: attributes.display_name(analyzed.symbol()),
            bar,
            row,
            prev: analyzed.previous(),
        };

        let mut insights = vec![self.headline(&snap)];
        insights.extend(
            [
                self.momentum(&snap),
                self.trend(&snap),
                self.crossover(&snap),
                self.macd(&snap),
                self.bands(&snap),
                self.volatility(&snap),
                self.volume(&snap),
                self.valuation(&snap, attributes),
                self.range_position(&snap, attributes),
            ]
            .into_iter()
            .flatten(),
        );

        debug!(symbol = %analyzed.symbol(), count = insights.len(), "generated insights");
        insights
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Headline
    // ─────────────────────────────────────────────────────────────────────────

    fn headline(&self, s: &Snapshot<'_>) -> Insight {
        let close = s.bar.close;
        let Some((prev_bar, _)) = s.prev else {
            return Insight::new(
                InsightKind::PriceDirection,
                Polarity::Neutral,
                format!("{} last closed at ${:.2}; no prior bar to compare", s.name, close),
            );
        };

        let change = close - prev_bar.close;
        let pct = price_change_pct(close, prev_bar.close);
        let pct_text = pct.map(|p| format!(" ({:+.2}%)", p)).unwrap_or_default();
        let strong = pct.is_some_and(|p| p.abs() >= self.config.strong_move_pct);

        let (polarity, verb) = if change > 0.0 {
            (Polarity::Bullish, if strong { "surged" } else { "rose" })
        } else if change < 0.0 {
            (Polarity::Bearish, if strong { "plunged" } else { "slipped" })
        } else {
            (Polarity::Neutral, "was unchanged")
        };

        let message = if change == 0.0 {
            format!("{} {} at ${:.2}", s.name, verb, close)
        } else {
            format!("{} {} ${:.2}{} to ${:.2}", s.name, verb, change.abs(), pct_text, close)
        };
        Insight::new(InsightKind::PriceDirection, polarity, message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Indicator rules
    // ─────────────────────────────────────────────────────────────────────────

    fn momentum(&self, s: &Snapshot<'_>) -> Option<Insight> {
        let rsi = s.row.rsi_14?;
        let (polarity, reading) = if rsi > self.config.rsi_overbought {
            (Polarity::Bearish, "overbought; a pullback is possible")
        } else if rsi < self.config.rsi_oversold {
            (Polarity::Bullish, "oversold; a rebound is possible")
        } else {
            (Polarity::Neutral, "neutral")
        };
        Some(Insight::new(
            InsightKind::Momentum,
            polarity,
            format!("RSI at {:.1} reads {}", rsi, reading),
        ))
    }

    fn trend(&self, s: &Snapshot<'_>) -> Option<Insight> {
        let close = s.bar.close;
        let sma_20 = s.row.sma_20?;

        let Some(sma_50) = s.row.sma_50 else {
            let (polarity, side) = side_of(close, sma_20);
            return Some(Insight::new(
                InsightKind::Trend,
                polarity,
                format!("Price is {} its 20-day average (${:.2})", side, sma_20),
            ));
        };

        let insight = match (close > sma_20, close > sma_50) {
            (true, true) => Insight::new(
                InsightKind::Trend,
                Polarity::Bullish,
                format!(
                    "Price is above its 20-day (${:.2}) and 50-day (${:.2}) averages: uptrend",
                    sma_20, sma_50
                ),
            ),
            (false, false) if close < sma_20 && close < sma_50 => Insight::new(
                InsightKind::Trend,
                Polarity::Bearish,
                format!(
                    "Price is below its 20-day (${:.2}) and 50-day (${:.2}) averages: downtrend",
                    sma_20, sma_50
                ),
            ),
            _ => Insight::new(
                InsightKind::Trend,
                Polarity::Neutral,
                format!(
                    "Price sits between its 20-day (${:.2}) and 50-day (${:.2}) averages: \
                     mixed trend",
                    sma_20, sma_50
                ),
            ),
        };
        Some(insight)
    }

    fn crossover(&self, s: &Snapshot<'_>) -> Option<Insight> {
        let (_, prev) = s.prev?;
        let (fast, slow) = (s.row.sma_20?, s.row.sma_50?);
        let (prev_fast, prev_slow) = (prev.sma_20?, prev.sma_50?);

        if prev_fast <= prev_slow && fast > slow {
            Some(Insight::new(
                InsightKind::Crossover,
                Polarity::Bullish,
                "Golden cross: the 20-day average crossed above the 50-day",
            ))
        } else if prev_fast >= prev_slow && fast < slow {
            Some(Insight::new(
                InsightKind::Crossover,
                Polarity::Bearish,
                "Death cross: the 20-day average crossed below the 50-day",
            ))
        } else {
            None
        }
    }

    fn macd(&self, s: &Snapshot<'_>) -> Option<Insight> {
        let (macd, signal) = (s.row.macd?, s.row.macd_signal?);
        let prev = s
            .prev
            .and_then(|(_, p)| Some((p.macd?, p.macd_signal?)));

        let crossed_up = prev.is_some_and(|(m, sg)| m <= sg) && macd > signal;
        let crossed_down = prev.is_some_and(|(m, sg)| m >= sg) && macd < signal;

        let (polarity, message) = if crossed_up {
            (Polarity::Bullish, "MACD crossed above its signal line".to_string())
        } else if crossed_down {
            (Polarity::Bearish, "MACD crossed below its signal line".to_string())
        } else if macd > signal {
            let message = format!("MACD ({:.3}) is above its signal line ({:.3})", macd, signal);
            (Polarity::Bullish, message)
        } else if macd < signal {
            let message = format!("MACD ({:.3}) is below its signal line ({:.3})", macd, signal);
            (Polarity::Bearish, message)
        } else {
            (Polarity::Neutral, format!("MACD is flat against its signal line at {:.3}", macd))
        };
        Some(Insight::new(InsightKind::Macd, polarity, message))
    }

    fn bands(&self, s: &Snapshot<'_>) -> Option<Insight> {
        let close = s.bar.close;
        let (upper, lower) = (s.row.bb_upper?, s.row.bb_lower?);
        if close > upper {
            Some(Insight::new(
                InsightKind::Bands,
                Polarity::Bearish,
                format!("Price closed above the upper Bollinger Band (${:.2}): stretched", upper),
            ))
        } else if close < lower {
            Some(Insight::new(
                InsightKind::Bands,
                Polarity::Bullish,
                format!("Price closed below the lower Bollinger Band (${:.2}): washed out", lower),
            ))
        } else {
            None
        }
    }

    fn volatility(&self, s: &Snapshot<'_>) -> Option<Insight> {
        let atr = s.row.atr_14?;
        let close = s.bar.close;
        if close <= 0.0 {
            return None;
        }
        let atr_pct = atr / close * 100.0;
        let (polarity, level) = if atr_pct > self.config.high_volatility_pct {
            (Polarity::Bearish, "high")
        } else if atr_pct < self.config.low_volatility_pct {
            (Polarity::Neutral, "low")
        } else {
            (Polarity::Neutral, "moderate")
        };
        Some(Insight::new(
            InsightKind::Volatility,
            polarity,
            format!("Volatility is {}: ATR is {:.2}% of price", level, atr_pct),
        ))
    }

    fn volume(&self, s: &Snapshot<'_>) -> Option<Insight> {
        let average = s.row.volume_sma_20.filter(|v| *v > 0.0)?;
        let ratio = s.bar.volume / average;
        let direction = s.prev.map(|(p, _)| s.bar.close - p.close).unwrap_or(0.0);

        let (polarity, message) = if ratio >= self.config.volume_spike_ratio {
            let polarity = if direction > 0.0 {
                Polarity::Bullish
            } else if direction < 0.0 {
                Polarity::Bearish
            } else {
                Polarity::Neutral
            };
            (polarity, format!("Heavy volume: {:.1}x the 20-day average", ratio))
        } else if ratio <= self.config.volume_light_ratio {
            (Polarity::Neutral, format!("Light volume: {:.1}x the 20-day average", ratio))
        } else {
            (Polarity::Neutral, format!("Volume is normal at {:.1}x the 20-day average", ratio))
        };
        Some(Insight::new(InsightKind::Volume, polarity, message))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute rules
    // ─────────────────────────────────────────────────────────────────────────

    fn valuation(&self, _s: &Snapshot<'_>, attributes: &CompanyAttributes) -> Option<Insight> {
        let pe = attributes.trailing_pe.filter(|pe| pe.is_finite() && *pe > 0.0)?;
        let (polarity, reading) = if pe > self.config.pe_rich {
            (Polarity::Bearish, "a rich valuation")
        } else if pe < self.config.pe_modest {
            (Polarity::Bullish, "a modest valuation")
        } else {
            (Polarity::Neutral, "a market-level valuation")
        };
        Some(Insight::new(
            InsightKind::Valuation,
            polarity,
            format!("Trailing P/E of {:.1} suggests {}", pe, reading),
        ))
    }

    fn range_position(&self, s: &Snapshot<'_>, attributes: &CompanyAttributes) -> Option<Insight> {
        let high = attributes.fifty_two_week_high.filter(|h| *h > 0.0)?;
        let low = attributes.fifty_two_week_low.filter(|l| *l > 0.0)?;
        let close = s.bar.close;
        let proximity = self.config.range_proximity_pct;

        let from_high = (high - close) / high * 100.0;
        let from_low = (close - low) / low * 100.0;

        if from_high <= proximity {
            Some(Insight::new(
                InsightKind::Valuation,
                Polarity::Bullish,
                format!(
                    "Trading within {:.1}% of its 52-week high (${:.2})",
                    from_high.max(0.0),
                    high
                ),
            ))
        } else if from_low <= proximity {
            Some(Insight::new(
                InsightKind::Valuation,
                Polarity::Bearish,
                format!(
                    "Trading within {:.1}% of its 52-week low (${:.2})",
                    from_low.max(0.0),
                    low
                ),
            ))
        } else {
            None
        }
    }
}

fn side_of(price: f64, level: f64) -> (Polarity, &'static str) {
    if price > level {
        (Polarity::Bullish, "above")
    } else if price < level {
        (Polarity::Bearish, "below")
    } else {
        (Polarity::Neutral, "at")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quant::IndicatorEngine;
    use types::PriceSeries;

    fn analyzed_from(closes: &[f64], volumes: &[f64]) -> AnalyzedSeries {
        let bars = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| Bar::new(i as i64, c, c + 0.5, c - 0.5, c, v))
            .collect();
        let series = PriceSeries::new("TEST", bars).unwrap();
        IndicatorEngine::default().compute(&series).unwrap()
    }

    fn analyzed(closes: &[f64]) -> AnalyzedSeries {
        analyzed_from(closes, &vec![1_000.0; closes.len()])
    }

    fn generate(series: &AnalyzedSeries) -> Vec<Insight> {
        InsightGenerator::default().generate(series, &CompanyAttributes::default())
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    fn find(insights: &[Insight], kind: InsightKind) -> Option<&Insight> {
        insights.iter().find(|i| i.kind == kind)
    }

    #[test]
    fn test_short_series_only_headline() {
        let series = analyzed(&[10.0, 10.5, 10.2, 10.8, 11.0]);
        let insights = generate(&series);
        assert_eq!(kinds(&insights), vec![InsightKind::PriceDirection]);
        assert_eq!(insights[0].polarity, Polarity::Bullish);
    }

    #[test]
    fn test_single_bar_headline_is_neutral() {
        let series = analyzed(&[42.0]);
        let insights = generate(&series);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].polarity, Polarity::Neutral);
        assert!(insights[0].message.contains("42.00"));
    }

    #[test]
    fn test_headline_direction_and_strength() {
        let generator = InsightGenerator::default();
        let attrs = CompanyAttributes::default();

        let down = generator.generate(&analyzed(&[100.0, 99.5]), &attrs);
        assert_eq!(down[0].polarity, Polarity::Bearish);
        assert!(down[0].message.contains("slipped"));

        let crash = generator.generate(&analyzed(&[100.0, 90.0]), &attrs);
        assert!(crash[0].message.contains("plunged"));
        assert!(crash[0].message.contains("-10.00%"));

        let flat = generator.generate(&analyzed(&[100.0, 100.0]), &attrs);
        assert_eq!(flat[0].polarity, Polarity::Neutral);
    }

    #[test]
    fn test_steady_rise() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let insights = generate(&analyzed(&closes));

        assert_eq!(insights[0].kind, InsightKind::PriceDirection);
        assert_eq!(insights[0].polarity, Polarity::Bullish);

        let momentum = find(&insights, InsightKind::Momentum).unwrap();
        assert_eq!(momentum.polarity, Polarity::Bearish);
        assert!(momentum.message.contains("overbought"));

        let trend = find(&insights, InsightKind::Trend).unwrap();
        assert_eq!(trend.polarity, Polarity::Bullish);
        assert!(find(&insights, InsightKind::Crossover).is_none());
    }

    #[test]
    fn test_accelerating_rise_puts_macd_above_signal() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + 0.05 * (i * i) as f64).collect();
        let insights = generate(&analyzed(&closes));
        let macd = find(&insights, InsightKind::Macd).unwrap();
        assert_eq!(macd.polarity, Polarity::Bullish);
        assert!(macd.message.contains("above its signal line"));
    }

    #[test]
    fn test_steady_fall_is_oversold_and_bearish() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let insights = generate(&analyzed(&closes));
        assert_eq!(insights[0].polarity, Polarity::Bearish);
        assert_eq!(find(&insights, InsightKind::Momentum).unwrap().polarity, Polarity::Bullish);
        assert_eq!(find(&insights, InsightKind::Trend).unwrap().polarity, Polarity::Bearish);
    }

    #[test]
    fn test_trend_with_only_short_average() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let insights = generate(&analyzed(&closes));
        let trend = find(&insights, InsightKind::Trend).unwrap();
        assert!(trend.message.contains("20-day"));
        assert!(!trend.message.contains("50-day"));
    }

    #[test]
    fn test_golden_cross() {
        // Long decline, then a sharp rally pulls SMA_20 above SMA_50
        let mut closes: Vec<f64> = (0..50).map(|i| 150.0 - i as f64).collect();
        let mut crossed = None;
        for step in 1..40 {
            closes.push(101.0 + step as f64 * 4.0);
            let series = analyzed(&closes);
            let insights = generate(&series);
            if let Some(cross) = find(&insights, InsightKind::Crossover) {
                crossed = Some(cross.clone());
                break;
            }
        }
        let cross = crossed.expect("a golden cross during the rally");
        assert_eq!(cross.polarity, Polarity::Bullish);
        assert!(cross.message.starts_with("Golden cross"));
    }

    #[test]
    fn test_volume_spike_follows_direction() {
        let closes: Vec<f64> = (0..25).map(|i| 50.0 + (i % 2) as f64 * 0.1).collect();
        let mut volumes = vec![1_000.0; 25];
        volumes[24] = 5_000.0;
        // Last bar (i = 24) closes down from i = 23
        let insights = generate(&analyzed_from(&closes, &volumes));
        let volume = find(&insights, InsightKind::Volume).unwrap();
        assert_eq!(volume.polarity, Polarity::Bearish);
        assert!(volume.message.starts_with("Heavy volume"));
    }

    #[test]
    fn test_zero_average_volume_is_suppressed() {
        let closes: Vec<f64> = (0..25).map(|i| 50.0 + i as f64).collect();
        let insights = generate(&analyzed_from(&closes, &[0.0; 25]));
        assert!(find(&insights, InsightKind::Volume).is_none());
    }

    #[test]
    fn test_valuation_from_attributes() {
        let attrs = CompanyAttributes {
            long_name: Some("Example Corp".to_string()),
            trailing_pe: Some(45.0),
            fifty_two_week_high: Some(101.0),
            fifty_two_week_low: Some(60.0),
            ..Default::default()
        };
        let insights = InsightGenerator::default().generate(&analyzed(&[99.0, 100.0]), &attrs);

        assert!(insights[0].message.starts_with("Example Corp"));
        let valuation: Vec<_> = insights
            .iter()
            .filter(|i| i.kind == InsightKind::Valuation)
            .collect();
        assert_eq!(valuation.len(), 2);
        assert_eq!(valuation[0].polarity, Polarity::Bearish);
        assert!(valuation[1].message.contains("52-week high"));
    }

    #[test]
    fn test_order_is_stable() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let generator = InsightGenerator::default();
        let attrs = CompanyAttributes::default();
        let series = analyzed(&closes);
        assert_eq!(generator.generate(&series, &attrs), generator.generate(&series, &attrs));
    }
}
