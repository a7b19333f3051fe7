//! Request orchestration.
//!
//! One request (one symbol, one period) flows through:
//!
//! ```text
//! MarketDataSource ─► IndicatorEngine ─► FeatureBuilder ─► PredictionModel
//!                                 │                              │
//!                                 └─► InsightGenerator, KeyMetrics, PerformanceSummary
//! ```
//!
//! Nothing is retained between requests except the optional result cache.

use std::sync::Arc;

use tracing::{info, warn};

use insights::InsightGenerator;
use ml::{FeatureBuilder, ModelError, PredictionModel};
use quant::{IndicatorEngine, PerformanceSummary};
use types::{AnalyzedSeries, Period};

use crate::cache::{AnalysisCache, CacheKey};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::metrics::KeyMetrics;
use crate::report::{AnalysisReport, ModelOutcome};
use crate::source::{MarketDataSource, MarketSnapshot};

pub struct StockAnalyzer<S> {
    source: S,
    config: AnalysisConfig,
    engine: IndicatorEngine,
    insights: InsightGenerator,
    cache: AnalysisCache,
}

impl<S: MarketDataSource> StockAnalyzer<S> {
    pub fn new(source: S, config: AnalysisConfig) -> Self {
        Self {
            source,
            engine: IndicatorEngine::new(config.indicators),
            insights: InsightGenerator::new(config.insights),
            cache: AnalysisCache::new(config.cache.ttl()),
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Fetch and analyze, bypassing the cache.
    pub fn analyze(&self, symbol: &str, period: Period) -> Result<AnalysisReport> {
        let snapshot = self.source.fetch(symbol, period)?;
        self.analyze_snapshot(period, snapshot)
    }

    /// Fetch, then serve from the cache or analyze and store.
    ///
    /// The data version reported by the source is part of the key, so new
    /// data is never answered with a stale report.
    pub fn analyze_cached(&self, symbol: &str, period: Period) -> Result<Arc<AnalysisReport>> {
        let snapshot = self.source.fetch(symbol, period)?;
        if !self.config.cache.enabled {
            return self.analyze_snapshot(period, snapshot).map(Arc::new);
        }
        let key = CacheKey::new(snapshot.series.symbol(), period, snapshot.version);
        self.cache
            .get_or_compute(key, || self.analyze_snapshot(period, snapshot))
    }

    /// Run every stage on already fetched data.
    ///
    /// # Errors
    /// Only an empty series is fatal. A model that cannot be trained is
    /// reported as [`ModelOutcome::Unavailable`].
    pub fn analyze_snapshot(
        &self,
        period: Period,
        snapshot: MarketSnapshot,
    ) -> Result<AnalysisReport> {
        let MarketSnapshot {
            series,
            attributes,
            version,
        } = snapshot;
        let symbol = series.symbol().to_string();

        let analyzed = self.engine.compute(&series)?;
        let model = self.forecast(&analyzed);
        let insights = self.insights.generate(&analyzed, &attributes);
        let metrics = KeyMetrics::from_series(&analyzed, &attributes)
            .ok_or_else(|| AnalysisError::EmptySeries(symbol.clone()))?;
        let performance = PerformanceSummary::from_closes(&series.closes());

        info!(
            symbol = %symbol,
            %period,
            bars = analyzed.len(),
            insights = insights.len(),
            model = model.is_trained(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            symbol,
            period,
            version,
            analyzed,
            attributes,
            metrics,
            performance,
            model,
            insights,
        })
    }

    fn forecast(&self, analyzed: &AnalyzedSeries) -> ModelOutcome {
        let rows = FeatureBuilder::build(analyzed);
        let outcome = PredictionModel::train(&rows, &self.config.model).and_then(|model| {
            let latest = FeatureBuilder::latest_row(&rows)
                .ok_or_else(|| ModelError::Fit("latest bar has undefined features".to_string()))?;
            let last_close = analyzed.latest().map_or(0.0, |(bar, _)| bar.close);
            model.summarize(&latest, last_close)
        });

        match outcome {
            Ok(summary) => ModelOutcome::Trained(summary),
            Err(err) => {
                warn!(symbol = analyzed.symbol(), error = %err, "model unavailable");
                ModelOutcome::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }
}
