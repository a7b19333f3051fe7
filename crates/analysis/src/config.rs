//! Configuration for an analysis pipeline.

use std::time::Duration;

use insights::InsightConfig;
use ml::ModelConfig;
use quant::IndicatorConfig;
use serde::{Deserialize, Serialize};

/// Result cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a cached report stays fresh.
    pub ttl_secs: u64,
    /// When false, `analyze_cached` always recomputes.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Master configuration for [`crate::StockAnalyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Stages
    // ─────────────────────────────────────────────────────────────────────────
    pub indicators: IndicatorConfig,
    pub model: ModelConfig,
    pub insights: InsightConfig,

    // ─────────────────────────────────────────────────────────────────────────
    // Caching
    // ─────────────────────────────────────────────────────────────────────────
    pub cache: CacheConfig,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indicators(mut self, indicators: IndicatorConfig) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn insights(mut self, insights: InsightConfig) -> Self {
        self.insights = insights;
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Seed for the forest; fitting is reproducible for a given seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.model.forest = self.model.forest.seed(seed);
        self
    }

    pub fn n_trees(mut self, n: usize) -> Self {
        self.model.forest = self.model.forest.n_trees(n);
        self
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.model.forest.n_trees, 100);
        assert_eq!(config.model.forest.seed, 42);
        assert_eq!(config.model.min_training_rows, 20);
        assert_eq!(config.indicators.bollinger_k, 2.0);
        assert_eq!(config.insights.rsi_overbought, 70.0);
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_builder_setters() {
        let config = AnalysisConfig::new().seed(7).n_trees(25);
        assert_eq!(config.model.forest.seed, 7);
        assert_eq!(config.model.forest.n_trees, 25);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(
            r#"{ "model": { "min_training_rows": 40, "forest": { "n_trees": 10 } },
                 "indicators": { "rsi_smoothing": "wilder" },
                 "cache": { "enabled": false } }"#,
        )
        .unwrap();
        assert_eq!(config.model.min_training_rows, 40);
        assert_eq!(config.model.forest.n_trees, 10);
        assert_eq!(config.model.forest.max_depth, 10);
        assert_eq!(config.model.test_fraction, 0.2);
        assert_eq!(config.indicators.rsi_smoothing, quant::RsiSmoothing::Wilder);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 300);
    }
}
