//! Orchestration layer of the stock analyzer.
//!
//! [`StockAnalyzer`] fetches one symbol's history from a
//! [`MarketDataSource`], runs the indicator, forecasting and insight stages
//! and packages the result as an [`AnalysisReport`].
//!
//! # Modules
//!
//! - [`source`] - Data source trait plus in-memory and synthetic sources
//! - [`analyzer`] - [`StockAnalyzer`], the request pipeline
//! - [`cache`] - TTL result cache with one computation in flight per key
//! - [`metrics`] - [`KeyMetrics`] for the latest bar
//! - [`report`] - [`AnalysisReport`] and [`ModelOutcome`]
//! - [`config`] - [`AnalysisConfig`]
//!
//! # Example
//!
//! ```
//! use analysis::{AnalysisConfig, StockAnalyzer, SyntheticSource};
//! use types::Period;
//!
//! let analyzer = StockAnalyzer::new(SyntheticSource::new(7), AnalysisConfig::new().n_trees(10));
//! let report = analyzer.analyze("DEMO", Period::SixMonths).unwrap();
//!
//! assert_eq!(report.analyzed.len(), 126);
//! assert!(report.model.is_trained());
//! assert!(report.headline().is_some());
//! ```

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod source;

pub use analyzer::StockAnalyzer;
pub use cache::{AnalysisCache, CacheKey, ResultCache};
pub use config::{AnalysisConfig, CacheConfig};
pub use error::{AnalysisError, Result};
pub use metrics::{KeyMetrics, MarketCapTier, RsiZone};
pub use report::{AnalysisReport, ModelOutcome};
pub use source::{
    DataSourceError, InMemorySource, MarketDataSource, MarketSnapshot, SyntheticSource,
};
