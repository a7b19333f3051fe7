//! Core types for the stock analyzer.
//!
//! This crate provides the value objects shared by every stage of an
//! analysis request: raw OHLCV bars, the indicator-augmented series, the
//! feature schema used by the forecasting model, and qualitative insights.
//!
//! All types are plain data. Nothing here performs I/O or keeps state
//! between requests.

pub mod attributes;
pub mod features;
pub mod ids;
pub mod indicators;
pub mod insight;
pub mod market_data;

pub use attributes::CompanyAttributes;
pub use features::{FEATURE_NAMES, FeatureRow, LabeledRow, N_FEATURES};
pub use ids::{Symbol, Timestamp};
pub use indicators::{AnalyzedSeries, BollingerOutput, IndicatorKind, IndicatorRow};
pub use insight::{Insight, InsightKind, Polarity};
pub use market_data::{Bar, Period, PriceSeries, SeriesError};
