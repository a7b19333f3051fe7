//! Rule-based market insights.
//!
//! [`InsightGenerator`] reads the latest rows of an
//! [`types::AnalyzedSeries`] (plus optional company attributes) and emits an
//! ordered list of [`types::Insight`]s. The price-direction headline is
//! always first; every other rule is independent and is skipped when any
//! of its inputs is undefined.

pub mod config;
pub mod generator;

pub use config::InsightConfig;
pub use generator::InsightGenerator;
