//! The value object handed to the presentation layer.

use serde::Serialize;

use ml::ModelSummary;
use quant::PerformanceSummary;
use types::{AnalyzedSeries, CompanyAttributes, Insight, Period};

use crate::metrics::KeyMetrics;

/// Result of the forecasting stage.
///
/// A missing model is an expected outcome for short histories, not a
/// request failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    Trained(ModelSummary),
    Unavailable { reason: String },
}

impl ModelOutcome {
    pub fn summary(&self) -> Option<&ModelSummary> {
        match self {
            ModelOutcome::Trained(summary) => Some(summary),
            ModelOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.summary().is_some()
    }
}

/// Everything one analysis request produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub period: Period,
    /// Data version of the snapshot the report was computed from.
    pub version: u64,
    pub analyzed: AnalyzedSeries,
    pub attributes: CompanyAttributes,
    pub metrics: KeyMetrics,
    pub performance: PerformanceSummary,
    pub model: ModelOutcome,
    /// Headline first, then one entry per rule that fired.
    pub insights: Vec<Insight>,
}

impl AnalysisReport {
    /// Display name, falling back to the ticker.
    pub fn display_name(&self) -> &str {
        self.attributes.display_name(&self.symbol)
    }

    /// The first insight, always present for a non-empty series.
    pub fn headline(&self) -> Option<&Insight> {
        self.insights.first()
    }
}
