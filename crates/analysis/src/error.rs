//! Error types for an analysis request.

use quant::IndicatorError;
use types::SeriesError;

use crate::source::DataSourceError;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Fatal request failures.
///
/// A missing model is not an error: it is reported through
/// [`crate::ModelOutcome::Unavailable`] inside a successful report.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The source returned no bars at all.
    #[error("no price data for {0}")]
    EmptySeries(String),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error("invalid price series: {0}")]
    Series(#[from] SeriesError),
}

impl From<IndicatorError> for AnalysisError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::EmptySeries(symbol) => AnalysisError::EmptySeries(symbol),
        }
    }
}
