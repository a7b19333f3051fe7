//! Error types for indicator computation.

/// Result type for indicator operations.
pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Errors that can occur while computing indicators.
///
/// Short history is not an error: partial windows yield `None` values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    /// The series has no bars at all.
    #[error("price series for {0} is empty")]
    EmptySeries(String),
}
