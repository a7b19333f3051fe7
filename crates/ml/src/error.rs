//! Error types for model training and inference.

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Reasons a model cannot be produced or applied.
///
/// Both variants are recoverable: callers surface them as "model
/// unavailable" rather than aborting the analysis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Fewer eligible labelled rows than the configured minimum.
    #[error("insufficient history: {eligible} eligible rows, {required} required")]
    InsufficientHistory { eligible: usize, required: usize },

    /// Numerical failure while fitting or predicting.
    #[error("model fit failed: {0}")]
    Fit(String),
}
