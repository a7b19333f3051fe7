//! Forecasting for the stock analyzer.
//!
//! Turns an indicator-augmented series into feature rows, fits a random
//! forest regressor on them and forecasts the next bar.
//!
//! # Modules
//!
//! - [`features`] - [`FeatureBuilder`]: feature vectors and next-bar labels
//! - [`decision_tree`] - CART regression tree
//! - [`random_forest`] - Bagged, seeded tree ensemble
//! - [`model`] - Train / evaluate / predict protocol and [`ModelSummary`]
//!
//! # Example
//!
//! ```
//! use ml::{FeatureBuilder, ModelConfig, ModelError, PredictionModel};
//! use quant::IndicatorEngine;
//! use types::{Bar, PriceSeries};
//!
//! let bars = (0..30)
//!     .map(|i| {
//!         let c = 50.0 + (i as f64 * 0.4).sin();
//!         Bar::new(i, c, c + 0.5, c - 0.5, c, 500.0)
//!     })
//!     .collect();
//! let series = PriceSeries::new("DEMO", bars).unwrap();
//! let analyzed = IndicatorEngine::default().compute(&series).unwrap();
//!
//! // 30 bars leave 10 labelled rows: below the default minimum of 20
//! let rows = FeatureBuilder::build(&analyzed);
//! let result = PredictionModel::train(&rows, &ModelConfig::default());
//! assert!(matches!(result, Err(ModelError::InsufficientHistory { eligible: 10, .. })));
//! ```

pub mod decision_tree;
pub mod error;
pub mod features;
pub mod model;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeConfig};
pub use error::{ModelError, Result};
pub use features::FeatureBuilder;
pub use model::{
    Confidence, ModelConfig, ModelSummary, PredictionModel, TrainedModel, price_from_return,
};
pub use random_forest::{ForestConfig, RandomForest};
