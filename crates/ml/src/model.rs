//! Train / evaluate / forecast protocol around the random forest.
//!
//! # Protocol
//!
//! 1. Keep the labelled rows (the unlabelled final row is for inference)
//! 2. Refuse to fit below `min_training_rows`
//! 3. Split chronologically: training prefix, held-out suffix
//! 4. Fit on the prefix, score R² on both parts
//!
//! The model is rebuilt for every request and never persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use quant::stats::r2_score;
use types::{FEATURE_NAMES, FeatureRow, LabeledRow, N_FEATURES};

use crate::error::{ModelError, Result};
use crate::random_forest::{ForestConfig, RandomForest};

// =============================================================================
// Configuration
// =============================================================================

/// Training configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub forest: ForestConfig,
    /// Share of labelled rows held out for the test score.
    pub test_fraction: f64,
    /// Fewer labelled rows than this yields no model.
    pub min_training_rows: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            test_fraction: 0.2,
            min_training_rows: 20,
        }
    }
}

impl ModelConfig {
    pub fn forest(mut self, forest: ForestConfig) -> Self {
        self.forest = forest;
        self
    }

    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn min_training_rows(mut self, rows: usize) -> Self {
        self.min_training_rows = rows;
        self
    }

    /// Held-out suffix length for `n` labelled rows: at least one, and
    /// always leaving at least one training row.
    pub fn test_rows(&self, n: usize) -> usize {
        let test = (n as f64 * self.test_fraction).round() as usize;
        test.max(1).min(n.saturating_sub(1))
    }
}

// =============================================================================
// Training
// =============================================================================

/// Fits [`TrainedModel`]s from feature rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionModel;

impl PredictionModel {
    /// Fit a model on the labelled rows of `rows`.
    ///
    /// # Errors
    /// - [`ModelError::InsufficientHistory`] below the configured minimum
    /// - [`ModelError::Fit`] on an empty forest, non-finite inputs or scores
    pub fn train(rows: &[LabeledRow], config: &ModelConfig) -> Result<TrainedModel> {
        if config.forest.n_trees == 0 {
            return Err(ModelError::Fit("forest has no trees".to_string()));
        }

        let labelled: Vec<(&FeatureRow, f64)> = rows
            .iter()
            .filter_map(|r| r.label.map(|label| (&r.features, label)))
            .collect();

        let required = config.min_training_rows.max(2);
        if labelled.len() < required {
            debug!(eligible = labelled.len(), required, "not enough rows to train");
            return Err(ModelError::InsufficientHistory {
                eligible: labelled.len(),
                required,
            });
        }

        for (features, label) in &labelled {
            check_finite(features)?;
            if !label.is_finite() {
                return Err(ModelError::Fit(format!(
                    "non-finite label at timestamp {}",
                    features.timestamp
                )));
            }
        }

        let n = labelled.len();
        let test_rows = config.test_rows(n);
        let train_rows = n - test_rows;

        let x: Vec<[f64; N_FEATURES]> = labelled.iter().map(|(f, _)| f.values).collect();
        let y: Vec<f64> = labelled.iter().map(|(_, l)| *l).collect();
        let (x_train, x_test) = x.split_at(train_rows);
        let (y_train, y_test) = y.split_at(train_rows);

        let mut forest = RandomForest::new(config.forest);
        forest.fit(x_train, y_train);

        let train_score = score(&forest, x_train, y_train)?;
        let test_score = score(&forest, x_test, y_test)?;

        info!(
            train_rows,
            test_rows,
            train_score,
            test_score,
            trees = forest.n_trees(),
            "model trained"
        );

        Ok(TrainedModel {
            forest,
            train_score,
            test_score,
            train_rows,
            test_rows,
        })
    }
}

fn check_finite(features: &FeatureRow) -> Result<()> {
    match features.values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ModelError::Fit(format!(
            "non-finite {} at timestamp {}",
            FEATURE_NAMES[i], features.timestamp
        ))),
        None => Ok(()),
    }
}

fn score(forest: &RandomForest, x: &[[f64; N_FEATURES]], y: &[f64]) -> Result<f64> {
    let predicted: Vec<f64> = x.iter().map(|row| forest.predict(row)).collect();
    r2_score(y, &predicted)
        .filter(|s| s.is_finite())
        .ok_or_else(|| ModelError::Fit("could not score predictions".to_string()))
}

// =============================================================================
// Trained Model
// =============================================================================

/// A fitted forecaster with its evaluation scores.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    forest: RandomForest,
    train_score: f64,
    test_score: f64,
    train_rows: usize,
    test_rows: usize,
}

impl TrainedModel {
    /// Feature names in the order the model consumes them.
    pub fn feature_names(&self) -> &'static [&'static str; N_FEATURES] {
        &FEATURE_NAMES
    }

    /// R² on the training prefix.
    pub fn train_score(&self) -> f64 {
        self.train_score
    }

    /// R² on the held-out suffix.
    pub fn test_score(&self) -> f64 {
        self.test_score
    }

    pub fn train_rows(&self) -> usize {
        self.train_rows
    }

    pub fn test_rows(&self) -> usize {
        self.test_rows
    }

    /// Importance per feature name, summing to 1.0.
    pub fn feature_importance(&self) -> BTreeMap<String, f64> {
        FEATURE_NAMES
            .iter()
            .zip(self.forest.feature_importances())
            .map(|(name, imp)| (name.to_string(), *imp))
            .collect()
    }

    /// Forecast the next-bar percentage return for `row`.
    pub fn predict(&self, row: &FeatureRow) -> Result<f64> {
        check_finite(row)?;
        let predicted = self.forest.predict(&row.values);
        if predicted.is_finite() {
            Ok(predicted)
        } else {
            Err(ModelError::Fit("non-finite prediction".to_string()))
        }
    }

    /// Forecast and package everything a caller displays.
    pub fn summarize(&self, latest: &FeatureRow, last_close: f64) -> Result<ModelSummary> {
        let predicted_change_pct = self.predict(latest)?;
        Ok(ModelSummary {
            train_score: self.train_score,
            test_score: self.test_score,
            predicted_price: price_from_return(last_close, predicted_change_pct),
            predicted_change_pct,
            confidence: Confidence::from_test_score(self.test_score),
            feature_importance: self.feature_importance(),
            train_rows: self.train_rows,
            test_rows: self.test_rows,
        })
    }
}

/// Price implied by applying a percentage return to `close`.
#[inline]
pub fn price_from_return(close: f64, return_pct: f64) -> f64 {
    close * (1.0 + return_pct / 100.0)
}

// =============================================================================
// Summary
// =============================================================================

/// Qualitative reading of the held-out R².
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// High above 0.8, Medium above 0.6, else Low.
    pub fn from_test_score(score: f64) -> Self {
        if score > 0.8 {
            Confidence::High
        } else if score > 0.6 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// Read-only model output for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub train_score: f64,
    pub test_score: f64,
    /// Forecast close of the next bar.
    pub predicted_price: f64,
    /// Forecast next-bar return, in percent.
    pub predicted_change_pct: f64,
    pub confidence: Confidence,
    pub feature_importance: BTreeMap<String, f64>,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl ModelSummary {
    /// The `n` most important features, highest first.
    pub fn top_features(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .feature_importance
            .iter()
            .map(|(name, imp)| (name.as_str(), *imp))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}
