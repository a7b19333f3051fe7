//! Bagged ensemble of regression trees.
//!
//! Tree `i` draws its bootstrap sample and its feature subsets from a
//! generator seeded with `seed + i`, so a fit is fully determined by the
//! data and [`ForestConfig`]. With the `parallel` feature the trees are
//! grown on the rayon pool; results are identical either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use types::N_FEATURES;

use crate::decision_tree::{DecisionTree, TreeConfig};

/// Random forest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Maximum depth of each tree.
    pub max_depth: usize,
    /// Minimum samples to split.
    pub min_samples_split: usize,
    /// Minimum samples in leaf.
    pub min_samples_leaf: usize,
    /// Features considered per split (`None` = all).
    pub max_features: Option<usize>,
    /// Bootstrap sampling.
    pub bootstrap: bool,
    /// Random seed.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    pub fn n_trees(mut self, n: usize) -> Self {
        self.n_trees = n.max(1);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    fn tree_config(&self, tree_index: usize) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            seed: self.seed.wrapping_add(tree_index as u64),
        }
    }
}

/// Random forest regressor.
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_importances: [f64; N_FEATURES],
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_importances: [0.0; N_FEATURES],
        }
    }

    /// Train the forest on `x` / `y`.
    pub fn fit(&mut self, x: &[[f64; N_FEATURES]], y: &[f64]) {
        let n = x.len().min(y.len());
        let config = self.config;

        let grow = |i: usize| {
            let tree_config = config.tree_config(i);
            let indices: Vec<usize> = if config.bootstrap && n > 0 {
                let mut rng = StdRng::seed_from_u64(tree_config.seed);
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            let mut tree = DecisionTree::new(tree_config);
            tree.fit(x, y, &indices);
            tree
        };

        #[cfg(feature = "parallel")]
        let trees: Vec<DecisionTree> = (0..config.n_trees).into_par_iter().map(grow).collect();
        #[cfg(not(feature = "parallel"))]
        let trees: Vec<DecisionTree> = (0..config.n_trees).map(grow).collect();

        self.trees = trees;
        self.feature_importances = aggregate_importances(&self.trees);
    }

    /// Mean prediction across trees. An unfitted forest predicts 0.
    pub fn predict(&self, features: &[f64; N_FEATURES]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict(features)).sum::<f64>() / self.trees.len() as f64
    }

    /// Feature importances, non-negative and summing to 1.0.
    pub fn feature_importances(&self) -> &[f64; N_FEATURES] {
        &self.feature_importances
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

/// Normalise each tree's impurity decreases, average them, then renormalise.
///
/// Trees without any split contribute nothing; if no tree split at all the
/// importance is uniform.
fn aggregate_importances(trees: &[DecisionTree]) -> [f64; N_FEATURES] {
    let mut total = [0.0; N_FEATURES];
    for tree in trees {
        let decrease = tree.impurity_decrease();
        let sum: f64 = decrease.iter().sum();
        if sum > 0.0 {
            for (t, d) in total.iter_mut().zip(decrease) {
                *t += d / sum;
            }
        }
    }

    let sum: f64 = total.iter().sum();
    if sum > 0.0 {
        total.iter_mut().for_each(|t| *t /= sum);
    } else {
        total = [1.0 / N_FEATURES as f64; N_FEATURES];
    }
    total
}
