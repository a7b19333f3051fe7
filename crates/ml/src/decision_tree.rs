//! CART regression tree.
//!
//! Splits minimise the summed squared error of the two children (variance
//! reduction). Candidate thresholds are midpoints between consecutive
//! distinct feature values, found with one sorted scan per feature.
//!
//! # Tree Traversal
//!
//! - Start at the root
//! - At a split, go left if `features[feature] <= threshold`, else right
//! - A leaf returns the mean label of the training samples that reached it

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use types::N_FEATURES;

/// Impurity below which a node is treated as pure.
const PURE_NODE_SSE: f64 = 1e-12;

/// Decision tree configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree (root is depth 0).
    pub max_depth: usize,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Minimum samples in each child of a split.
    pub min_samples_leaf: usize,
    /// Features considered per split (`None` = all).
    pub max_features: Option<usize>,
    /// Seed for feature subsampling.
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    /// Reduction in summed squared error.
    gain: f64,
}

/// Regression tree over fixed-width feature vectors.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<Node>,
    /// Summed squared-error reduction per feature (unnormalised).
    impurity_decrease: [f64; N_FEATURES],
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            impurity_decrease: [0.0; N_FEATURES],
        }
    }

    /// Fit on the samples named by `indices` (duplicates allowed, as in a
    /// bootstrap draw).
    ///
    /// Inputs must be finite; the caller validates them.
    pub fn fit(&mut self, x: &[[f64; N_FEATURES]], y: &[f64], indices: &[usize]) {
        self.impurity_decrease = [0.0; N_FEATURES];
        self.root = None;
        if indices.is_empty() {
            return;
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut indices = indices.to_vec();
        self.root = Some(self.build(x, y, &mut indices, 0, &mut rng));
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Predict the label of one feature vector. An unfitted tree predicts 0.
    pub fn predict(&self, features: &[f64; N_FEATURES]) -> f64 {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0.0,
        };
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Raw impurity decrease attributed to each feature.
    pub fn impurity_decrease(&self) -> &[f64; N_FEATURES] {
        &self.impurity_decrease
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, Node::n_leaves)
    }

    fn build(
        &mut self,
        x: &[[f64; N_FEATURES]],
        y: &[f64],
        indices: &mut [usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> Node {
        let n = indices.len();
        let (sum, sum_sq) = indices
            .iter()
            .fold((0.0, 0.0), |(s, sq), &i| (s + y[i], sq + y[i] * y[i]));
        let mean = sum / n as f64;
        let sse = sse(sum, sum_sq, n);

        if depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || sse <= PURE_NODE_SSE
        {
            return Node::Leaf { value: mean };
        }

        let Some(split) = self.find_best_split(x, y, indices, sse, rng) else {
            return Node::Leaf { value: mean };
        };

        self.impurity_decrease[split.feature] += split.gain;

        // Partition in place: left samples first
        let mut boundary = 0;
        for k in 0..n {
            if x[indices[k]][split.feature] <= split.threshold {
                indices.swap(k, boundary);
                boundary += 1;
            }
        }
        let (left, right) = indices.split_at_mut(boundary);

        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(self.build(x, y, left, depth + 1, rng)),
            right: Box::new(self.build(x, y, right, depth + 1, rng)),
        }
    }

    fn find_best_split(
        &self,
        x: &[[f64; N_FEATURES]],
        y: &[f64],
        indices: &[usize],
        parent_sse: f64,
        rng: &mut StdRng,
    ) -> Option<BestSplit> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        if n < 2 * min_leaf {
            return None;
        }

        let mut features: Vec<usize> = (0..N_FEATURES).collect();
        if let Some(max) = self.config.max_features.filter(|&m| m < N_FEATURES) {
            features.shuffle(rng);
            features.truncate(max.max(1));
            features.sort_unstable();
        }

        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();

        let mut best: Option<BestSplit> = None;
        let mut sorted = indices.to_vec();

        for feature in features {
            sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let yi = y[sorted[k - 1]];
                left_sum += yi;
                left_sq += yi * yi;

                let (lo, hi) = (x[sorted[k - 1]][feature], x[sorted[k]][feature]);
                if k < min_leaf || n - k < min_leaf || lo == hi {
                    continue;
                }

                let children_sse = sse(left_sum, left_sq, k)
                    + sse(total_sum - left_sum, total_sq - left_sq, n - k);
                let gain = parent_sse - children_sse;
                if gain > PURE_NODE_SSE && best.is_none_or(|b| gain > b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: lo + (hi - lo) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

/// Summed squared error around the mean, from running sums.
#[inline]
fn sse(sum: f64, sum_sq: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (sum_sq - sum * sum / n as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(v: f64) -> [f64; N_FEATURES] {
        let mut r = [0.0; N_FEATURES];
        r[0] = v;
        r
    }

    #[test]
    fn test_step_function_is_learned_exactly() {
        let x: Vec<_> = (0..20).map(|i| row(i as f64)).collect();
        let y: Vec<f64> = (0..20).map(|i| if i < 10 { 1.0 } else { 5.0 }).collect();
        let indices: Vec<usize> = (0..20).collect();

        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(&x, &y, &indices);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict(&row(3.0)), 1.0);
        assert_eq!(tree.predict(&row(15.0)), 5.0);
        // Split at the midpoint between 9 and 10
        assert_eq!(tree.predict(&row(9.5)), 1.0);
        assert_eq!(tree.predict(&row(9.6)), 5.0);
    }

    #[test]
    fn test_constant_labels_make_a_single_leaf() {
        let x: Vec<_> = (0..10).map(|i| row(i as f64)).collect();
        let y = vec![2.5; 10];
        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(&x, &y, &(0..10).collect::<Vec<_>>());

        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.predict(&row(100.0)), 2.5);
        assert!(tree.impurity_decrease().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_limits_are_respected() {
        let x: Vec<_> = (0..64).map(|i| row(i as f64)).collect();
        let y: Vec<f64> = (0..64).map(|i| (i * i) as f64).collect();
        let indices: Vec<usize> = (0..64).collect();

        let config = TreeConfig {
            max_depth: 3,
            ..Default::default()
        };
        let mut tree = DecisionTree::new(config);
        tree.fit(&x, &y, &indices);
        assert!(tree.depth() <= 3);
        assert!(tree.n_leaves() <= 8);

        let config = TreeConfig {
            min_samples_split: 100,
            ..Default::default()
        };
        let mut tree = DecisionTree::new(config);
        tree.fit(&x, &y, &indices);
        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    fn test_importance_goes_to_informative_feature() {
        let x: Vec<_> = (0..30)
            .map(|i| {
                let mut r = row(i as f64);
                r[4] = ((i * 7) % 5) as f64; // noise
                r
            })
            .collect();
        let y: Vec<f64> = (0..30).map(|i| if i < 15 { 0.0 } else { 10.0 }).collect();
        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(&x, &y, &(0..30).collect::<Vec<_>>());

        let imp = tree.impurity_decrease();
        assert!(imp[0] > 0.0);
        assert_eq!(imp[4], 0.0);
    }

    #[test]
    fn test_unfitted_tree_predicts_zero() {
        let tree = DecisionTree::new(TreeConfig::default());
        assert!(!tree.is_fitted());
        assert_eq!(tree.predict(&row(1.0)), 0.0);
    }
}
