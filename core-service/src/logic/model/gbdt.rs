//! Gradient Boosted Classifier
//!
//! Binomial deviance boosting over `RegressionTree`s:
//! - start from the prior log-odds of the positive class
//! - each round fits a tree to `y - p` and takes a Newton step per leaf
//! - the raw score is shrunk by the learning rate before it is added
//!
//! Feature order is shuffled per node from a seeded `StdRng`, so two fits on
//! the same data produce the same trees.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::training::TrainingError;
use super::tree::{Gradients, RegressionTree, TreeParams};
use crate::constants;

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: constants::N_ESTIMATORS,
            learning_rate: constants::LEARNING_RATE,
            max_depth: constants::MAX_DEPTH,
            min_samples_split: constants::MIN_SAMPLES_SPLIT,
            min_samples_leaf: constants::MIN_SAMPLES_LEAF,
            seed: constants::RANDOM_SEED,
        }
    }
}

impl BoostingParams {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// Numerically stable logistic function
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedClassifier {
    params: BoostingParams,
    n_features: usize,
    /// Prior log-odds
    init_score: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedClassifier {
    /// Fit on an encoded matrix and binary labels
    pub fn fit(params: BoostingParams, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<Self, TrainingError> {
        let (rows, n_features) = x.dim();

        if rows == 0 {
            return Err(TrainingError::EmptyDataset);
        }
        if y.len() != rows {
            return Err(TrainingError::ShapeMismatch { rows, labels: y.len() });
        }

        let positives = y.iter().filter(|&&v| v == 1).count();
        if positives == 0 || positives == rows {
            return Err(TrainingError::SingleClass);
        }

        let prior = positives as f64 / rows as f64;
        let init_score = (prior / (1.0 - prior)).ln();

        let targets: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();
        let mut raw = vec![init_score; rows];
        let mut residuals = vec![0.0; rows];
        let mut hessians = vec![0.0; rows];
        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut rng = StdRng::seed_from_u64(params.seed);

        for round in 0..params.n_estimators {
            for i in 0..rows {
                let p = sigmoid(raw[i]);
                residuals[i] = targets[i] - p;
                hessians[i] = p * (1.0 - p);
            }

            let tree = RegressionTree::fit(
                x,
                Gradients { residuals: &residuals, hessians: &hessians },
                params.tree_params(),
                &mut rng,
            );

            for (i, row) in x.outer_iter().enumerate() {
                let row = row.to_vec();
                raw[i] += params.learning_rate * tree.predict(&row);
            }

            trees.push(tree);

            if (round + 1) % 50 == 0 {
                log::debug!(
                    "Boosting round {}/{}: deviance {:.5}",
                    round + 1,
                    params.n_estimators,
                    deviance(&targets, &raw)
                );
            }
        }

        Ok(Self { params, n_features, init_score, trees })
    }

    /// Raw additive score (log-odds)
    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.trees
            .iter()
            .fold(self.init_score, |acc, tree| acc + self.params.learning_rate * tree.predict(row))
    }

    /// Probability of the positive (fraud) class, in [0, 1]
    pub fn predict_probability(&self, row: &[f64]) -> f64 {
        sigmoid(self.decision_function(row)).clamp(0.0, 1.0)
    }

    /// Probabilities for every row of a matrix
    pub fn predict_batch(&self, x: ArrayView2<'_, f64>) -> Vec<f64> {
        x.outer_iter()
            .map(|row| self.predict_probability(&row.to_vec()))
            .collect()
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Mean binomial deviance of raw scores against 0/1 targets
fn deviance(targets: &[f64], raw: &[f64]) -> f64 {
    let n = targets.len().max(1) as f64;
    targets
        .iter()
        .zip(raw)
        .map(|(y, f)| {
            // log(1 + e^f) - y*f, written to avoid overflow
            let softplus = if *f > 0.0 { f + (-f).exp().ln_1p() } else { f.exp().ln_1p() };
            softplus - y * f
        })
        .sum::<f64>()
        * 2.0
        / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn small_params() -> BoostingParams {
        BoostingParams {
            n_estimators: 30,
            max_depth: 3,
            min_samples_split: 4,
            min_samples_leaf: 2,
            ..BoostingParams::default()
        }
    }

    /// Label is 1 above the anti-diagonal of a 10x10 grid
    fn grid() -> (Array2<f64>, Vec<u8>) {
        let mut values = Vec::new();
        let mut labels = Vec::new();
        for a in 0..10 {
            for b in 0..10 {
                let (x0, x1) = (a as f64 / 10.0, b as f64 / 10.0);
                values.extend([x0, x1, ((a * 7 + b * 3) % 5) as f64]);
                labels.push(u8::from(a + b > 10));
            }
        }
        (Array2::from_shape_vec((100, 3), values).unwrap(), labels)
    }

    #[test]
    fn test_default_hyperparameters() {
        let params = BoostingParams::default();
        assert_eq!(params.n_estimators, 200);
        assert_eq!(params.learning_rate, 0.1);
        assert_eq!(params.max_depth, 8);
        assert_eq!(params.min_samples_split, 10);
        assert_eq!(params.min_samples_leaf, 4);
        assert_eq!(params.seed, 42);
    }

    #[test]
    fn test_fit_learns_separable_data() {
        let (x, y) = grid();
        let model = GradientBoostedClassifier::fit(small_params(), x.view(), &y).unwrap();
        assert_eq!(model.n_trees(), 30);
        assert_eq!(model.n_features(), 3);

        let probs = model.predict_batch(x.view());
        let correct = probs
            .iter()
            .zip(&y)
            .filter(|(p, label)| u8::from(**p >= 0.5) == **label)
            .count();
        assert!(correct >= 90, "only {correct} of 100 correct");
    }

    #[test]
    fn test_fit_is_reproducible() {
        let (x, y) = grid();
        let a = GradientBoostedClassifier::fit(small_params(), x.view(), &y).unwrap();
        let b = GradientBoostedClassifier::fit(small_params(), x.view(), &y).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_probability_in_unit_interval() {
        let (x, y) = grid();
        let model = GradientBoostedClassifier::fit(small_params(), x.view(), &y).unwrap();
        for row in [[0.0, 0.0, 0.0], [1e9, -1e9, 3.0], [f64::MAX, f64::MAX, f64::MAX]] {
            let p = model.predict_probability(&row);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_prior_only_model() {
        let (x, y) = grid();
        let params = BoostingParams { n_estimators: 0, ..small_params() };
        let model = GradientBoostedClassifier::fit(params, x.view(), &y).unwrap();
        let prior = y.iter().filter(|&&v| v == 1).count() as f64 / y.len() as f64;
        assert!((model.predict_probability(&[0.0, 0.0, 0.0]) - prior).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_rejected() {
        let x = Array2::<f64>::zeros((5, 2));
        let result = GradientBoostedClassifier::fit(small_params(), x.view(), &[0, 0, 0, 0, 0]);
        assert!(matches!(result, Err(TrainingError::SingleClass)));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let x = Array2::<f64>::zeros((5, 2));
        let result = GradientBoostedClassifier::fit(small_params(), x.view(), &[0, 1]);
        assert!(matches!(result, Err(TrainingError::ShapeMismatch { rows: 5, labels: 2 })));
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }
}
