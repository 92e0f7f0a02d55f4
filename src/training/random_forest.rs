//! Random forest classifier

use super::decision_tree::{Criterion, DecisionTree};
use crate::error::{ExplainboardError, Result};
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashMap;

/// Strategy for the number of features scanned per split
#[derive(Debug, Clone, Copy)]
pub enum MaxFeatures {
    /// Square root of the feature count
    Sqrt,
    /// Fixed number
    Fixed(usize),
    /// All features
    All,
}

/// Bagged ensemble of classification trees
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub criterion: Criterion,
    pub random_state: u64,
    n_features: usize,
    classes: Vec<f64>,
    feature_importances: Option<Array1<f64>>,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            criterion: Criterion::Gini,
            random_state: 42,
            n_features: 0,
            classes: Vec::new(),
            feature_importances: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    fn resolve_max_features(&self, n_features: usize) -> usize {
        let n = match self.max_features {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Fixed(n) => n.min(n_features),
            MaxFeatures::All => n_features,
        };
        n.max(1)
    }

    /// Fit the forest. Deterministic for a fixed `random_state`: each tree
    /// derives its own seed from the base seed and its index, so the result
    /// does not depend on thread scheduling.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(ExplainboardError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        self.n_features = n_features;

        let mut classes: Vec<f64> = y.iter().copied().collect();
        classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        classes.dedup();
        self.classes = classes;

        let max_features = self.resolve_max_features(n_features);
        let base_seed = self.random_state;

        let trees: Result<Vec<DecisionTree>> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                let sample_indices: Vec<usize> = if self.bootstrap {
                    (0..n_samples)
                        .map(|_| (rng.next_u64() as usize) % n_samples)
                        .collect()
                } else {
                    (0..n_samples).collect()
                };

                let x_boot = x.select(ndarray::Axis(0), &sample_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = DecisionTree::new()
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf)
                    .with_criterion(self.criterion);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }

                // Random subspace per tree
                if max_features < n_features {
                    let mut subset: Vec<usize> = (0..n_features).collect();
                    subset.shuffle(&mut rng);
                    subset.truncate(max_features);
                    subset.sort_unstable();
                    tree.feature_subset = Some(subset);
                }

                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        self.compute_feature_importances();

        Ok(self)
    }

    fn compute_feature_importances(&mut self) {
        if self.trees.is_empty() {
            return;
        }

        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (i, &v) in imp.iter().enumerate() {
                    total[i] += v;
                }
            }
        }

        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            for v in &mut total {
                *v /= sum;
            }
        }
        self.feature_importances = Some(Array1::from_vec(total));
    }

    /// Majority-vote class prediction per row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;

        let predictions: Vec<f64> = proba
            .rows()
            .into_iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(idx, _)| idx)
                    .unwrap_or(0);
                self.classes[best]
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Class probabilities as vote fractions, rows x classes
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if self.trees.is_empty() {
            return Err(ExplainboardError::ModelNotFitted);
        }

        let per_tree: Result<Vec<Array1<f64>>> =
            self.trees.par_iter().map(|tree| tree.predict(x)).collect();
        let per_tree = per_tree?;

        let n_samples = x.nrows();
        let n_classes = self.classes.len();
        let class_index: HashMap<i64, usize> = self
            .classes
            .iter()
            .enumerate()
            .map(|(idx, &c)| (c.round() as i64, idx))
            .collect();

        let mut proba = Array2::zeros((n_samples, n_classes));
        for votes in &per_tree {
            for i in 0..n_samples {
                if let Some(&j) = class_index.get(&(votes[i].round() as i64)) {
                    proba[[i, j]] += 1.0;
                }
            }
        }
        proba /= per_tree.len() as f64;

        Ok(proba)
    }

    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn three_blob_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [0.0, 0.1],
            [0.2, 0.0],
            [0.1, 0.2],
            [0.0, 0.0],
            [5.0, 5.1],
            [5.2, 5.0],
            [5.1, 5.2],
            [5.0, 5.0],
            [10.0, 0.1],
            [10.2, 0.0],
            [10.1, 0.2],
            [10.0, 0.0],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0];
        (x, y)
    }

    #[test]
    fn test_three_class_accuracy() {
        let (x, y) = three_blob_data();
        let mut forest = RandomForest::new(25).with_random_state(42);
        forest.fit(&x, &y).unwrap();

        let predictions = forest.predict(&x).unwrap();
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(p, a)| (*p - *a).abs() < 0.5)
            .count();
        assert!(correct >= 11, "only {}/12 correct", correct);
    }

    #[test]
    fn test_proba_rows_sum_to_one() {
        let (x, y) = three_blob_data();
        let mut forest = RandomForest::new(15).with_random_state(7);
        forest.fit(&x, &y).unwrap();

        let proba = forest.predict_proba(&x).unwrap();
        assert_eq!(proba.ncols(), 3);
        for row in proba.rows() {
            let sum: f64 = row.sum();
            assert!((sum - 1.0).abs() < 1e-9, "row sums to {}", sum);
        }
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let (x, y) = three_blob_data();

        let mut a = RandomForest::new(20).with_random_state(42);
        a.fit(&x, &y).unwrap();
        let mut b = RandomForest::new(20).with_random_state(42);
        b.fit(&x, &y).unwrap();

        assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![0.0];

        let mut forest = RandomForest::new(5);
        assert!(matches!(
            forest.fit(&x, &y),
            Err(ExplainboardError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_predict_before_fit() {
        let forest = RandomForest::new(5);
        let x = array![[1.0, 2.0]];
        assert!(matches!(
            forest.predict(&x),
            Err(ExplainboardError::ModelNotFitted)
        ));
    }
}
