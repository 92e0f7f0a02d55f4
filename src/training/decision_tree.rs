//! Classification decision tree

use crate::error::{ExplainboardError, Result};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::collections::HashMap;

/// Impurity criterion for split selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Gini,
    Entropy,
}

/// Decision tree node
#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        class: f64,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// CART-style classification tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Feature indices eligible for splits; all features when None
    pub feature_subset: Option<Vec<usize>>,
    pub criterion: Criterion,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            feature_subset: None,
            criterion: Criterion::Gini,
            n_features: 0,
            feature_importances: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Fit the tree to labeled data. Labels are class indices stored as f64.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(ExplainboardError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(ExplainboardError::TrainingError(
                "cannot fit a tree on an empty dataset".to_string(),
            ));
        }

        self.n_features = x.ncols();

        let mut importances = vec![0.0; self.n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_node(x, y, &indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn build_node(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let labels: Vec<f64> = indices.iter().map(|&i| y[i]).collect();

        let should_stop = n_samples < self.min_samples_split
            || self.max_depth.map_or(false, |d| depth >= d)
            || is_pure(&labels);

        if should_stop {
            return TreeNode::Leaf {
                class: majority_class(&labels),
            };
        }

        let Some((feature_idx, threshold, gain)) = self.best_split(x, y, indices) else {
            return TreeNode::Leaf {
                class: majority_class(&labels),
            };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature_idx]] <= threshold);

        if left_indices.len() < self.min_samples_leaf || right_indices.len() < self.min_samples_leaf
        {
            return TreeNode::Leaf {
                class: majority_class(&labels),
            };
        }

        importances[feature_idx] += n_samples as f64 * gain;

        let left = Box::new(self.build_node(x, y, &left_indices, depth + 1, importances));
        let right = Box::new(self.build_node(x, y, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx,
            threshold,
            left,
            right,
        }
    }

    /// Scan candidate features in parallel; each returns its best (threshold, gain).
    fn best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
    ) -> Option<(usize, f64, f64)> {
        let candidate_features: Vec<usize> = match &self.feature_subset {
            Some(subset) => subset.iter().copied().filter(|&f| f < self.n_features).collect(),
            None => (0..self.n_features).collect(),
        };

        let labels: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let parent_impurity = self.impurity_of(&labels);

        let candidates: Vec<Option<(usize, f64, f64)>> = candidate_features
            .into_par_iter()
            .map(|feature_idx| {
                let mut values: Vec<f64> =
                    indices.iter().map(|&i| x[[i, feature_idx]]).collect();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                values.dedup();

                let mut best_gain = 0.0f64;
                let mut best_threshold = 0.0f64;

                for window in values.windows(2) {
                    let threshold = (window[0] + window[1]) / 2.0;

                    let mut left_counts: HashMap<i64, usize> = HashMap::new();
                    let mut right_counts: HashMap<i64, usize> = HashMap::new();
                    let mut left_n = 0usize;
                    let mut right_n = 0usize;

                    for &idx in indices {
                        let label = y[idx].round() as i64;
                        if x[[idx, feature_idx]] <= threshold {
                            *left_counts.entry(label).or_insert(0) += 1;
                            left_n += 1;
                        } else {
                            *right_counts.entry(label).or_insert(0) += 1;
                            right_n += 1;
                        }
                    }

                    if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                        continue;
                    }

                    let n = indices.len() as f64;
                    let weighted = (left_n as f64
                        * self.impurity_from_counts(left_n, &left_counts)
                        + right_n as f64 * self.impurity_from_counts(right_n, &right_counts))
                        / n;

                    let gain = parent_impurity - weighted;
                    if gain > best_gain {
                        best_gain = gain;
                        best_threshold = threshold;
                    }
                }

                if best_gain > 0.0 {
                    Some((feature_idx, best_threshold, best_gain))
                } else {
                    None
                }
            })
            .collect();

        candidates
            .into_iter()
            .flatten()
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
    }

    fn impurity_from_counts(&self, n: usize, counts: &HashMap<i64, usize>) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        match self.criterion {
            Criterion::Gini => {
                let mut gini = 1.0;
                for &c in counts.values() {
                    let p = c as f64 / n;
                    gini -= p * p;
                }
                gini
            }
            Criterion::Entropy => {
                let mut entropy = 0.0;
                for &c in counts.values() {
                    if c > 0 {
                        let p = c as f64 / n;
                        entropy -= p * p.ln();
                    }
                }
                entropy
            }
        }
    }

    fn impurity_of(&self, labels: &[f64]) -> f64 {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for &v in labels {
            *counts.entry(v.round() as i64).or_insert(0) += 1;
        }
        self.impurity_from_counts(labels.len(), &counts)
    }

    /// Predicted class label per row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(ExplainboardError::ModelNotFitted)?;

        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| predict_row(root, &x.row(i).to_vec()))
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        self.root.as_ref().map_or(0, walk)
    }
}

fn predict_row(node: &TreeNode, sample: &[f64]) -> f64 {
    match node {
        TreeNode::Leaf { class } => *class,
        TreeNode::Split {
            feature_idx,
            threshold,
            left,
            right,
        } => {
            if sample[*feature_idx] <= *threshold {
                predict_row(left, sample)
            } else {
                predict_row(right, sample)
            }
        }
    }
}

fn is_pure(labels: &[f64]) -> bool {
    labels
        .first()
        .map_or(true, |&first| labels.iter().all(|&v| (v - first).abs() < 1e-10))
}

fn majority_class(labels: &[f64]) -> f64 {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &v in labels {
        *counts.entry(v.round() as i64).or_insert(0) += 1;
    }
    // Ties break toward the lower class index so results are reproducible
    counts
        .into_iter()
        .max_by_key(|&(class, count)| (count, std::cmp::Reverse(class)))
        .map(|(class, _)| class as f64)
        .unwrap_or(0.0)
}
