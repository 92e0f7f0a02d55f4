//! Sampling-based Shapley attributions
//!
//! Monte Carlo permutation sampling over a background dataset, one marginal
//! contribution per feature per drawn permutation. Each model evaluation
//! returns the full class-probability vector, so one pass fills every class
//! slice of the output at once.

use crate::error::{ExplainboardError, Result};
use crate::training::RandomForest;
use ndarray::{Array1, Array2, Array3, Axis};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::warn;

/// What to do when summed attributions plus baseline disagree with the
/// model's actual output for a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdditivityCheck {
    /// Accept silently (the historical behavior).
    Off,
    /// Accept, but log a warning with the violation count.
    Warn { tolerance: f64 },
    /// Fail the explanation.
    Enforce { tolerance: f64 },
}

impl Default for AdditivityCheck {
    fn default() -> Self {
        // Sampling attributions carry Monte Carlo error, so the default
        // tolerance is loose relative to probability outputs.
        AdditivityCheck::Warn { tolerance: 0.15 }
    }
}

/// Raw attribution output: per-row, per-feature, per-class values plus
/// per-row, per-class baselines.
#[derive(Debug, Clone)]
pub struct ClassAttributions {
    /// Shape (rows, features, classes)
    pub values: Array3<f64>,
    /// Shape (rows, classes); constant down each column by construction
    pub base_values: Array2<f64>,
}

impl ClassAttributions {
    pub fn n_rows(&self) -> usize {
        self.values.shape()[0]
    }

    pub fn n_features(&self) -> usize {
        self.values.shape()[1]
    }

    pub fn n_classes(&self) -> usize {
        self.values.shape()[2]
    }
}

/// Permutation-sampling explainer over a fitted forest
pub struct ShapExplainer<'a> {
    model: &'a RandomForest,
    background: &'a Array2<f64>,
    n_samples: usize,
    seed: u64,
    additivity: AdditivityCheck,
}

impl<'a> ShapExplainer<'a> {
    pub fn new(model: &'a RandomForest, background: &'a Array2<f64>) -> Self {
        Self {
            model,
            background,
            n_samples: 64,
            seed: 0,
            additivity: AdditivityCheck::default(),
        }
    }

    /// Number of sampled permutations per explained row
    pub fn with_n_samples(mut self, n: usize) -> Self {
        self.n_samples = n.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_additivity(mut self, additivity: AdditivityCheck) -> Self {
        self.additivity = additivity;
        self
    }

    /// Explain every row of `x`.
    ///
    /// Deterministic for a fixed seed: each row derives its own RNG from the
    /// base seed and the row index, independent of thread scheduling.
    pub fn explain(&self, x: &Array2<f64>) -> Result<ClassAttributions> {
        if self.background.nrows() == 0 {
            return Err(ExplainboardError::ExplainError(
                "background dataset is empty".to_string(),
            ));
        }
        if x.ncols() != self.background.ncols() {
            return Err(ExplainboardError::ShapeError {
                expected: format!("{} feature columns", self.background.ncols()),
                actual: format!("{} feature columns", x.ncols()),
            });
        }

        let n_rows = x.nrows();
        let n_features = x.ncols();
        let n_classes = self.model.n_classes();

        // Baseline: expected class probabilities over the background.
        let bg_proba = self.model.predict_proba(self.background)?;
        let base: Array1<f64> = bg_proba.mean_axis(Axis(0)).ok_or_else(|| {
            ExplainboardError::ExplainError("background produced no predictions".to_string())
        })?;

        let per_row: Result<Vec<Array2<f64>>> = (0..n_rows)
            .into_par_iter()
            .map(|row_idx| self.explain_row(x, row_idx, n_features, n_classes))
            .collect();
        let per_row = per_row?;

        let mut values = Array3::zeros((n_rows, n_features, n_classes));
        for (i, contrib) in per_row.into_iter().enumerate() {
            values.index_axis_mut(Axis(0), i).assign(&contrib);
        }

        let mut base_values = Array2::zeros((n_rows, n_classes));
        for mut row in base_values.rows_mut() {
            row.assign(&base);
        }

        let attributions = ClassAttributions { values, base_values };
        self.check_additivity(x, &attributions)?;

        Ok(attributions)
    }

    /// Contributions for one row, shape (features, classes).
    fn explain_row(
        &self,
        x: &Array2<f64>,
        row_idx: usize,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Array2<f64>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(row_idx as u64));
        let mut contrib = Array2::<f64>::zeros((n_features, n_classes));

        for _ in 0..self.n_samples {
            let mut perm: Vec<usize> = (0..n_features).collect();
            perm.shuffle(&mut rng);

            let bg_idx = rng.gen_range(0..self.background.nrows());
            let mut hybrid = self.background.row(bg_idx).to_owned();
            let mut prev = self.proba_of(&hybrid)?;

            for &feature_idx in &perm {
                hybrid[feature_idx] = x[[row_idx, feature_idx]];
                let next = self.proba_of(&hybrid)?;

                for class_idx in 0..n_classes {
                    contrib[[feature_idx, class_idx]] += next[class_idx] - prev[class_idx];
                }
                prev = next;
            }
        }

        contrib /= self.n_samples as f64;
        Ok(contrib)
    }

    fn proba_of(&self, row: &Array1<f64>) -> Result<Array1<f64>> {
        let as_matrix = row.clone().insert_axis(Axis(0));
        let proba = self.model.predict_proba(&as_matrix)?;
        Ok(proba.row(0).to_owned())
    }

    fn check_additivity(&self, x: &Array2<f64>, attributions: &ClassAttributions) -> Result<()> {
        let tolerance = match self.additivity {
            AdditivityCheck::Off => return Ok(()),
            AdditivityCheck::Warn { tolerance } | AdditivityCheck::Enforce { tolerance } => {
                tolerance
            }
        };

        let predicted = self.model.predict_proba(x)?;
        let mut violations = 0usize;
        let mut worst = 0.0f64;

        for i in 0..attributions.n_rows() {
            for c in 0..attributions.n_classes() {
                let reconstructed = attributions.base_values[[i, c]]
                    + attributions
                        .values
                        .index_axis(Axis(0), i)
                        .index_axis(Axis(1), c)
                        .sum();
                let gap = (predicted[[i, c]] - reconstructed).abs();
                if gap > tolerance {
                    violations += 1;
                    worst = worst.max(gap);
                }
            }
        }

        if violations == 0 {
            return Ok(());
        }

        match self.additivity {
            AdditivityCheck::Enforce { .. } => Err(ExplainboardError::ExplainError(format!(
                "additivity check failed for {} row/class pairs (worst gap {:.4}, tolerance {})",
                violations, worst, tolerance
            ))),
            _ => {
                warn!(
                    violations,
                    worst_gap = worst,
                    tolerance,
                    "attributions do not reconstruct model output within tolerance"
                );
                Ok(())
            }
        }
    }
}
