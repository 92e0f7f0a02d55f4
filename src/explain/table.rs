//! Collapsing per-class attributions into the served table

use super::shap::ClassAttributions;
use crate::dataset::numeric_column;
use crate::error::{ExplainboardError, Result};
use ndarray::Axis;
use polars::prelude::*;
use serde::Serialize;

/// Name of the derived column holding baseline + row attribution sum
pub const OUTPUT_COLUMN: &str = "output";

/// How to remove the class axis from a per-class quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassCollapse {
    Mean,
    Sum,
}

impl ClassCollapse {
    fn apply(self, values: impl Iterator<Item = f64>) -> f64 {
        let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        match self {
            ClassCollapse::Sum => sum,
            ClassCollapse::Mean => {
                if count == 0 {
                    0.0
                } else {
                    sum / count as f64
                }
            }
        }
    }
}

/// Collapse policy for attributions and baselines.
///
/// The default keeps the historical asymmetry — attributions averaged
/// across classes, baselines summed — as an explicit choice rather than a
/// hard-coded one. Both axes are independently configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapsePolicy {
    pub attributions: ClassCollapse,
    pub baselines: ClassCollapse,
}

impl Default for CollapsePolicy {
    fn default() -> Self {
        Self {
            attributions: ClassCollapse::Mean,
            baselines: ClassCollapse::Sum,
        }
    }
}

/// The row-indexed attribution table served by the dashboard: one numeric
/// column per feature plus the derived output column. Immutable once built.
pub struct AttributionTable {
    df: DataFrame,
    feature_names: Vec<String>,
}

impl AttributionTable {
    /// Collapse raw attributions into the final table.
    ///
    /// Invariant, by construction:
    /// `output[row] == baseline[row] + sum(attribution[row, :])`.
    pub fn build(
        attributions: &ClassAttributions,
        feature_names: &[String],
        policy: CollapsePolicy,
    ) -> Result<Self> {
        let n_rows = attributions.n_rows();
        let n_features = attributions.n_features();

        if feature_names.len() != n_features {
            return Err(ExplainboardError::ShapeError {
                expected: format!("{} feature names", n_features),
                actual: format!("{} feature names", feature_names.len()),
            });
        }
        if feature_names.iter().any(|n| n == OUTPUT_COLUMN) {
            return Err(ExplainboardError::ConfigError(format!(
                "'{}' is reserved for the derived column",
                OUTPUT_COLUMN
            )));
        }

        let mut collapsed = vec![vec![0.0; n_rows]; n_features];
        for i in 0..n_rows {
            for j in 0..n_features {
                let per_class = attributions
                    .values
                    .index_axis(Axis(0), i)
                    .index_axis(Axis(0), j)
                    .to_owned();
                collapsed[j][i] = policy.attributions.apply(per_class.iter().copied());
            }
        }

        let output: Vec<f64> = (0..n_rows)
            .map(|i| {
                let baseline = policy
                    .baselines
                    .apply(attributions.base_values.row(i).iter().copied());
                let row_sum: f64 = collapsed.iter().map(|col| col[i]).sum();
                baseline + row_sum
            })
            .collect();

        let mut columns: Vec<Column> = feature_names
            .iter()
            .zip(collapsed)
            .map(|(name, values)| Series::new(name.as_str().into(), values).into())
            .collect();
        columns.push(Series::new(OUTPUT_COLUMN.into(), output).into());

        Ok(Self {
            df: DataFrame::new(columns)?,
            feature_names: feature_names.to_vec(),
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.feature_names.iter().any(|n| n == name)
    }

    pub fn n_rows(&self) -> usize {
        self.df.height()
    }

    /// Feature columns plus the output column
    pub fn n_columns(&self) -> usize {
        self.df.width()
    }

    /// Values of one table column (features or the output column).
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        numeric_column(&self.df, name)
    }

    pub fn output(&self) -> Result<Vec<f64>> {
        self.column(OUTPUT_COLUMN)
    }

    /// Per-feature distribution summary of the collapsed attributions.
    pub fn summary(&self) -> Result<AttributionSummary> {
        let features = self
            .feature_names
            .iter()
            .map(|name| {
                let values = self.column(name)?;
                let n = values.len().max(1) as f64;
                Ok(FeatureSummary {
                    name: name.clone(),
                    mean: values.iter().sum::<f64>() / n,
                    mean_abs: values.iter().map(|v| v.abs()).sum::<f64>() / n,
                    min: values.iter().copied().fold(f64::INFINITY, f64::min),
                    max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(AttributionSummary { features })
    }
}

/// Distribution summary for one feature column
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub name: String,
    pub mean: f64,
    pub mean_abs: f64,
    pub min: f64,
    pub max: f64,
}

/// Summary over all feature columns, ordered as the table's columns
#[derive(Debug, Clone, Serialize)]
pub struct AttributionSummary {
    pub features: Vec<FeatureSummary>,
}

impl AttributionSummary {
    /// Features ranked by mean absolute attribution, strongest first
    pub fn ranking(&self) -> Vec<&FeatureSummary> {
        let mut ranked: Vec<&FeatureSummary> = self.features.iter().collect();
        ranked.sort_by(|a, b| {
            b.mean_abs
                .partial_cmp(&a.mean_abs)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    fn sample_attributions() -> ClassAttributions {
        // 2 rows, 2 features, 2 classes with easily checked numbers
        let mut values = Array3::zeros((2, 2, 2));
        // row 0: feature a -> [1.0, 3.0], feature b -> [2.0, 4.0]
        values[[0, 0, 0]] = 1.0;
        values[[0, 0, 1]] = 3.0;
        values[[0, 1, 0]] = 2.0;
        values[[0, 1, 1]] = 4.0;
        // row 1: feature a -> [-1.0, 1.0], feature b -> [0.5, 0.5]
        values[[1, 0, 0]] = -1.0;
        values[[1, 0, 1]] = 1.0;
        values[[1, 1, 0]] = 0.5;
        values[[1, 1, 1]] = 0.5;

        let base_values = Array2::from_shape_vec((2, 2), vec![0.25, 0.75, 0.25, 0.75]).unwrap();

        ClassAttributions { values, base_values }
    }

    fn names() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_default_policy_numbers() {
        let table =
            AttributionTable::build(&sample_attributions(), &names(), CollapsePolicy::default())
                .unwrap();

        // Mean across classes for attribution values
        assert_eq!(table.column("a").unwrap(), vec![2.0, 0.0]);
        assert_eq!(table.column("b").unwrap(), vec![3.0, 0.5]);
        // Sum across classes for baselines: 1.0; output = 1.0 + row sum
        assert_eq!(table.output().unwrap(), vec![6.0, 1.5]);
    }

    #[test]
    fn test_sum_sum_policy() {
        let policy = CollapsePolicy {
            attributions: ClassCollapse::Sum,
            baselines: ClassCollapse::Sum,
        };
        let table = AttributionTable::build(&sample_attributions(), &names(), policy).unwrap();

        assert_eq!(table.column("a").unwrap(), vec![4.0, 0.0]);
        assert_eq!(table.column("b").unwrap(), vec![6.0, 1.0]);
        assert_eq!(table.output().unwrap(), vec![11.0, 2.0]);
    }

    #[test]
    fn test_output_invariant() {
        let table =
            AttributionTable::build(&sample_attributions(), &names(), CollapsePolicy::default())
                .unwrap();

        let output = table.output().unwrap();
        let a = table.column("a").unwrap();
        let b = table.column("b").unwrap();
        for i in 0..table.n_rows() {
            let baseline = 1.0; // sum of [0.25, 0.75]
            assert!((output[i] - (baseline + a[i] + b[i])).abs() < 1e-9);
        }
    }

    #[test]
    fn test_shape() {
        let table =
            AttributionTable::build(&sample_attributions(), &names(), CollapsePolicy::default())
                .unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_columns(), 3); // 2 features + output
        assert!(table.has_feature("a"));
        assert!(!table.has_feature(OUTPUT_COLUMN));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let table =
            AttributionTable::build(&sample_attributions(), &names(), CollapsePolicy::default())
                .unwrap();
        assert!(matches!(
            table.column("missing"),
            Err(ExplainboardError::FeatureNotFound(_))
        ));
    }

    #[test]
    fn test_reserved_name_rejected() {
        let bad_names = vec!["a".to_string(), OUTPUT_COLUMN.to_string()];
        assert!(AttributionTable::build(
            &sample_attributions(),
            &bad_names,
            CollapsePolicy::default()
        )
        .is_err());
    }

    #[test]
    fn test_summary_ranking() {
        let table =
            AttributionTable::build(&sample_attributions(), &names(), CollapsePolicy::default())
                .unwrap();
        let summary = table.summary().unwrap();

        assert_eq!(summary.features.len(), 2);
        let ranked = summary.ranking();
        assert_eq!(ranked[0].name, "b"); // mean_abs 1.75 vs 1.0
        assert!((ranked[0].mean_abs - 1.75).abs() < 1e-12);
    }
}
