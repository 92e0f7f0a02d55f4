//! Dataset handling
//!
//! The service runs against a fixed tabular dataset: named numeric feature
//! columns plus one categorical target column, immutable after load. The
//! canonical frame is polars; training consumes ndarray views of it.

mod iris;

pub use iris::{CLASS_NAMES, FEATURE_NAMES, TARGET_NAME};

use crate::error::{ExplainboardError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;

/// A feature table with its target vector
pub struct Dataset {
    df: DataFrame,
    feature_names: Vec<String>,
    target_name: String,
}

impl Dataset {
    /// The embedded iris dataset: 150 rows, 4 features, 3 classes.
    pub fn iris() -> Result<Self> {
        let n = iris::ROWS.len();
        let mut columns: Vec<Column> = FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let values: Vec<f64> = (0..n).map(|i| iris::ROWS[i][j]).collect();
                Series::new((*name).into(), values).into()
            })
            .collect();

        let target: Vec<f64> = (0..n).map(|i| iris::ROWS[i][4]).collect();
        columns.push(Series::new(TARGET_NAME.into(), target).into());

        Self::from_frame(DataFrame::new(columns)?, TARGET_NAME)
    }

    /// Wrap an existing frame, treating every non-target column as a feature.
    pub fn from_frame(df: DataFrame, target_name: &str) -> Result<Self> {
        if df.column(target_name).is_err() {
            return Err(ExplainboardError::DataError(format!(
                "target column '{}' not present",
                target_name
            )));
        }

        let feature_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| name != target_name)
            .collect();

        if feature_names.is_empty() {
            return Err(ExplainboardError::DataError(
                "dataset has no feature columns".to_string(),
            ));
        }

        Ok(Self {
            df,
            feature_names,
            target_name: target_name.to_string(),
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_rows(&self) -> usize {
        self.df.height()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Feature matrix for training, rows in frame order.
    pub fn features(&self) -> Result<Array2<f64>> {
        let n_rows = self.n_rows();
        let n_features = self.n_features();
        let mut x = Array2::zeros((n_rows, n_features));

        for (j, name) in self.feature_names.iter().enumerate() {
            let values = numeric_column(&self.df, name)?;
            for (i, v) in values.into_iter().enumerate() {
                x[[i, j]] = v;
            }
        }

        Ok(x)
    }

    /// Target vector as class labels encoded 0..n_classes.
    pub fn targets(&self) -> Result<Array1<f64>> {
        Ok(Array1::from_vec(numeric_column(
            &self.df,
            &self.target_name,
        )?))
    }

    /// Number of distinct target classes.
    pub fn n_classes(&self) -> Result<usize> {
        let mut labels = numeric_column(&self.df, &self.target_name)?;
        labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        labels.dedup();
        Ok(labels.len())
    }
}

/// Extract a column as f64 values, casting integer columns on the fly.
pub(crate) fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| ExplainboardError::FeatureNotFound(name.to_string()))?;

    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| {
            ExplainboardError::DataError(format!("column '{}' is not numeric: {}", name, e))
        })?;

    let ca = series.f64()?;
    if ca.null_count() > 0 {
        return Err(ExplainboardError::DataError(format!(
            "column '{}' contains nulls",
            name
        )));
    }

    Ok(ca.into_no_null_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iris_shape() {
        let ds = Dataset::iris().unwrap();
        assert_eq!(ds.n_rows(), 150);
        assert_eq!(ds.n_features(), 4);
        assert_eq!(ds.n_classes().unwrap(), 3);
        assert_eq!(ds.feature_names()[0], "sepal_length");
    }

    #[test]
    fn test_iris_is_deterministic() {
        let a = Dataset::iris().unwrap();
        let b = Dataset::iris().unwrap();
        assert_eq!(a.features().unwrap(), b.features().unwrap());
        assert_eq!(a.targets().unwrap(), b.targets().unwrap());
    }

    #[test]
    fn test_targets_are_balanced_classes() {
        let ds = Dataset::iris().unwrap();
        let y = ds.targets().unwrap();
        for class in 0..3 {
            let count = y.iter().filter(|&&v| v == class as f64).count();
            assert_eq!(count, 50, "class {} should have 50 rows", class);
        }
    }

    #[test]
    fn test_missing_target_column() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), vec![1.0, 2.0]).into(),
        ])
        .unwrap();
        assert!(Dataset::from_frame(df, "label").is_err());
    }
}
