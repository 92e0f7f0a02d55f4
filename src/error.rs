//! Error types for the explainboard service

use thiserror::Error;

/// Result type alias for explainboard operations
pub type Result<T> = std::result::Result<T, ExplainboardError>;

/// Main error type for the explainboard crate
#[derive(Error, Debug)]
pub enum ExplainboardError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Explanation error: {0}")]
    ExplainError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for ExplainboardError {
    fn from(err: polars::error::PolarsError) -> Self {
        ExplainboardError::DataError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ExplainboardError {
    fn from(err: ndarray::ShapeError) -> Self {
        ExplainboardError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExplainboardError::FeatureNotFound("petal_area".to_string());
        assert_eq!(err.to_string(), "Feature not found: petal_area");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExplainboardError = io_err.into();
        assert!(matches!(err, ExplainboardError::IoError(_)));
    }
}
