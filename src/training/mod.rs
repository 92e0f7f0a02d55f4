//! Model training module
//!
//! Provides the classifier behind the dashboard: a seeded random forest of
//! CART trees. The model is opaque to downstream code, which only sees the
//! `predict` / `predict_proba` surface.

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::{Criterion, DecisionTree};
pub use random_forest::{MaxFeatures, RandomForest};
