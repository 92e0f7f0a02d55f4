//! Explainboard - Interactive model explanation dashboard
//!
//! Trains a classifier on the embedded iris dataset, computes
//! sampling-based Shapley attributions for every row, and serves the
//! resulting table as an interactive histogram dashboard.
//!
//! # Modules
//!
//! - [`dataset`] - The embedded feature table and target vector
//! - [`training`] - Random forest classifier
//! - [`explain`] - Attribution computation and the collapsed table
//! - [`chart`] - Histogram figures
//! - [`dashboard`] - Selection state machine
//! - [`pipeline`] - Startup builder tying the stages together
//! - [`server`] - HTTP server and embedded web UI

pub mod error;

pub mod dataset;
pub mod training;
pub mod explain;
pub mod chart;
pub mod dashboard;
pub mod pipeline;
pub mod server;

pub use error::{ExplainboardError, Result};
