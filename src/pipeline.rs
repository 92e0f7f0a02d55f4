//! Startup pipeline: train the model, explain the dataset, build the table
//!
//! Runs once before the server accepts traffic. Every stage failure is
//! fatal — there is nothing to serve without the table.

use crate::dataset::Dataset;
use crate::error::{ExplainboardError, Result};
use crate::explain::{
    AdditivityCheck, AttributionSummary, AttributionTable, CollapsePolicy, ShapExplainer,
};
use crate::training::RandomForest;
use ndarray::{Array1, Array2};
use tracing::info;

/// Knobs for the training and attribution stages
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub seed: u64,
    /// Sampled permutations per explained row
    pub shap_samples: usize,
    pub additivity: AdditivityCheck,
    pub collapse: CollapsePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            seed: 42,
            shap_samples: 64,
            additivity: AdditivityCheck::default(),
            collapse: CollapsePolicy::default(),
        }
    }
}

/// Everything the presentation layer needs, built once at startup
pub struct PipelineOutput {
    pub model: RandomForest,
    pub table: AttributionTable,
    pub summary: AttributionSummary,
}

/// The model-and-attribution builder
pub struct ExplainPipeline {
    config: PipelineConfig,
}

impl ExplainPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Train on the dataset and explain every one of its rows.
    pub fn run(&self, dataset: &Dataset) -> Result<PipelineOutput> {
        let x = dataset.features()?;
        let y = dataset.targets()?;
        self.fit_explain(&x, &y, dataset.feature_names())
    }

    /// Core entry point over raw matrices; validates shapes before training.
    pub fn fit_explain(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        feature_names: &[String],
    ) -> Result<PipelineOutput> {
        if x.nrows() != y.len() {
            return Err(ExplainboardError::ConfigError(format!(
                "feature table has {} rows but target vector has {}",
                x.nrows(),
                y.len()
            )));
        }
        if feature_names.len() != x.ncols() {
            return Err(ExplainboardError::ConfigError(format!(
                "feature table has {} columns but {} names were given",
                x.ncols(),
                feature_names.len()
            )));
        }

        let start = std::time::Instant::now();
        let mut model = RandomForest::new(self.config.n_estimators)
            .with_random_state(self.config.seed);
        if let Some(depth) = self.config.max_depth {
            model = model.with_max_depth(depth);
        }
        model.fit(x, y)?;
        info!(
            trees = model.n_trees(),
            classes = model.n_classes(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "model trained"
        );

        let start = std::time::Instant::now();
        let attributions = ShapExplainer::new(&model, x)
            .with_n_samples(self.config.shap_samples)
            .with_seed(self.config.seed)
            .with_additivity(self.config.additivity)
            .explain(x)?;
        info!(
            rows = attributions.n_rows(),
            samples_per_row = self.config.shap_samples,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "attributions computed"
        );

        let table = AttributionTable::build(&attributions, feature_names, self.config.collapse)?;
        let summary = table.summary()?;

        Ok(PipelineOutput {
            model,
            table,
            summary,
        })
    }
}
