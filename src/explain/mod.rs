//! Attribution computation
//!
//! Produces per-row, per-feature, per-class attribution values with
//! per-row, per-class baselines, then collapses the class axis into the
//! single table the dashboard serves. The collapse rule and the additivity
//! handling are explicit policies, not hard-coded behavior.

mod shap;
mod table;

pub use shap::{AdditivityCheck, ClassAttributions, ShapExplainer};
pub use table::{
    AttributionSummary, AttributionTable, ClassCollapse, CollapsePolicy, FeatureSummary,
    OUTPUT_COLUMN,
};
