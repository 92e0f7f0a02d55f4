//! Application state

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::explain::{AttributionSummary, AttributionTable};
use crate::pipeline::PipelineOutput;

use super::ServerConfig;

/// State shared across handlers.
///
/// The attribution table and summary are immutable after startup; the only
/// mutable piece is the dashboard's selection, and its handler is the only
/// writer.
pub struct AppState {
    pub config: ServerConfig,
    pub table: Arc<AttributionTable>,
    pub summary: AttributionSummary,
    pub dashboard: RwLock<Dashboard>,
}

impl AppState {
    pub fn new(config: ServerConfig, output: PipelineOutput) -> Result<Self> {
        let table = Arc::new(output.table);
        let dashboard = Dashboard::new(Arc::clone(&table))?;

        Ok(Self {
            config,
            table,
            summary: output.summary,
            dashboard: RwLock::new(dashboard),
        })
    }
}
