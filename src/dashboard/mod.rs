//! Selection state machine
//!
//! The presentation loop behind the web page, kept independent of any UI
//! toolkit: a current selection, an event type, and a handler that turns an
//! event into a new chart. Two phases exist — `Idle` (chart matches the
//! selection) and `Rendering` (recomputing after a change) — and the
//! transition through `Rendering` is synchronous, so observers between
//! events always find the loop `Idle`.

use crate::chart::Histogram;
use crate::error::{ExplainboardError, Result};
use crate::explain::AttributionTable;
use std::sync::Arc;

/// Phase of the presentation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rendering,
}

/// User interaction events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectFeature(String),
}

/// The dashboard's mutable state: one selected feature column.
pub struct Dashboard {
    table: Arc<AttributionTable>,
    selected: String,
    phase: Phase,
}

impl Dashboard {
    /// Start with the first feature column selected.
    pub fn new(table: Arc<AttributionTable>) -> Result<Self> {
        let selected = table
            .feature_names()
            .first()
            .cloned()
            .ok_or_else(|| {
                ExplainboardError::ConfigError("attribution table has no features".to_string())
            })?;

        Ok(Self {
            table,
            selected,
            phase: Phase::Idle,
        })
    }

    pub fn table(&self) -> &AttributionTable {
        &self.table
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Chart for the current selection, without changing state.
    pub fn current_chart(&self) -> Result<Histogram> {
        chart_for(&self.table, &self.selected)
    }

    /// Apply one event and return the chart to display.
    ///
    /// Selecting a feature is idempotent: the same selection twice yields
    /// two equal figures. Unknown names are rejected before any state
    /// changes, so a failed event leaves the previous chart valid.
    pub fn handle(&mut self, event: Event) -> Result<Histogram> {
        match event {
            Event::SelectFeature(name) => {
                if !self.table.has_feature(&name) {
                    return Err(ExplainboardError::FeatureNotFound(name));
                }

                self.phase = Phase::Rendering;
                let figure = chart_for(&self.table, &name);
                self.selected = name;
                self.phase = Phase::Idle;
                figure
            }
        }
    }
}

fn chart_for(table: &AttributionTable, feature: &str) -> Result<Histogram> {
    let values = table.column(feature)?;
    Ok(Histogram::from_values(
        &values,
        &format!("SHAP values for {}", feature),
    ))
}
