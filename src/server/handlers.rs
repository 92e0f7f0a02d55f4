//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::chart::Histogram;
use crate::dashboard::Event;

use super::error::{Result, ServerError};
use super::state::AppState;

// ============================================================================
// Feature / Selection Handlers
// ============================================================================

/// Feature column names plus the current selection
pub async fn get_features(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let dashboard = state.dashboard.read().await;

    Json(serde_json::json!({
        "features": state.table.feature_names(),
        "selected": dashboard.selected(),
    }))
}

#[derive(Deserialize)]
pub struct SelectRequest {
    feature: String,
}

/// Change the selected feature and return its histogram
pub async fn select_feature(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<serde_json::Value>> {
    let mut dashboard = state.dashboard.write().await;

    let histogram = dashboard.handle(Event::SelectFeature(request.feature))?;
    info!(feature = %dashboard.selected(), "selection changed");

    Ok(Json(serde_json::json!({
        "selected": dashboard.selected(),
        "histogram": histogram,
    })))
}

/// Histogram for the current selection
pub async fn get_histogram(State(state): State<Arc<AppState>>) -> Result<Json<Histogram>> {
    let dashboard = state.dashboard.read().await;
    Ok(Json(dashboard.current_chart()?))
}

/// Read-only histogram for any feature column, without changing the
/// selection. Unknown names get a 404 rather than a panic: the dropdown is
/// a closed set, but this URL is not.
pub async fn get_histogram_for(
    State(state): State<Arc<AppState>>,
    Path(feature): Path<String>,
) -> Result<Json<Histogram>> {
    if !state.table.has_feature(&feature) {
        return Err(ServerError::NotFound(format!(
            "unknown feature '{}'",
            feature
        )));
    }

    let values = state.table.column(&feature)?;
    Ok(Json(Histogram::from_values(
        &values,
        &format!("SHAP values for {}", feature),
    )))
}

/// Per-feature attribution summary
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "rows": state.table.n_rows(),
        "features": &state.summary.features,
    }))
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// UI Handler
// ============================================================================

pub async fn serve_index() -> Html<&'static str> {
    // Embedded HTML for portability; the page fills the dropdown from the API
    Html(EMBEDDED_INDEX_HTML)
}

const EMBEDDED_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Interactive Model Explanation Dashboard</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js"></script>
    <style>
    :root { --color-bg: #111827; --color-panel: #1f2937; --color-border: #374151; --color-text: #f3f4f6; --color-muted: #9ca3af; --color-accent: #3b82f6; }
    * { box-sizing: border-box; }
    body { font-family: system-ui, sans-serif; margin: 0; background: var(--color-bg); color: var(--color-text); }
    header { background: var(--color-panel); border-bottom: 1px solid var(--color-border); padding: 1rem 1.5rem; }
    h1 { font-size: 1.25rem; margin: 0; }
    main { padding: 1.5rem; max-width: 960px; margin: 0 auto; }
    .card { background: var(--color-panel); border-radius: 8px; padding: 1.5rem; margin-bottom: 1.5rem; }
    label { display: block; font-size: 0.875rem; color: var(--color-muted); margin-bottom: 0.5rem; }
    select { width: 100%; max-width: 320px; background: var(--color-border); color: var(--color-text); border: none; border-radius: 6px; padding: 0.5rem; font-size: 1rem; }
    .summary-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 1rem; }
    .stat { background: var(--color-border); border-radius: 6px; padding: 0.75rem; }
    .stat .value { font-size: 1.25rem; font-weight: bold; color: var(--color-accent); }
    .stat .name { font-size: 0.75rem; color: var(--color-muted); }
    .chart-wrap { position: relative; height: 360px; }
    footer { color: var(--color-muted); font-size: 0.875rem; padding: 0 1.5rem 1.5rem; max-width: 960px; margin: 0 auto; }
    </style>
</head>
<body>
    <header>
        <h1>Model Explanations Dashboard</h1>
    </header>
    <main>
        <div class="card">
            <label for="feature-select">Select Feature to Visualize:</label>
            <select id="feature-select" onchange="selectFeature(this.value)"></select>
        </div>
        <div class="card">
            <div class="chart-wrap"><canvas id="shap-chart"></canvas></div>
        </div>
        <div class="card">
            <label>Mean |SHAP| per feature</label>
            <div id="summary-cards" class="summary-grid"></div>
        </div>
    </main>
    <footer>
        <p><strong>Note</strong>: This dashboard visualizes SHAP values (feature importance) for each
        feature in the dataset, showing how much each feature contributes to the model's prediction.</p>
    </footer>
    <script>
    let chart = null;

    function renderHistogram(h) {
        const labels = [];
        for (let i = 0; i < h.counts.length; i++) {
            labels.push(h.bin_edges[i].toFixed(2) + ' to ' + h.bin_edges[i + 1].toFixed(2));
        }
        const ctx = document.getElementById('shap-chart');
        if (chart) chart.destroy();
        chart = new Chart(ctx, {
            type: 'bar',
            data: {
                labels: labels,
                datasets: [{ label: 'Frequency', data: h.counts, backgroundColor: '#3b82f6', categoryPercentage: 1.0, barPercentage: 0.98 }]
            },
            options: {
                responsive: true,
                maintainAspectRatio: false,
                plugins: { title: { display: true, text: h.title, color: '#f3f4f6' }, legend: { display: false } },
                scales: {
                    x: { ticks: { color: '#9ca3af', maxRotation: 60 }, grid: { display: false } },
                    y: { ticks: { color: '#9ca3af' }, title: { display: true, text: 'Frequency', color: '#9ca3af' } }
                }
            }
        });
    }

    async function loadFeatures() {
        const r = await fetch('/api/features');
        const d = await r.json();
        const sel = document.getElementById('feature-select');
        sel.innerHTML = '';
        for (const f of d.features) {
            const o = document.createElement('option');
            o.value = f;
            o.textContent = f;
            if (f === d.selected) o.selected = true;
            sel.appendChild(o);
        }
    }

    async function loadSummary() {
        const r = await fetch('/api/summary');
        const d = await r.json();
        const wrap = document.getElementById('summary-cards');
        wrap.innerHTML = '';
        for (const f of d.features) {
            const div = document.createElement('div');
            div.className = 'stat';
            div.innerHTML = '<div class="value">' + f.mean_abs.toFixed(4) + '</div><div class="name">' + f.name + '</div>';
            wrap.appendChild(div);
        }
    }

    async function selectFeature(name) {
        const r = await fetch('/api/select', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ feature: name })
        });
        if (!r.ok) { console.error('select failed', await r.text()); return; }
        const d = await r.json();
        renderHistogram(d.histogram);
    }

    async function init() {
        await loadFeatures();
        await loadSummary();
        const r = await fetch('/api/histogram');
        renderHistogram(await r.json());
    }

    init();
    </script>
</body>
</html>"#;
