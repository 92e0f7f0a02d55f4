//! Histogram figures
//!
//! The chart renderer boundary: turns a numeric column into a renderable
//! frequency histogram. The figure is plain data (edges + counts) so the
//! browser side can draw it with any charting library; equal inputs produce
//! equal figures, which is what makes selection idempotence testable.

use serde::Serialize;

const MAX_BINS: usize = 50;

/// A frequency histogram over one column of values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub title: String,
    /// Bin boundaries; `counts.len() + 1` entries
    pub bin_edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Build with the square-root binning rule, clamped to [1, 50] bins.
    pub fn from_values(values: &[f64], title: &str) -> Self {
        let bins = if values.is_empty() {
            1
        } else {
            ((values.len() as f64).sqrt().ceil() as usize).clamp(1, MAX_BINS)
        };
        Self::with_bins(values, title, bins)
    }

    /// Build with an explicit bin count (at least 1).
    pub fn with_bins(values: &[f64], title: &str, bins: usize) -> Self {
        let bins = bins.max(1);

        if values.is_empty() {
            return Self {
                title: title.to_string(),
                bin_edges: Vec::new(),
                counts: Vec::new(),
            };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // A constant column collapses to one unit-width bin around the value.
        if max - min < f64::EPSILON {
            return Self {
                title: title.to_string(),
                bin_edges: vec![min - 0.5, min + 0.5],
                counts: vec![values.len() as u64],
            };
        }

        let width = (max - min) / bins as f64;
        let bin_edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();

        let mut counts = vec![0u64; bins];
        for &v in values {
            // The final bin is closed on the right so max lands inside it.
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self {
            title: title.to_string(),
            bin_edges,
            counts,
        }
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }
}
