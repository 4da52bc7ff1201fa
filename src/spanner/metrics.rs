//! Spanner summary statistics

use serde::{Deserialize, Serialize};

use crate::spanner::Spanner;

/// Size and sparsity figures for a finished construction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpannerSummary {
    /// Vertices in the input graph
    pub vertex_count: usize,

    /// Edges in the input graph
    pub original_edge_count: usize,

    /// Edges kept in the spanner
    pub spanner_edge_count: usize,

    /// Kept / original edge ratio (1.0 for an edgeless input)
    pub retention: f64,

    /// Stretch parameter the spanner was built for
    pub stretch: u32,

    /// Sampling depth k = (t+1)/2
    pub k: usize,

    /// n^(1+1/k), the expected-size yardstick for a k-level construction
    pub expected_size_bound: f64,
}

impl SpannerSummary {
    /// Compute the summary for a finished spanner
    pub fn compute(original_edge_count: usize, spanner: &Spanner, stretch: u32) -> Self {
        let n = spanner.vertex_count;
        let k = ((stretch as u64 + 1) / 2) as usize;
        // k = 0 runs no clustering at all; the quadratic bound is the honest
        // ceiling there.
        let exponent = if k == 0 { 2.0 } else { 1.0 + 1.0 / k as f64 };
        let retention = if original_edge_count == 0 {
            1.0
        } else {
            spanner.edges.len() as f64 / original_edge_count as f64
        };

        Self {
            vertex_count: n,
            original_edge_count,
            spanner_edge_count: spanner.edges.len(),
            retention,
            stretch,
            k,
            expected_size_bound: (n as f64).powf(exponent),
        }
    }
}
