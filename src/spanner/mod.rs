//! Spanner construction module

pub mod clustering;
pub mod metrics;
pub mod sampling;

use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::{EdgeStatus, MirroredGraph};
use clustering::ClusterState;

/// An edge of the finished spanner, in canonical orientation (u < v)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpannerEdge {
    pub u: u32,
    pub v: u32,
    pub weight: u64,
}

/// The computed spanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spanner {
    /// Vertex count of the underlying graph
    pub vertex_count: usize,

    /// Surviving edges, each reported exactly once
    pub edges: Vec<SpannerEdge>,
}

/// Build a t-spanner of `graph` in place and collect the surviving edges
///
/// Runs k-1 clustering rounds followed by one augmentation pass, with
/// k = (t+1)/2. The caller owns the random source, so handing in a seeded
/// generator makes the whole construction deterministic.
pub fn build_spanner<R: Rng + ?Sized>(
    graph: &mut MirroredGraph,
    stretch: u32,
    rng: &mut R,
) -> Spanner {
    let k = ((stretch as u64 + 1) / 2) as usize;
    let mut state = ClusterState::new(graph.vertex_count());

    let clustering_start = Instant::now();
    for round in 1..k {
        state.run_round(graph, k, rng);
        log::debug!(
            "round {}/{}: {} surviving centers",
            round,
            k - 1,
            state.centers.len()
        );
    }
    log::debug!("clustering phase took {:.2?}", clustering_start.elapsed());

    let augment_start = Instant::now();
    state.augment(graph);
    log::debug!("augmentation phase took {:.2?}", augment_start.elapsed());

    collect_spanner(graph)
}

/// Scan the synchronized edge store once and emit the spanner edges
///
/// Each logical edge is reported exactly once, keyed by canonical
/// orientation: only the record whose far endpoint id is larger counts.
pub fn collect_spanner(graph: &MirroredGraph) -> Spanner {
    let mut edges = Vec::new();
    for u in 0..graph.vertex_count() {
        for record in graph.edges(u) {
            if (record.to as usize) <= u {
                continue;
            }
            if record.status != EdgeStatus::Spanner {
                continue;
            }
            edges.push(SpannerEdge {
                u: u as u32,
                v: record.to,
                weight: record.weight,
            });
        }
    }

    Spanner {
        vertex_count: graph.vertex_count(),
        edges,
    }
}
