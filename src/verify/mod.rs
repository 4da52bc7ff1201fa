//! All-pairs stretch verification oracle
//!
//! Independent correctness check for a produced spanner: recompute all-pairs
//! shortest distances on the original graph and on the spanner and compare
//! them against the stretch bound. Cubic in the vertex count, so this is a
//! testing tool for small inputs, never part of the construction path.

use std::collections::HashSet;

use anyhow::Result;
use itertools::iproduct;
use rayon::prelude::*;

use crate::spanner::Spanner;

/// Distance value for unreachable pairs
pub const UNREACHABLE: u64 = u64::MAX;

/// Outcome of a verification run
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// Every spanner edge exists with the same weight in the original graph
    pub is_subgraph: bool,

    /// All pairwise distances are within the stretch bound
    pub stretch_ok: bool,
}

impl VerifyReport {
    /// True when both checks passed
    pub fn passed(&self) -> bool {
        self.is_subgraph && self.stretch_ok
    }
}

/// All-pairs shortest distances by Floyd-Warshall
///
/// Rows are relaxed in parallel for each intermediate vertex. Unreachable
/// pairs stay at `UNREACHABLE`; additions saturate so they never wrap.
pub fn all_pairs_distances(n: usize, edges: &[(u32, u32, u64)]) -> Vec<Vec<u64>> {
    let mut dist = vec![vec![UNREACHABLE; n]; n];
    for v in 0..n {
        dist[v][v] = 0;
    }
    for &(u, v, w) in edges {
        let (u, v) = (u as usize, v as usize);
        if w < dist[u][v] {
            dist[u][v] = w;
            dist[v][u] = w;
        }
    }

    for mid in 0..n {
        let through = dist[mid].clone();
        dist.par_iter_mut().for_each(|row| {
            let to_mid = row[mid];
            if to_mid == UNREACHABLE {
                return;
            }
            for j in 0..n {
                let relaxed = to_mid.saturating_add(through[j]);
                if relaxed < row[j] {
                    row[j] = relaxed;
                }
            }
        });
    }

    dist
}

/// Check that spanner distances stay within `stretch` times the originals
///
/// Pairs unreachable in the original are exempt; pairs reachable in the
/// original must be reachable in the spanner, which covers connectivity
/// preservation as well.
pub fn stretch_within(original: &[Vec<u64>], spanner: &[Vec<u64>], stretch: u32) -> bool {
    let n = original.len();
    iproduct!(0..n, 0..n).all(|(i, j)| {
        if original[i][j] == UNREACHABLE {
            return true;
        }
        spanner[i][j] != UNREACHABLE
            && spanner[i][j] <= original[i][j].saturating_mul(stretch as u64)
    })
}

/// Verify a spanner against the original edge list
pub fn verify_spanner(
    n: usize,
    original_edges: &[(u32, u32, u64)],
    spanner: &Spanner,
    stretch: u32,
) -> Result<VerifyReport> {
    if spanner.vertex_count != n {
        return Err(anyhow::anyhow!(
            "vertex count mismatch: graph has {}, spanner reports {}",
            n,
            spanner.vertex_count
        ));
    }
    if n > 2_000 {
        log::warn!("all-pairs verification is cubic; n = {} will be slow", n);
    }

    let original_set: HashSet<(u32, u32, u64)> = original_edges
        .iter()
        .map(|&(u, v, w)| (u.min(v), u.max(v), w))
        .collect();
    let is_subgraph = spanner
        .edges
        .iter()
        .all(|edge| original_set.contains(&(edge.u, edge.v, edge.weight)));

    let spanner_edges: Vec<(u32, u32, u64)> = spanner
        .edges
        .iter()
        .map(|edge| (edge.u, edge.v, edge.weight))
        .collect();

    let original_dist = all_pairs_distances(n, original_edges);
    let spanner_dist = all_pairs_distances(n, &spanner_edges);
    let stretch_ok = stretch_within(&original_dist, &spanner_dist, stretch);

    Ok(VerifyReport {
        is_subgraph,
        stretch_ok,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spanner::SpannerEdge;

    #[test]
    fn distances_on_a_weighted_triangle() {
        let edges = [(0, 1, 4), (1, 2, 2), (0, 2, 7)];
        let dist = all_pairs_distances(3, &edges);

        assert_eq!(dist[0][0], 0);
        assert_eq!(dist[0][1], 4);
        assert_eq!(dist[0][2], 6);
        assert_eq!(dist[2][0], 6);
    }

    #[test]
    fn unreachable_pairs_stay_unreachable() {
        let edges = [(0, 1, 1)];
        let dist = all_pairs_distances(3, &edges);

        assert_eq!(dist[0][2], UNREACHABLE);
        assert_eq!(dist[2][1], UNREACHABLE);
    }

    #[test]
    fn parallel_edges_keep_the_cheaper_weight() {
        let edges = [(0, 1, 9), (0, 1, 2)];
        let dist = all_pairs_distances(2, &edges);
        assert_eq!(dist[0][1], 2);
    }

    #[test]
    fn stretch_check_flags_a_lost_shortcut() {
        let original = all_pairs_distances(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        // Dropping edge (0, 2) doubles that distance; fine for t = 2,
        // too far for t = 1.
        let pruned = all_pairs_distances(3, &[(0, 1, 1), (1, 2, 1)]);

        assert!(stretch_within(&original, &pruned, 2));
        assert!(!stretch_within(&original, &pruned, 1));
    }

    #[test]
    fn stretch_check_flags_lost_connectivity() {
        let original = all_pairs_distances(2, &[(0, 1, 1)]);
        let empty = all_pairs_distances(2, &[]);
        assert!(!stretch_within(&original, &empty, 10));
    }

    #[test]
    fn subgraph_check_rejects_foreign_edges() {
        let original = [(0, 1, 1), (1, 2, 1)];
        let spanner = Spanner {
            vertex_count: 3,
            edges: vec![SpannerEdge { u: 0, v: 2, weight: 1 }],
        };
        let report = verify_spanner(3, &original, &spanner, 3).unwrap();
        assert!(!report.is_subgraph);
    }

    #[test]
    fn subgraph_check_rejects_reweighted_edges() {
        let original = [(0, 1, 5)];
        let spanner = Spanner {
            vertex_count: 2,
            edges: vec![SpannerEdge { u: 0, v: 1, weight: 1 }],
        };
        let report = verify_spanner(2, &original, &spanner, 3).unwrap();
        assert!(!report.is_subgraph);
    }
}
