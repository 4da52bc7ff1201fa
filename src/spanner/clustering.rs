//! Randomized multi-phase clustering
//!
//! Baswana-Sen style construction: k-1 rounds of center sampling,
//! nearest-surviving-cluster edge selection and pruning, then a final
//! augmentation pass that connects every still-active vertex to its
//! neighboring surviving clusters.

use rand::Rng;

use crate::graph::{EdgeStatus, MirroredGraph};
use crate::spanner::sampling;

/// Mutable clustering state carried across rounds
///
/// `cluster[v]` is a flat one-level assignment: reassignment overwrites it
/// directly, there are no parent chains to walk.
#[derive(Debug)]
pub struct ClusterState {
    /// Current cluster center of each vertex
    pub cluster: Vec<u32>,

    /// Vertices still taking part in clustering; a vertex deactivated here
    /// is frozen for all later rounds
    pub active: Vec<bool>,

    /// Centers of the clusters still in play
    pub centers: Vec<u32>,

    /// Per-vertex flag: surviving center in the current round
    is_center: Vec<bool>,
}

impl ClusterState {
    /// Every vertex starts active, as the center of its own singleton cluster
    pub fn new(vertex_count: usize) -> Self {
        Self {
            cluster: (0..vertex_count as u32).collect(),
            active: vec![true; vertex_count],
            centers: (0..vertex_count as u32).collect(),
            is_center: vec![false; vertex_count],
        }
    }

    /// One sample / select / commit / prune round
    pub fn run_round<R: Rng + ?Sized>(
        &mut self,
        graph: &mut MirroredGraph,
        k: usize,
        rng: &mut R,
    ) {
        let n = graph.vertex_count();

        // Center sampling. A round without survivors would collapse the
        // clustering entirely, so the first center is forced through then.
        for flag in self.is_center.iter_mut() {
            *flag = false;
        }
        let mut survivors = 0;
        for &center in &self.centers {
            if sampling::survives_round(rng, n, k) {
                self.is_center[center as usize] = true;
                survivors += 1;
            }
        }
        if survivors == 0 {
            if let Some(&first) = self.centers.first() {
                self.is_center[first as usize] = true;
            }
        }

        // Nearest surviving cluster per active vertex outside the surviving
        // clusters. Committed spanner edges still count as connections here;
        // only removed records are skipped.
        let mut chosen: Vec<Option<usize>> = vec![None; n];
        for v in 0..n {
            if !self.active[v] || self.is_center[self.cluster[v] as usize] {
                continue;
            }
            let mut best_weight = u64::MAX;
            for (slot, record) in graph.edges(v).iter().enumerate() {
                if record.status == EdgeStatus::Removed {
                    continue;
                }
                if !self.is_center[self.cluster[record.to as usize] as usize] {
                    continue;
                }
                if record.weight < best_weight {
                    best_weight = record.weight;
                    chosen[v] = Some(slot);
                }
            }
        }

        // Dense index over the round's incoming center list, for per-cluster
        // minimum tracking.
        let mut center_slot: Vec<Option<usize>> = vec![None; n];
        for (idx, &center) in self.centers.iter().enumerate() {
            center_slot[center as usize] = Some(idx);
        }
        let center_count = self.centers.len();

        // Commit/prune decisions are batched and applied after the scan, so
        // every vertex decides against the same snapshot of cluster state.
        let mut to_commit: Vec<(usize, usize)> = Vec::new();
        let mut to_drop: Vec<(usize, usize)> = Vec::new();
        let mut reassign: Vec<(usize, u32)> = Vec::new();

        // Orphaned vertices: no surviving cluster in reach. Keep the cheapest
        // edge into every neighboring cluster, drop the rest, freeze the
        // vertex as a boundary vertex.
        for v in 0..n {
            if !self.active[v] || self.is_center[self.cluster[v] as usize] {
                continue;
            }
            if chosen[v].is_some() {
                continue;
            }
            let mut cheapest: Vec<Option<usize>> = vec![None; center_count];
            for (slot, record) in graph.edges(v).iter().enumerate() {
                if record.status != EdgeStatus::Candidate {
                    continue;
                }
                to_drop.push((v, slot));
                let ci = match center_slot[self.cluster[record.to as usize] as usize] {
                    Some(ci) => ci,
                    None => continue,
                };
                match cheapest[ci] {
                    None => cheapest[ci] = Some(slot),
                    Some(best) if record.weight < graph.edges(v)[best].weight => {
                        cheapest[ci] = Some(slot)
                    }
                    _ => {}
                }
            }
            self.active[v] = false;
            for slot in cheapest.into_iter().flatten() {
                to_commit.push((v, slot));
            }
        }

        // Vertices that found a surviving cluster: commit the chosen edge,
        // keep strictly cheaper detours into other clusters, prune edges
        // dominated by a cheaper parallel route.
        for v in 0..n {
            if !self.active[v] || self.is_center[self.cluster[v] as usize] {
                continue;
            }
            let best_slot = match chosen[v] {
                Some(slot) => slot,
                None => continue,
            };
            let edges = graph.edges(v);
            let target = self.cluster[edges[best_slot].to as usize];
            let chosen_weight = edges[best_slot].weight;
            let target_slot = center_slot[target as usize];

            let mut cheapest: Vec<Option<usize>> = vec![None; center_count];
            let mut undercut = vec![false; center_count];
            for (slot, record) in edges.iter().enumerate() {
                if record.status != EdgeStatus::Candidate {
                    continue;
                }
                if self.cluster[record.to as usize] == target {
                    to_drop.push((v, slot));
                }
                let ci = match center_slot[self.cluster[record.to as usize] as usize] {
                    Some(ci) => ci,
                    None => continue,
                };
                match cheapest[ci] {
                    None => cheapest[ci] = Some(slot),
                    Some(best) if record.weight < edges[best].weight => cheapest[ci] = Some(slot),
                    _ => {}
                }
                if record.weight < chosen_weight && Some(ci) != target_slot {
                    undercut[ci] = true;
                }
            }

            reassign.push((v, target));

            // Strictly cheaper routes into other clusters stay in the
            // spanner; this is what keeps the stretch bound.
            for ci in 0..center_count {
                let slot = match cheapest[ci] {
                    Some(slot) => slot,
                    None => continue,
                };
                if edges[slot].weight >= chosen_weight {
                    continue;
                }
                to_commit.push((v, slot));
            }
            to_commit.push((v, best_slot));

            for (slot, record) in edges.iter().enumerate() {
                if record.status != EdgeStatus::Candidate {
                    continue;
                }
                let ci = match center_slot[self.cluster[record.to as usize] as usize] {
                    Some(ci) => ci,
                    None => continue,
                };
                if undercut[ci] {
                    to_drop.push((v, slot));
                }
            }
        }

        // Commits first: a removal never touches a freshly committed edge.
        for (v, slot) in to_commit {
            graph.mark_spanner(v, slot);
        }
        for (v, slot) in to_drop {
            graph.remove_candidate(v, slot);
        }
        for (v, target) in reassign {
            self.cluster[v] = target;
        }

        // Intra-cluster cleanup: candidates inside a surviving cluster are
        // reachable within the cluster at no stretch cost.
        for v in 0..n {
            if !self.is_center[self.cluster[v] as usize] {
                continue;
            }
            for slot in 0..graph.edges(v).len() {
                let record = graph.edges(v)[slot];
                if record.status != EdgeStatus::Candidate {
                    continue;
                }
                if self.cluster[record.to as usize] != self.cluster[v] {
                    continue;
                }
                graph.remove_candidate(v, slot);
            }
        }

        // The next round works on the surviving centers only.
        self.centers = (0..n as u32)
            .filter(|&v| self.is_center[v as usize])
            .collect();
    }

    /// Post-round augmentation
    ///
    /// Connects every still-active vertex to each neighboring surviving
    /// cluster through its cheapest candidate edge, then retires the other
    /// candidates toward those clusters.
    pub fn augment(&mut self, graph: &mut MirroredGraph) {
        let n = graph.vertex_count();

        let mut center_slot: Vec<Option<usize>> = vec![None; n];
        for (idx, &center) in self.centers.iter().enumerate() {
            center_slot[center as usize] = Some(idx);
        }
        let center_count = self.centers.len();

        let mut to_commit: Vec<(usize, usize)> = Vec::new();
        let mut to_drop: Vec<(usize, usize)> = Vec::new();

        for v in 0..n {
            if !self.active[v] {
                continue;
            }
            let mut cheapest: Vec<Option<usize>> = vec![None; center_count];
            for (slot, record) in graph.edges(v).iter().enumerate() {
                if record.status != EdgeStatus::Candidate {
                    continue;
                }
                let ci = match center_slot[self.cluster[record.to as usize] as usize] {
                    Some(ci) => ci,
                    None => continue,
                };
                to_drop.push((v, slot));
                match cheapest[ci] {
                    None => cheapest[ci] = Some(slot),
                    Some(best) if record.weight < graph.edges(v)[best].weight => {
                        cheapest[ci] = Some(slot)
                    }
                    _ => {}
                }
            }
            for slot in cheapest.into_iter().flatten() {
                to_commit.push((v, slot));
            }
        }

        for (v, slot) in to_commit {
            graph.mark_spanner(v, slot);
        }
        for (v, slot) in to_drop {
            graph.remove_candidate(v, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn triangle() -> MirroredGraph {
        let mut graph = MirroredGraph::new(3);
        graph.add_edge(0, 1, 1);
        graph.add_edge(1, 2, 1);
        graph.add_edge(0, 2, 1);
        graph
    }

    #[test]
    fn forced_survivor_prevents_total_collapse() {
        // Max-value draws never pass the threshold, so sampling alone would
        // leave zero survivors.
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut graph = triangle();
        let mut state = ClusterState::new(3);

        state.run_round(&mut graph, 2, &mut rng);

        assert_eq!(state.centers, vec![0]);
        assert!(state.is_center[0]);
    }

    #[test]
    fn all_surviving_centers_leave_the_round_untouched() {
        // Zero draws always pass the threshold: every cluster survives and
        // no vertex has anything to decide.
        let mut rng = StepRng::new(0, 0);
        let mut graph = triangle();
        let mut state = ClusterState::new(3);

        state.run_round(&mut graph, 2, &mut rng);

        assert_eq!(state.centers, vec![0, 1, 2]);
        assert!(state.active.iter().all(|&a| a));
        for v in 0..3 {
            for record in graph.edges(v) {
                assert_eq!(record.status, EdgeStatus::Candidate);
            }
        }
    }

    #[test]
    fn surviving_centers_keep_themselves_as_cluster() {
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut graph = triangle();
        let mut state = ClusterState::new(3);

        state.run_round(&mut graph, 2, &mut rng);

        // Invariant: cluster[c] == c for every surviving center, and every
        // still-active vertex sits in a surviving cluster.
        for &center in &state.centers {
            assert_eq!(state.cluster[center as usize], center);
        }
        for v in 0..3 {
            if state.active[v] {
                assert!(state.is_center[state.cluster[v] as usize]);
            }
        }
    }

    #[test]
    fn joining_vertices_commit_their_chosen_edge() {
        // Only vertex 0 survives; 1 and 2 must each join cluster 0 through
        // their direct edge to it.
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut graph = triangle();
        let mut state = ClusterState::new(3);

        state.run_round(&mut graph, 2, &mut rng);

        assert_eq!(state.cluster, vec![0, 0, 0]);
        assert_eq!(graph.edges(0)[0].status, EdgeStatus::Spanner);
        assert_eq!(graph.edges(0)[1].status, EdgeStatus::Spanner);
    }
}
