// Copyright 2025 Lars Brubaker
// License: MIT
//
// Merging policies: which neighbor a leftover triangle is merged into.

use smallvec::SmallVec;

use crate::geom::Real;
use crate::mesh::{EdgeIndex, HalfEdgeMesh, OutputIndex};

/// Half-edges of the triangle that border one neighbor polygon.
pub type SharedEdges = SmallVec<[EdgeIndex; 3]>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MergingPolicy {
    /// Never merges.
    #[default]
    Null,
    /// Neighbor with the fewest edges.
    SmallestNeighbor,
    /// Neighbor with the most edges.
    BiggestNeighbor,
    /// Neighbor sharing the longest edge with the triangle.
    LongestEdge,
    /// Neighbor sharing the shortest edge with the triangle.
    ShortestEdge,
    /// First neighbor, in candidate order, whose merge stays convex.
    MaximizeConvexity,
}

/// A merge that was carried out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Seed of the polygon that absorbed the triangle.
    pub into: OutputIndex,
    /// Live seed of the merged polygon. Equals `into` unless that edge was
    /// deleted by the merge.
    pub representative: OutputIndex,
}

impl MergingPolicy {
    pub fn is_null(self) -> bool {
        self == MergingPolicy::Null
    }

    /// Pick a neighbor of `seed` and merge the triangle into it.
    ///
    /// `neighbors[i]` is a candidate polygon seed and `shared[i]` the
    /// triangle's edges along it. Returns `None` when nothing was merged;
    /// the mesh is then unchanged.
    pub fn merge_best_candidate(
        self,
        mesh: &mut HalfEdgeMesh,
        seed: OutputIndex,
        neighbors: &[OutputIndex],
        shared: &[SharedEdges],
    ) -> Option<MergeOutcome> {
        debug_assert_eq!(neighbors.len(), shared.len());
        if neighbors.is_empty() {
            return None;
        }

        let pick = match self {
            MergingPolicy::Null => return None,
            MergingPolicy::MaximizeConvexity => return maximize_convexity(mesh, seed, neighbors, shared),
            MergingPolicy::SmallestNeighbor => {
                best_by(neighbors.len(), |i| mesh.output_seed_edge_count(neighbors[i]) as Real, Better::Lower)
            }
            MergingPolicy::BiggestNeighbor => {
                best_by(neighbors.len(), |i| mesh.output_seed_edge_count(neighbors[i]) as Real, Better::Higher)
            }
            MergingPolicy::LongestEdge => best_by(
                neighbors.len(),
                |i| shared[i].iter().map(|&e| mesh.edge_length2(e)).fold(Real::MIN, Real::max),
                Better::Higher,
            ),
            MergingPolicy::ShortestEdge => best_by(
                neighbors.len(),
                |i| shared[i].iter().map(|&e| mesh.edge_length2(e)).fold(Real::MAX, Real::min),
                Better::Lower,
            ),
        };

        let into = neighbors[pick];
        let backup = mesh.merge_seeds(into, (seed, shared[pick].as_slice()));
        Some(MergeOutcome {
            into,
            representative: backup.merged_seed(),
        })
    }
}

#[derive(Copy, Clone)]
enum Better {
    Lower,
    Higher,
}

/// Index of the candidate with the best score. Only a strictly better
/// score replaces the current pick, so the first candidate wins ties.
fn best_by<F>(n: usize, score: F, better: Better) -> usize
where
    F: Fn(usize) -> Real,
{
    let mut pick = 0;
    let mut best = score(0);
    for i in 1..n {
        let s = score(i);
        let wins = match better {
            Better::Lower => s < best,
            Better::Higher => s > best,
        };
        if wins {
            pick = i;
            best = s;
        }
    }
    pick
}

fn maximize_convexity(
    mesh: &mut HalfEdgeMesh,
    seed: OutputIndex,
    neighbors: &[OutputIndex],
    shared: &[SharedEdges],
) -> Option<MergeOutcome> {
    for (&into, edges) in neighbors.iter().zip(shared) {
        let backup = mesh.merge_seeds(into, (seed, edges.as_slice()));
        let representative = backup.merged_seed();
        if mesh.is_polygon_convex(representative) {
            return Some(MergeOutcome { into, representative });
        }
        mesh.rollback_merge(backup);
    }
    tracing::trace!(seed = ?seed, candidates = neighbors.len(), "no convex merge found");
    None
}
