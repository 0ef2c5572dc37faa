// Copyright 2025 Lars Brubaker
// License: MIT
//
// Merging strategies.
//
// A strategy has two hooks. The pre-add hook runs during cavity growth and
// keeps a cavity from claiming triangles that already belong to another
// one. The post-insertion hook runs once after all cavities are inserted
// and folds every polygon that is still a bare triangle into a neighbor
// chosen by a `MergingPolicy`.

mod policy;
mod union_find;

pub use policy::{MergeOutcome, MergingPolicy, SharedEdges};
pub use union_find::UnionFindOutputMap;

use smallvec::SmallVec;

use crate::mesh::{FaceIndex, HalfEdgeMesh, OutputIndex};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MergingStrategy {
    /// Pre-add exclusion only.
    #[default]
    ExcludePreviousCavities,
    /// Pre-add exclusion, then merge leftover triangles with the policy.
    MergeTriangles(MergingPolicy),
}

/// Summary of one post-insertion pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Triangles with exactly three edges when they were visited.
    pub triangles: usize,
    pub merged: usize,
    /// Bytes held by the union-find map during the pass.
    pub edge_map_bytes: u64,
}

impl MergingStrategy {
    /// May `face` join the cavity being grown?
    #[inline]
    pub fn pre_add(&self, face: FaceIndex, in_cavity: &[bool]) -> bool {
        !in_cavity[face.idx()]
    }

    pub fn performs_post_insertion(&self) -> bool {
        matches!(self, MergingStrategy::MergeTriangles(policy) if !policy.is_null())
    }

    /// Merge every triangle left among `seeds` into a neighbor. Absorbed
    /// seeds are removed from `seeds`; a seed whose edge was deleted by a
    /// merge is replaced by a live edge of the same polygon.
    pub fn post_insertion(&self, mesh: &mut HalfEdgeMesh, seeds: &mut Vec<OutputIndex>) -> MergeReport {
        let policy = match *self {
            MergingStrategy::MergeTriangles(policy) if !policy.is_null() => policy,
            _ => return MergeReport::default(),
        };

        let mut map = UnionFindOutputMap::from_seeds(mesh, seeds);
        let mut slot = vec![usize::MAX; mesh.edge_slots()];
        for (i, s) in seeds.iter().enumerate() {
            slot[s.idx()] = i;
        }

        let mut report = MergeReport {
            edge_map_bytes: map.memory_usage(),
            ..MergeReport::default()
        };

        for i in 0..seeds.len() {
            let seed = seeds[i];
            if !seed.is_valid() || mesh.output_seed_edge_count(seed) != 3 {
                continue;
            }
            report.triangles += 1;

            let (neighbors, shared) = merge_candidates(mesh, &mut map, seed);
            let Some(outcome) = policy.merge_best_candidate(mesh, seed, &neighbors, &shared) else {
                continue;
            };
            report.merged += 1;

            // The absorbed seed leaves the list first: the representative
            // may be one of its own edges.
            seeds[slot[seed.idx()]] = OutputIndex::INVALID;
            let r = outcome.representative;
            map.unite(seed, r);
            if r != outcome.into {
                map.make_representative(r);
                map.unite(outcome.into, r);
                let into_slot = slot[outcome.into.idx()];
                seeds[into_slot] = r;
                slot[r.idx()] = into_slot;
            }
        }

        seeds.retain(|s| s.is_valid());
        tracing::debug!(
            ?policy,
            triangles = report.triangles,
            merged = report.merged,
            seeds = seeds.len(),
            "merged leftover triangles"
        );
        report
    }
}

/// Neighbor polygons of the triangle `seed` with the triangle's edges along
/// each, in cycle order from `seed`. A neighbor is left out when merging
/// would not give a simple polygon: when it surrounds the triangle, or when
/// the corner between two shared edges has other edges attached.
fn merge_candidates(
    mesh: &HalfEdgeMesh,
    map: &mut UnionFindOutputMap,
    seed: OutputIndex,
) -> (SmallVec<[OutputIndex; 3]>, SmallVec<[SharedEdges; 3]>) {
    let mut neighbors: SmallVec<[OutputIndex; 3]> = SmallVec::new();
    let mut shared: SmallVec<[SharedEdges; 3]> = SmallVec::new();

    for e in mesh.polygon_edges(seed.edge()) {
        if mesh.is_border_edge(e) {
            continue;
        }
        let owner = map.find(mesh.twin(e));
        if !owner.is_valid() {
            continue;
        }
        match neighbors.iter().position(|&n| n == owner) {
            Some(k) => shared[k].push(e),
            None => {
                neighbors.push(owner);
                shared.push(SmallVec::from_slice(&[e]));
            }
        }
    }

    let mut k = 0;
    while k < neighbors.len() {
        let keep = match shared[k].len() {
            1 => true,
            2 => {
                let (a, b) = (shared[k][0], shared[k][1]);
                let corner = if mesh.next(a) == b { mesh.target(a) } else { mesh.target(b) };
                mesh.degree(corner) == 2
            }
            _ => false,
        };
        if keep {
            k += 1;
        } else {
            neighbors.remove(k);
            shared.remove(k);
        }
    }
    (neighbors, shared)
}
