// Copyright 2025 Lars Brubaker
// License: MIT
//
// Directed union-find over half-edges: maps every boundary edge of an
// output polygon to the seed that currently represents the polygon.

use crate::mesh::{EdgeIndex, HalfEdgeMesh, OutputIndex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionFindOutputMap {
    parent: Vec<OutputIndex>,
}

impl UnionFindOutputMap {
    /// Map every edge of every polygon in `seeds` to its seed. Edges not on
    /// any seed polygon stay unmapped.
    pub fn from_seeds(mesh: &HalfEdgeMesh, seeds: &[OutputIndex]) -> Self {
        let mut parent = vec![OutputIndex::INVALID; mesh.edge_slots()];
        for &seed in seeds {
            if !seed.is_valid() {
                continue;
            }
            for e in mesh.polygon_edges(seed.edge()) {
                parent[e.idx()] = seed;
            }
        }
        Self { parent }
    }

    /// Current representative of the polygon holding `e`, or INVALID if
    /// `e` was never mapped. Compresses the path it walks.
    pub fn find(&mut self, e: EdgeIndex) -> OutputIndex {
        let mut root = self.parent[e.idx()];
        if !root.is_valid() {
            return root;
        }
        while self.parent[root.idx()] != root {
            root = self.parent[root.idx()];
        }
        let mut cur = OutputIndex::from(e);
        while cur != root {
            let up = self.parent[cur.idx()];
            self.parent[cur.idx()] = root;
            cur = up;
        }
        root
    }

    /// Point `target` at `representative`. No balancing: the caller picks
    /// the winner.
    pub fn unite(&mut self, target: OutputIndex, representative: OutputIndex) {
        self.parent[target.idx()] = representative;
    }

    /// Make `seed` a root.
    pub fn make_representative(&mut self, seed: OutputIndex) {
        self.parent[seed.idx()] = seed;
    }

    pub fn is_representative(&self, seed: OutputIndex) -> bool {
        self.parent[seed.idx()] == seed
    }

    pub fn memory_usage(&self) -> u64 {
        (self.parent.capacity() * std::mem::size_of::<OutputIndex>()) as u64
    }
}
