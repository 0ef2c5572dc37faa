// Copyright 2025 Lars Brubaker
// License: MIT
//
// Read-only topology queries and invariant checks on `HalfEdgeMesh`.

use smallvec::SmallVec;

use super::{EdgeIndex, FaceIndex, HalfEdgeMesh, OutputIndex, VertexIndex};
use crate::error::MeshError;
use crate::geom::Vertex;

impl HalfEdgeMesh {
    // ──────────────────────────── Triangles ──────────────────────────────

    /// The three half-edges of triangle `face`, CCW from its face-table edge.
    pub fn edges_of_triangle(&self, face: FaceIndex) -> [EdgeIndex; 3] {
        let e0 = self.polygon(face);
        let e1 = self.next(e0);
        let e2 = self.next(e1);
        [e0, e1, e2]
    }

    pub fn vertex_indices_of_triangle(&self, face: FaceIndex) -> [VertexIndex; 3] {
        self.edges_of_triangle(face).map(|e| self.origin(e))
    }

    pub fn vertices_of_triangle(&self, face: FaceIndex) -> [Vertex; 3] {
        self.vertex_indices_of_triangle(face).map(|v| self.position(v))
    }

    /// Triangles across the non-border edges of `face`.
    pub fn neighbors(&self, face: FaceIndex) -> SmallVec<[FaceIndex; 3]> {
        self.edges_of_triangle(face)
            .iter()
            .map(|&e| self.twin(e))
            .filter(|&t| !self.edge(t).is_border)
            .map(|t| self.face(t))
            .collect()
    }

    // ───────────────────────────── Border ────────────────────────────────

    /// True if `e` or its twin lies on the outside face.
    pub fn is_border_edge(&self, e: EdgeIndex) -> bool {
        self.edge(e).is_border || self.edge(self.twin(e)).is_border
    }

    /// True if the polygon containing `e` touches the outside.
    pub fn is_border_face(&self, e: EdgeIndex) -> bool {
        self.polygon_edges(e).into_iter().any(|h| self.is_border_edge(h))
    }

    pub fn is_border_vertex(&self, v: VertexIndex) -> bool {
        self.vertex(v).is_border
    }

    // ───────────────────────────── Sharing ───────────────────────────────

    /// The half-edge of `f1` whose twin belongs to `f2`, if any.
    pub fn shared_edge(&self, f1: FaceIndex, f2: FaceIndex) -> Option<EdgeIndex> {
        let start = self.polygon(f1);
        self.polygon_edges(start)
            .into_iter()
            .find(|&e| self.face(self.twin(e)) == f2)
    }

    /// Faces on either side of `e`: (face(e), face(twin(e))).
    pub fn faces_of_edge(&self, e: EdgeIndex) -> (FaceIndex, FaceIndex) {
        (self.face(e), self.face(self.twin(e)))
    }

    /// Number of half-edges leaving `v`.
    #[track_caller]
    pub fn degree(&self, v: VertexIndex) -> usize {
        let start = self.edge_of_vertex(v);
        assert!(start.is_valid(), "vertex {:?} is not part of the mesh", v);
        let mut e = start;
        let mut n = 0;
        loop {
            n += 1;
            e = self.cw_edge_to_vertex(e);
            if e == start {
                return n;
            }
            assert!(n <= self.edge_slots(), "fan around {:?} does not close", v);
        }
    }

    // ──────────────────────────── Polygons ───────────────────────────────

    /// Boundary cycle of the polygon containing `seed`, starting at `seed`.
    #[track_caller]
    pub fn polygon_edges(&self, seed: EdgeIndex) -> Vec<EdgeIndex> {
        assert!(self.is_live_edge(seed), "{:?} is not a live half-edge", seed);
        let mut out = Vec::with_capacity(4);
        let mut e = seed;
        loop {
            out.push(e);
            e = self.next(e);
            if e == seed {
                return out;
            }
            assert!(out.len() <= self.edge_slots(), "cycle from {:?} does not close", seed);
        }
    }

    pub fn polygon_vertices(&self, seed: EdgeIndex) -> Vec<VertexIndex> {
        self.polygon_edges(seed)
            .into_iter()
            .map(|e| self.origin(e))
            .collect()
    }

    /// Number of boundary half-edges of the polygon identified by `seed`.
    pub fn output_seed_edge_count(&self, seed: OutputIndex) -> usize {
        self.polygon_edges(seed.edge()).len()
    }

    /// True if no two turns along the polygon's boundary have opposite
    /// signs. Collinear runs are accepted.
    pub fn is_polygon_convex(&self, seed: OutputIndex) -> bool {
        let pts: Vec<Vertex> = self
            .polygon_vertices(seed.edge())
            .into_iter()
            .map(|v| self.position(v))
            .collect();
        let n = pts.len();
        let mut pos = false;
        let mut neg = false;
        for i in 0..n {
            let turn = pts[i].cross2d(pts[(i + 1) % n], pts[(i + 2) % n]);
            if turn > 0.0 {
                pos = true;
            } else if turn < 0.0 {
                neg = true;
            }
            if pos && neg {
                return false;
            }
        }
        true
    }

    /// First live face whose cycle is not a triangle, with its edge count.
    pub fn first_non_triangle(&self) -> Option<(FaceIndex, usize)> {
        self.polygons
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_valid())
            .map(|(f, &e)| (FaceIndex::new(f), self.polygon_edges(e).len()))
            .find(|&(_, n)| n != 3)
    }

    pub fn is_triangulation(&self) -> bool {
        self.first_non_triangle().is_none()
    }

    // ──────────────────────────── Validation ─────────────────────────────

    /// Check the structural invariants over every live element.
    pub fn validate(&self) -> Result<(), MeshError> {
        for (i, edge) in self.half_edges.iter().enumerate() {
            if edge.is_tombstoned() {
                continue;
            }
            let e = EdgeIndex::new(i);
            for link in [edge.twin, edge.next, edge.prev] {
                if !self.is_live_edge(link) {
                    return Err(MeshError::DanglingLink { edge: e, dead: link });
                }
            }
            if self.twin(edge.twin) != e {
                return Err(MeshError::BrokenTwin { edge: e });
            }
            if self.prev(edge.next) != e || self.next(edge.prev) != e {
                return Err(MeshError::BrokenCycle { edge: e });
            }
            if self.origin(edge.next) != self.origin(edge.twin) {
                return Err(MeshError::BrokenCycle { edge: e });
            }
            let found = self.face(edge.next);
            if found != edge.face {
                return Err(MeshError::FaceMismatch {
                    edge: edge.next,
                    expected: edge.face,
                    found,
                });
            }
        }

        for (i, vertex) in self.vertices.iter().enumerate() {
            let e = vertex.incident_half_edge;
            if !e.is_valid() {
                continue;
            }
            let v = VertexIndex::new(i);
            if e.idx() >= self.edge_slots() || !self.is_live_edge(e) || self.origin(e) != v {
                return Err(MeshError::BadIncidentEdge { vertex: v });
            }
        }

        for (f, &e) in self.polygons.iter().enumerate() {
            if !e.is_valid() {
                continue;
            }
            let face = FaceIndex::new(f);
            if !self.is_live_edge(e) {
                return Err(MeshError::DanglingLink {
                    edge: e,
                    dead: e,
                });
            }
            if self.face(e) != face {
                return Err(MeshError::FaceMismatch {
                    edge: e,
                    expected: face,
                    found: self.face(e),
                });
            }
        }
        Ok(())
    }
}
