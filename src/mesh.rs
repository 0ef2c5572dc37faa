// Copyright 2025 Lars Brubaker
// License: MIT
//
// Planar half-edge mesh.
//
// The mesh is an arena of vertices, half-edges and a face table; every
// reference between elements is an index into one of those Vecs.
//
// Design:
//   - INVALID: u32::MAX in every index type (null reference).
//   - Triangle `f` of a freshly built mesh owns half-edges 3f, 3f+1, 3f+2.
//     Exterior (border) half-edges come after all interior ones and carry
//     the outside face, FaceIndex::INVALID.
//   - Nothing is ever removed from the arenas. A deleted half-edge is
//     tombstoned (origin = INVALID) and a deleted vertex loses its incident
//     edge; slot indices therefore stay stable for the whole run, and the
//     live counts are kept separately.

use std::fmt;

use crate::geom::{Real, Vertex};

mod build;
mod merge;
mod topology;

pub use merge::ConnectivityBackup;

macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub fn new(i: usize) -> Self {
                debug_assert!(i < u32::MAX as usize, "index {} does not fit", i);
                $name(i as u32)
            }

            #[inline]
            pub fn idx(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                } else {
                    f.write_str(concat!(stringify!($name), "(INVALID)"))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

index_type!(
    /// Index into the vertex arena.
    VertexIndex
);
index_type!(
    /// Index into the half-edge arena.
    EdgeIndex
);
index_type!(
    /// Index into the face table. `FaceIndex::INVALID` is the outside face.
    FaceIndex
);
index_type!(
    /// Identifies an output polygon by one of its boundary half-edges.
    OutputIndex
);

impl OutputIndex {
    #[inline]
    pub fn edge(self) -> EdgeIndex {
        EdgeIndex(self.0)
    }
}

impl From<EdgeIndex> for OutputIndex {
    #[inline]
    fn from(e: EdgeIndex) -> Self {
        OutputIndex(e.0)
    }
}

impl From<OutputIndex> for EdgeIndex {
    #[inline]
    fn from(o: OutputIndex) -> Self {
        EdgeIndex(o.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeVertex {
    pub position: Vertex,
    /// Some live half-edge leaving this vertex. INVALID once the vertex
    /// has been removed from the mesh.
    pub incident_half_edge: EdgeIndex,
    pub is_border: bool,
}

impl HeVertex {
    pub fn new(position: Vertex) -> Self {
        Self {
            position,
            incident_half_edge: EdgeIndex::INVALID,
            is_border: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HalfEdge {
    /// Tail vertex. INVALID marks a tombstoned edge.
    pub origin: VertexIndex,
    pub twin: EdgeIndex,
    /// Next edge CCW around `face`.
    pub next: EdgeIndex,
    pub prev: EdgeIndex,
    pub face: FaceIndex,
    /// Set on exterior half-edges (the ones whose face is the outside).
    pub is_border: bool,
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
            origin: VertexIndex::INVALID,
            twin: EdgeIndex::INVALID,
            next: EdgeIndex::INVALID,
            prev: EdgeIndex::INVALID,
            face: FaceIndex::INVALID,
            is_border: false,
        }
    }
}

impl HalfEdge {
    #[inline]
    pub fn is_tombstoned(&self) -> bool {
        !self.origin.is_valid()
    }
}

/// The half-edge mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct HalfEdgeMesh {
    vertices: Vec<HeVertex>,
    half_edges: Vec<HalfEdge>,
    /// Face table: one boundary half-edge per live face.
    polygons: Vec<EdgeIndex>,
    n_vertices: usize,
    n_half_edges: usize,
    n_polygons: usize,
}

impl HalfEdgeMesh {
    /// Assemble a mesh from raw parts. Live counts are derived from the
    /// data: vertices with an incident edge, non-tombstoned half-edges and
    /// valid face-table entries.
    pub fn new(vertices: Vec<HeVertex>, half_edges: Vec<HalfEdge>, polygons: Vec<EdgeIndex>) -> Self {
        let n_vertices = vertices
            .iter()
            .filter(|v| v.incident_half_edge.is_valid())
            .count();
        let n_half_edges = half_edges.iter().filter(|e| !e.is_tombstoned()).count();
        let n_polygons = polygons.iter().filter(|p| p.is_valid()).count();
        Self {
            vertices,
            half_edges,
            polygons,
            n_vertices,
            n_half_edges,
            n_polygons,
        }
    }

    // ─────────────────────────── Accessors ───────────────────────────────

    #[inline]
    #[track_caller]
    pub fn vertex(&self, v: VertexIndex) -> &HeVertex {
        match self.vertices.get(v.idx()) {
            Some(vertex) => vertex,
            None => panic!("vertex {:?} out of range ({} slots)", v, self.vertices.len()),
        }
    }

    #[inline]
    #[track_caller]
    pub fn vertex_mut(&mut self, v: VertexIndex) -> &mut HeVertex {
        let len = self.vertices.len();
        match self.vertices.get_mut(v.idx()) {
            Some(vertex) => vertex,
            None => panic!("vertex {:?} out of range ({} slots)", v, len),
        }
    }

    #[inline]
    #[track_caller]
    pub fn edge(&self, e: EdgeIndex) -> &HalfEdge {
        match self.half_edges.get(e.idx()) {
            Some(edge) => edge,
            None => panic!("half-edge {:?} out of range ({} slots)", e, self.half_edges.len()),
        }
    }

    #[inline]
    #[track_caller]
    pub fn edge_mut(&mut self, e: EdgeIndex) -> &mut HalfEdge {
        let len = self.half_edges.len();
        match self.half_edges.get_mut(e.idx()) {
            Some(edge) => edge,
            None => panic!("half-edge {:?} out of range ({} slots)", e, len),
        }
    }

    /// The half-edge currently registered for `face` in the face table.
    /// INVALID once the face has been absorbed into another polygon.
    #[inline]
    #[track_caller]
    pub fn polygon(&self, face: FaceIndex) -> EdgeIndex {
        match self.polygons.get(face.idx()) {
            Some(&e) => e,
            None => panic!("face {:?} out of range ({} slots)", face, self.polygons.len()),
        }
    }

    #[inline]
    pub fn position(&self, v: VertexIndex) -> Vertex {
        self.vertex(v).position
    }

    pub fn vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_slots(&self) -> usize {
        self.half_edges.len()
    }

    pub fn face_slots(&self) -> usize {
        self.polygons.len()
    }

    pub fn number_of_vertices(&self) -> usize {
        self.n_vertices
    }

    pub fn number_of_edges(&self) -> usize {
        self.n_half_edges
    }

    pub fn number_of_polygons(&self) -> usize {
        self.n_polygons
    }

    pub fn update_vertex_count(&mut self, n: usize) {
        self.n_vertices = n;
    }

    pub fn update_edge_count(&mut self, n: usize) {
        self.n_half_edges = n;
    }

    pub fn update_polygon_count(&mut self, n: usize) {
        self.n_polygons = n;
    }

    /// Approximate heap footprint of the vertex arena, in bytes.
    pub fn vertex_memory(&self) -> u64 {
        (self.vertices.capacity() * std::mem::size_of::<HeVertex>()) as u64
    }

    /// Approximate heap footprint of the half-edge arena and face table, in bytes.
    pub fn edge_memory(&self) -> u64 {
        (self.half_edges.capacity() * std::mem::size_of::<HalfEdge>()
            + self.polygons.capacity() * std::mem::size_of::<EdgeIndex>()) as u64
    }

    // ─────────────────────────── Navigation ──────────────────────────────

    #[inline]
    pub fn origin(&self, e: EdgeIndex) -> VertexIndex {
        self.edge(e).origin
    }

    /// Head vertex of `e` (origin of its twin).
    #[inline]
    pub fn target(&self, e: EdgeIndex) -> VertexIndex {
        self.origin(self.twin(e))
    }

    #[inline]
    pub fn twin(&self, e: EdgeIndex) -> EdgeIndex {
        self.edge(e).twin
    }

    #[inline]
    pub fn next(&self, e: EdgeIndex) -> EdgeIndex {
        self.edge(e).next
    }

    #[inline]
    pub fn prev(&self, e: EdgeIndex) -> EdgeIndex {
        self.edge(e).prev
    }

    #[inline]
    pub fn face(&self, e: EdgeIndex) -> FaceIndex {
        self.edge(e).face
    }

    /// Next edge counter-clockwise around origin(e): twin(prev(e)).
    #[inline]
    pub fn ccw_edge_to_vertex(&self, e: EdgeIndex) -> EdgeIndex {
        self.twin(self.prev(e))
    }

    /// Next edge clockwise around origin(e): next(twin(e)).
    #[inline]
    pub fn cw_edge_to_vertex(&self, e: EdgeIndex) -> EdgeIndex {
        self.next(self.twin(e))
    }

    #[inline]
    pub fn edge_of_vertex(&self, v: VertexIndex) -> EdgeIndex {
        self.vertex(v).incident_half_edge
    }

    #[inline]
    pub fn is_live_edge(&self, e: EdgeIndex) -> bool {
        e.is_valid() && !self.edge(e).is_tombstoned()
    }

    /// Squared length of `e`.
    pub fn edge_length2(&self, e: EdgeIndex) -> Real {
        let a = self.position(self.origin(e));
        let b = self.position(self.target(e));
        a.dist2(b)
    }

    // ──────────────────────────── Setters ────────────────────────────────
    //
    // Raw field writes. None of them checks invariants; a caller issuing a
    // batch of them owns leaving the mesh consistent afterwards.

    #[inline]
    pub fn set_next(&mut self, e: EdgeIndex, next: EdgeIndex) {
        self.edge_mut(e).next = next;
    }

    #[inline]
    pub fn set_prev(&mut self, e: EdgeIndex, prev: EdgeIndex) {
        self.edge_mut(e).prev = prev;
    }

    #[inline]
    pub fn set_twin(&mut self, e: EdgeIndex, twin: EdgeIndex) {
        self.edge_mut(e).twin = twin;
    }

    #[inline]
    pub fn set_origin(&mut self, e: EdgeIndex, origin: VertexIndex) {
        self.edge_mut(e).origin = origin;
    }

    /// Assign `face` to half-edge `e`.
    #[inline]
    pub fn set_face_to_edge(&mut self, e: EdgeIndex, face: FaceIndex) {
        self.edge_mut(e).face = face;
    }

    /// Register `e` as the identifying half-edge of `face`.
    #[inline]
    #[track_caller]
    pub fn set_edge_to_face(&mut self, face: FaceIndex, e: EdgeIndex) {
        let len = self.polygons.len();
        match self.polygons.get_mut(face.idx()) {
            Some(slot) => *slot = e,
            None => panic!("face {:?} out of range ({} slots)", face, len),
        }
    }

    #[inline]
    pub fn set_incident_edge(&mut self, v: VertexIndex, e: EdgeIndex) {
        self.vertex_mut(v).incident_half_edge = e;
    }

    /// Tombstone `e` and drop it from the live edge count. Tombstoning an
    /// already dead edge is a no-op.
    pub fn tombstone_edge(&mut self, e: EdgeIndex) {
        let edge = self.edge_mut(e);
        if edge.is_tombstoned() {
            return;
        }
        edge.origin = VertexIndex::INVALID;
        self.n_half_edges -= 1;
    }

    /// Detach `v` from the mesh and drop it from the live vertex count.
    pub fn remove_vertex(&mut self, v: VertexIndex) {
        let vertex = self.vertex_mut(v);
        if !vertex.incident_half_edge.is_valid() {
            return;
        }
        vertex.incident_half_edge = EdgeIndex::INVALID;
        self.n_vertices -= 1;
    }

    /// Clear the face-table entry of `face` and drop it from the live
    /// polygon count.
    pub fn retire_face(&mut self, face: FaceIndex) {
        if !self.polygon(face).is_valid() {
            return;
        }
        self.set_edge_to_face(face, EdgeIndex::INVALID);
        self.n_polygons -= 1;
    }
}
