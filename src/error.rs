// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error types for mesh construction, validation and refinement.

use thiserror::Error;

use crate::mesh::{EdgeIndex, FaceIndex, VertexIndex};

/// Errors raised while building or validating a `HalfEdgeMesh`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// A triangle references a point that does not exist.
    #[error("triangle {triangle} references vertex {vertex}, but only {count} vertices exist")]
    VertexOutOfRange {
        triangle: usize,
        vertex: usize,
        count: usize,
    },
    /// A triangle repeats one of its corners.
    #[error("triangle {triangle} repeats a vertex")]
    DegenerateTriangle { triangle: usize },
    /// The same directed edge appears in two triangles.
    #[error("directed edge {from} -> {to} is used by more than one triangle")]
    NonManifoldEdge { from: usize, to: usize },
    /// A vertex has more than one outgoing border edge.
    #[error("vertex {vertex} is pinched: it has more than one outgoing border edge")]
    NonManifoldVertex { vertex: usize },
    /// `twin(twin(e)) != e` for a live edge.
    #[error("twin of edge {edge:?} does not point back to it")]
    BrokenTwin { edge: EdgeIndex },
    /// `next(prev(e)) != e` or `prev(next(e)) != e` for a live edge.
    #[error("next/prev links around edge {edge:?} are inconsistent")]
    BrokenCycle { edge: EdgeIndex },
    /// A live edge links to a tombstoned one.
    #[error("live edge {edge:?} links to tombstoned edge {dead:?}")]
    DanglingLink { edge: EdgeIndex, dead: EdgeIndex },
    /// Edges on one boundary cycle disagree about their face.
    #[error("edge {edge:?} has face {found:?} but its cycle belongs to face {expected:?}")]
    FaceMismatch {
        edge: EdgeIndex,
        expected: FaceIndex,
        found: FaceIndex,
    },
    /// A live vertex points at a tombstoned or foreign incident edge.
    #[error("vertex {vertex:?} has an invalid incident half-edge")]
    BadIncidentEdge { vertex: VertexIndex },
}

/// Errors returned by a mesh refiner.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RefineError {
    /// The input contains a face that is not a triangle.
    #[error("input mesh is not a triangulation: face {face:?} has {edges} edges")]
    NotATriangulation { face: FaceIndex, edges: usize },
    /// The input mesh failed validation.
    #[error("input mesh is invalid: {0}")]
    InvalidMesh(#[from] MeshError),
}
