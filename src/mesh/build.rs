// Copyright 2025 Lars Brubaker
// License: MIT
//
// Construction of a half-edge mesh from an indexed triangle list.

use std::collections::HashMap;

use super::{EdgeIndex, FaceIndex, HalfEdge, HalfEdgeMesh, HeVertex, VertexIndex};
use crate::error::MeshError;
use crate::geom::{triangle_area2, Vertex};

impl HalfEdgeMesh {
    /// Build a mesh from points and triangles given as point indices.
    ///
    /// Clockwise triangles are flipped to counter-clockwise. Every
    /// interior half-edge without a partner gets an exterior twin on the
    /// outside face; exterior half-edges are chained into closed border
    /// loops. Points not used by any triangle stay in the arena but are
    /// not counted as live vertices.
    pub fn from_triangles(points: Vec<Vertex>, triangles: &[[usize; 3]]) -> Result<Self, MeshError> {
        let n_points = points.len();
        let mut half_edges: Vec<HalfEdge> = Vec::with_capacity(triangles.len() * 4);
        let mut directed: HashMap<(u32, u32), EdgeIndex> = HashMap::with_capacity(triangles.len() * 3);

        for (t, tri) in triangles.iter().enumerate() {
            for &v in tri {
                if v >= n_points {
                    return Err(MeshError::VertexOutOfRange {
                        triangle: t,
                        vertex: v,
                        count: n_points,
                    });
                }
            }
            let [a, mut b, mut c] = *tri;
            if a == b || b == c || a == c {
                return Err(MeshError::DegenerateTriangle { triangle: t });
            }
            if triangle_area2(points[a], points[b], points[c]) < 0.0 {
                std::mem::swap(&mut b, &mut c);
            }

            let base = half_edges.len();
            let corners = [a, b, c];
            for k in 0..3 {
                let from = corners[k];
                let to = corners[(k + 1) % 3];
                let e = EdgeIndex::new(base + k);
                if directed.insert((from as u32, to as u32), e).is_some() {
                    return Err(MeshError::NonManifoldEdge { from, to });
                }
                half_edges.push(HalfEdge {
                    origin: VertexIndex::new(from),
                    twin: EdgeIndex::INVALID,
                    next: EdgeIndex::new(base + (k + 1) % 3),
                    prev: EdgeIndex::new(base + (k + 2) % 3),
                    face: FaceIndex::new(t),
                    is_border: false,
                });
            }
        }

        let mut vertices: Vec<HeVertex> = points.into_iter().map(HeVertex::new).collect();
        let n_interior = half_edges.len();

        for i in 0..n_interior {
            let from = half_edges[i].origin;
            let to = half_edges[half_edges[i].next.idx()].origin;
            if let Some(&twin) = directed.get(&(to.0, from.0)) {
                half_edges[i].twin = twin;
            }
            let v = &mut vertices[from.idx()];
            if !v.incident_half_edge.is_valid() {
                v.incident_half_edge = EdgeIndex::new(i);
            }
        }

        // Exterior half-edges, one per unpaired interior half-edge.
        let mut border_out: HashMap<u32, EdgeIndex> = HashMap::new();
        for i in 0..n_interior {
            if half_edges[i].twin.is_valid() {
                continue;
            }
            let inner = EdgeIndex::new(i);
            let outer = EdgeIndex::new(half_edges.len());
            let origin = half_edges[half_edges[i].next.idx()].origin;
            half_edges[i].twin = outer;
            half_edges.push(HalfEdge {
                origin,
                twin: inner,
                next: EdgeIndex::INVALID,
                prev: EdgeIndex::INVALID,
                face: FaceIndex::INVALID,
                is_border: true,
            });
            if border_out.insert(origin.0, outer).is_some() {
                return Err(MeshError::NonManifoldVertex { vertex: origin.idx() });
            }
            vertices[origin.idx()].is_border = true;
        }

        for i in n_interior..half_edges.len() {
            let target = half_edges[half_edges[i].twin.idx()].origin;
            let next = *border_out
                .get(&target.0)
                .ok_or(MeshError::NonManifoldVertex { vertex: target.idx() })?;
            half_edges[i].next = next;
            half_edges[next.idx()].prev = EdgeIndex::new(i);
        }

        let polygons = (0..triangles.len()).map(|t| EdgeIndex::new(3 * t)).collect();
        let mesh = HalfEdgeMesh::new(vertices, half_edges, polygons);

        tracing::debug!(
            vertices = mesh.number_of_vertices(),
            half_edges = mesh.number_of_edges(),
            border_half_edges = mesh.edge_slots() - n_interior,
            triangles = mesh.number_of_polygons(),
            "built half-edge mesh"
        );
        Ok(mesh)
    }
}
