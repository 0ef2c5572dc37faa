// Copyright 2025 Lars Brubaker
// Shared fixtures and invariant checks for cavity-mesh tests.

#![allow(dead_code)]

use std::collections::HashSet;

use cavity_mesh::{EdgeIndex, FaceIndex, HalfEdgeMesh, OutputIndex, Vertex};

pub fn points(coords: &[(f64, f64)]) -> Vec<Vertex> {
    coords.iter().map(|&(x, y)| Vertex::new(x, y)).collect()
}

/// Unit square split along its rising diagonal.
pub fn square() -> HalfEdgeMesh {
    HalfEdgeMesh::from_triangles(
        points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]),
        &[[0, 1, 3], [0, 3, 2]],
    )
    .unwrap()
}

/// n x n grid of unit cells, each split along its rising diagonal.
/// Cell (i, j) holds triangles 2(jn + i) and 2(jn + i) + 1.
pub fn grid(n: usize) -> HalfEdgeMesh {
    jittered_grid(n, &[])
}

/// Grid whose interior points are moved by `offsets`, cycled over the
/// interior points in order. Offset components must stay below 0.25 in
/// magnitude to keep every triangle counter-clockwise.
pub fn jittered_grid(n: usize, offsets: &[(f64, f64)]) -> HalfEdgeMesh {
    let w = n + 1;
    let mut pts = Vec::with_capacity(w * w);
    let mut k = 0;
    for j in 0..w {
        for i in 0..w {
            let (mut x, mut y) = (i as f64, j as f64);
            let interior = i > 0 && j > 0 && i < n && j < n;
            if interior && !offsets.is_empty() {
                let (dx, dy) = offsets[k % offsets.len()];
                x += dx;
                y += dy;
                k += 1;
            }
            pts.push(Vertex::new(x, y));
        }
    }
    let mut tris = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let a = j * w + i;
            tris.push([a, a + 1, a + w + 1]);
            tris.push([a, a + w + 1, a + w]);
        }
    }
    HalfEdgeMesh::from_triangles(pts, &tris).unwrap()
}

/// Seven triangles fanned around p4 = (1, 1), which sits on the border.
///
/// Triangles 0 and 1 form the unit square A (p0 p1 p4 p3). Triangle 2 is
/// the lone triangle T (p1 p2 p4). Triangles 3..=6 form the hexagon B
/// (p4 p2 p5 p6 p7 p8). T shares edge p2-p4 (length^2 2) with B and edge
/// p1-p4 (length^2 1) with A.
pub fn merge_fixture() -> HalfEdgeMesh {
    HalfEdgeMesh::from_triangles(
        points(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (3.0, 0.0),
            (4.0, 1.0),
            (3.0, 2.0),
            (0.5, 2.0),
        ]),
        &[
            [0, 1, 4],
            [0, 4, 3],
            [1, 2, 4],
            [4, 2, 5],
            [4, 5, 6],
            [4, 6, 7],
            [4, 7, 8],
        ],
    )
    .unwrap()
}

pub fn faces(ids: &[usize]) -> Vec<FaceIndex> {
    ids.iter().map(|&i| FaceIndex::new(i)).collect()
}

/// Every live interior half-edge belongs to exactly one seed polygon.
pub fn assert_partition(mesh: &HalfEdgeMesh, seeds: &[OutputIndex]) {
    let mut claimed: HashSet<EdgeIndex> = HashSet::new();
    for &seed in seeds {
        assert!(mesh.is_live_edge(seed.edge()), "seed {:?} is not live", seed);
        for e in mesh.polygon_edges(seed.edge()) {
            assert!(claimed.insert(e), "edge {:?} claimed twice", e);
        }
    }
    let live: HashSet<EdgeIndex> = (0..mesh.edge_slots())
        .map(EdgeIndex::new)
        .filter(|&e| mesh.is_live_edge(e) && !mesh.edge(e).is_border)
        .collect();
    assert_eq!(claimed, live, "seed polygons do not cover the live edges");
    assert_eq!(seeds.len(), mesh.number_of_polygons());
}

/// Shoelace area of the polygon identified by `seed`.
pub fn polygon_area(mesh: &HalfEdgeMesh, seed: OutputIndex) -> f64 {
    let pts: Vec<Vertex> = mesh
        .polygon_vertices(seed.edge())
        .into_iter()
        .map(|v| mesh.position(v))
        .collect();
    let n = pts.len();
    0.5 * (0..n)
        .map(|i| {
            let (a, b) = (pts[i], pts[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
}

pub fn total_area(mesh: &HalfEdgeMesh, seeds: &[OutputIndex]) -> f64 {
    seeds.iter().map(|&s| polygon_area(mesh, s)).sum()
}

/// Half-edges of polygon `from` whose twins lie on polygon `into`.
pub fn shared_edges(mesh: &HalfEdgeMesh, from: OutputIndex, into: OutputIndex) -> Vec<EdgeIndex> {
    let target = mesh.face(into.edge());
    mesh.polygon_edges(from.edge())
        .into_iter()
        .filter(|&e| mesh.face(mesh.twin(e)) == target)
        .collect()
}
