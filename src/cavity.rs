// Copyright 2025 Lars Brubaker
// License: MIT
//
// Delaunay cavity growth.
//
// A cavity starts at a seed triangle and floods outward through every
// neighbor whose circumcircle strictly contains the seed's circumcenter.
// Seeds are taken in comparator order; a triangle belongs to at most one
// cavity, and triangles no seed reaches become cavities of their own.

use std::collections::VecDeque;

use crate::criteria::SelectionCriterion;
use crate::geom::Vertex;
use crate::merging::MergingStrategy;
use crate::mesh::{EdgeIndex, FaceIndex, HalfEdgeMesh};

/// One grown region of triangles, destined to become a single polygon.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cavity {
    pub all_triangles: Vec<FaceIndex>,
    /// Triangles whose three neighbors are all in the cavity.
    pub interior: Vec<FaceIndex>,
    pub boundary_triangles: Vec<FaceIndex>,
    /// Half-edges of boundary triangles whose twin is outside the cavity
    /// or on the mesh border.
    pub boundary_edges: Vec<EdgeIndex>,
}

impl Cavity {
    /// Build a cavity from an explicit triangle set.
    pub fn from_triangles(mesh: &HalfEdgeMesh, triangles: &[FaceIndex]) -> Self {
        let mut sorted = triangles.to_vec();
        sorted.sort_unstable();
        Self::partition(mesh, triangles.to_vec(), |f| sorted.binary_search(&f).is_ok())
    }

    pub fn singleton(mesh: &HalfEdgeMesh, face: FaceIndex) -> Self {
        Self {
            all_triangles: vec![face],
            interior: Vec::new(),
            boundary_triangles: vec![face],
            boundary_edges: mesh.edges_of_triangle(face).to_vec(),
        }
    }

    fn partition<F>(mesh: &HalfEdgeMesh, all_triangles: Vec<FaceIndex>, member: F) -> Self
    where
        F: Fn(FaceIndex) -> bool,
    {
        let mut cavity = Cavity {
            all_triangles,
            ..Cavity::default()
        };
        for &t in &cavity.all_triangles {
            let before = cavity.boundary_edges.len();
            for e in mesh.edges_of_triangle(t) {
                if mesh.is_border_edge(e) || !member(mesh.face(mesh.twin(e))) {
                    cavity.boundary_edges.push(e);
                }
            }
            if cavity.boundary_edges.len() == before {
                cavity.interior.push(t);
            } else {
                cavity.boundary_triangles.push(t);
            }
        }
        cavity
    }

    pub fn len(&self) -> usize {
        self.all_triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_triangles.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.all_triangles.len() == 1
    }

    /// Heap bytes held by this cavity's lists.
    pub fn memory_usage(&self) -> u64 {
        let faces = self.all_triangles.capacity() + self.interior.capacity() + self.boundary_triangles.capacity();
        (std::mem::size_of::<Cavity>()
            + faces * std::mem::size_of::<FaceIndex>()
            + self.boundary_edges.capacity() * std::mem::size_of::<EdgeIndex>()) as u64
    }
}

/// Circumcenter of every face in `order`, paired with the face. `None`
/// marks a triangle whose circumcircle does not exist.
pub fn compute_circumcenters(mesh: &HalfEdgeMesh, order: &[FaceIndex]) -> Vec<(Option<Vertex>, FaceIndex)> {
    order
        .iter()
        .map(|&f| {
            let [a, b, c] = mesh.vertices_of_triangle(f);
            (Vertex::circumcenter(a, b, c), f)
        })
        .collect()
}

/// BFS state reused across all cavities of one run.
pub struct CavityWalker<'a> {
    mesh: &'a HalfEdgeMesh,
    visited: Vec<bool>,
    queue: VecDeque<FaceIndex>,
}

impl<'a> CavityWalker<'a> {
    pub fn new(mesh: &'a HalfEdgeMesh) -> Self {
        Self {
            mesh,
            visited: vec![false; mesh.face_slots()],
            queue: VecDeque::new(),
        }
    }

    /// Grow one cavity from `seed`. `accept` is consulted for every
    /// candidate neighbor before the in-circle test. With no center the
    /// cavity is the seed alone.
    pub fn grow<F>(&mut self, seed: FaceIndex, center: Option<Vertex>, accept: F) -> Cavity
    where
        F: Fn(FaceIndex) -> bool,
    {
        let mesh = self.mesh;
        let mut members = vec![seed];
        self.visited[seed.idx()] = true;

        if let Some(center) = center {
            self.queue.push_back(seed);
            while let Some(t) = self.queue.pop_front() {
                for n in mesh.neighbors(t) {
                    if self.visited[n.idx()] || !accept(n) {
                        continue;
                    }
                    let [a, b, c] = mesh.vertices_of_triangle(n);
                    if Vertex::in_circle(a, b, c, center) {
                        self.visited[n.idx()] = true;
                        members.push(n);
                        self.queue.push_back(n);
                    }
                }
            }
        }

        let visited = &self.visited;
        let cavity = Cavity::partition(mesh, members, |f| visited[f.idx()]);
        for &t in &cavity.all_triangles {
            self.visited[t.idx()] = false;
        }
        cavity
    }

    /// Grow cavities from `circumcenters` in order.
    ///
    /// A seed is skipped when it is already claimed, when the strategy's
    /// pre-add hook rejects it, or when `criterion` does not select it.
    /// Triangles left unclaimed afterwards become singleton cavities.
    /// `in_cavity` is updated for every claimed triangle.
    pub fn compute_cavities(
        &mut self,
        circumcenters: &[(Option<Vertex>, FaceIndex)],
        in_cavity: &mut [bool],
        criterion: &SelectionCriterion,
        strategy: &MergingStrategy,
    ) -> Vec<Cavity> {
        let mesh = self.mesh;
        let mut cavities = Vec::new();
        let mut degenerate = 0usize;

        for &(center, seed) in circumcenters {
            if in_cavity[seed.idx()] || !strategy.pre_add(seed, in_cavity) || !criterion.is_selected(mesh, seed) {
                continue;
            }
            if center.is_none() {
                degenerate += 1;
                tracing::warn!(face = ?seed, "triangle has no circumcircle; kept as its own cavity");
            }
            let claimed: &[bool] = in_cavity;
            let cavity = self.grow(seed, center, |n| strategy.pre_add(n, claimed));
            for &t in &cavity.all_triangles {
                in_cavity[t.idx()] = true;
            }
            tracing::trace!(
                seed = ?seed,
                triangles = cavity.len(),
                boundary_edges = cavity.boundary_edges.len(),
                "grew cavity"
            );
            cavities.push(cavity);
        }

        let grown = cavities.len();
        for &(_, face) in circumcenters {
            if !in_cavity[face.idx()] {
                in_cavity[face.idx()] = true;
                cavities.push(Cavity::singleton(mesh, face));
            }
        }

        tracing::debug!(
            cavities = cavities.len(),
            grown,
            unclaimed = cavities.len() - grown,
            degenerate,
            "computed cavities"
        );
        cavities
    }

    /// Bytes held by the visited array.
    pub fn memory_usage(&self) -> u64 {
        (self.visited.capacity() * std::mem::size_of::<bool>()) as u64
    }
}
