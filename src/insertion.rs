// Copyright 2025 Lars Brubaker
// License: MIT
//
// Cavity insertion: rewrite the output mesh so every cavity becomes one
// polygon.
//
// For each cavity the boundary is traced on the untouched input mesh:
// from a boundary edge, take the next edge of its triangle and, while that
// edge is interior to the cavity, rotate clockwise around its origin until
// a boundary edge turns up. The traced cycle is then written into the
// output mesh and every interior edge is tombstoned. Cavities are disjoint,
// so each splice touches only its own edges and tracing on the input mesh
// stays valid throughout.

use smallvec::SmallVec;

use crate::cavity::Cavity;
use crate::mesh::{EdgeIndex, HalfEdgeMesh, OutputIndex};

const NO_OWNER: u32 = u32::MAX;

/// Insert `cavities` into `output`, which must start as a copy of `input`.
/// Returns one seed per resulting polygon, in cavity order.
pub fn insert_cavities(input: &HalfEdgeMesh, output: &mut HalfEdgeMesh, cavities: &[Cavity]) -> Vec<OutputIndex> {
    let mut owner = vec![NO_OWNER; input.face_slots()];
    for (id, cavity) in cavities.iter().enumerate() {
        for &t in &cavity.all_triangles {
            owner[t.idx()] = id as u32;
        }
    }

    let mut seeds = Vec::with_capacity(cavities.len());
    let mut split = 0usize;
    for (id, cavity) in cavities.iter().enumerate() {
        if cavity.is_singleton() {
            seeds.push(OutputIndex::from(input.polygon(cavity.all_triangles[0])));
            continue;
        }
        let id = id as u32;
        let is_boundary = |e: EdgeIndex| input.is_border_edge(e) || owner[input.face(input.twin(e)).idx()] != id;

        match trace_boundary(input, cavity, &is_boundary) {
            Some(cycle) => {
                splice(input, output, cavity, &cycle, &is_boundary);
                seeds.push(OutputIndex::from(cycle[0]));
            }
            None => {
                split += 1;
                tracing::warn!(
                    triangles = cavity.len(),
                    boundary_edges = cavity.boundary_edges.len(),
                    "cavity boundary is not a single cycle; inserting its triangles separately"
                );
                seeds.extend(cavity.all_triangles.iter().map(|&t| OutputIndex::from(input.polygon(t))));
            }
        }
    }

    tracing::debug!(
        cavities = cavities.len(),
        seeds = seeds.len(),
        split,
        polygons = output.number_of_polygons(),
        half_edges = output.number_of_edges(),
        "inserted cavities"
    );
    seeds
}

/// Walk the boundary of `cavity` on `mesh`. Returns `None` when the walk
/// does not cover every boundary edge in one cycle.
fn trace_boundary<F>(mesh: &HalfEdgeMesh, cavity: &Cavity, is_boundary: &F) -> Option<SmallVec<[EdgeIndex; 16]>>
where
    F: Fn(EdgeIndex) -> bool,
{
    let anchor = *cavity.boundary_edges.first()?;
    let expected = cavity.boundary_edges.len();
    let mut cycle: SmallVec<[EdgeIndex; 16]> = SmallVec::new();
    let mut cur = anchor;
    loop {
        cycle.push(cur);
        if cycle.len() > expected {
            return None;
        }
        let mut cand = mesh.next(cur);
        let mut turns = 0;
        while !is_boundary(cand) {
            cand = mesh.cw_edge_to_vertex(cand);
            turns += 1;
            if turns > mesh.edge_slots() {
                return None;
            }
        }
        if cand == anchor {
            break;
        }
        cur = cand;
    }
    (cycle.len() == expected).then_some(cycle)
}

fn splice<F>(input: &HalfEdgeMesh, output: &mut HalfEdgeMesh, cavity: &Cavity, cycle: &[EdgeIndex], is_boundary: &F)
where
    F: Fn(EdgeIndex) -> bool,
{
    let anchor = cycle[0];
    let face = input.face(anchor);

    for (i, &e) in cycle.iter().enumerate() {
        let next = cycle[(i + 1) % cycle.len()];
        output.set_next(e, next);
        output.set_prev(next, e);
        output.set_face_to_edge(e, face);
    }

    let mut orphaned = Vec::new();
    for &t in &cavity.all_triangles {
        for e in input.edges_of_triangle(t) {
            if !is_boundary(e) {
                orphaned.push(output.origin(e));
                output.tombstone_edge(e);
            }
        }
    }

    for &e in cycle {
        let v = output.origin(e);
        if !output.is_live_edge(output.edge_of_vertex(v)) {
            output.set_incident_edge(v, e);
        }
    }
    for v in orphaned {
        if !output.is_live_edge(output.edge_of_vertex(v)) {
            output.remove_vertex(v);
        }
    }

    for &t in &cavity.all_triangles {
        if t != face {
            output.retire_face(t);
        }
    }
    output.set_edge_to_face(face, anchor);
}
