// Copyright 2025 Lars Brubaker
// License: MIT
//
// Reversible polygon merge.
//
// `merge_seeds` joins two adjacent polygons by deleting the half-edge pairs
// they share and returns a `ConnectivityBackup` holding the prior state of
// everything it wrote. `rollback_merge` puts that state back, which lets a
// caller try a merge, inspect the result and undo it without cloning the
// mesh.

use smallvec::SmallVec;

use super::{EdgeIndex, FaceIndex, HalfEdge, HalfEdgeMesh, HeVertex, OutputIndex, VertexIndex};

/// Snapshot of the mesh elements touched by one `merge_seeds` call.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectivityBackup {
    edges: Vec<(EdgeIndex, HalfEdge)>,
    vertices: Vec<(VertexIndex, HeVertex)>,
    polygons: SmallVec<[(FaceIndex, EdgeIndex); 2]>,
    counts: [usize; 3],
    merged_seed: OutputIndex,
}

impl ConnectivityBackup {
    /// A live half-edge of the merged polygon: the `into` seed when it
    /// survived, otherwise a surviving edge of the absorbed polygon.
    pub fn merged_seed(&self) -> OutputIndex {
        self.merged_seed
    }

    /// Half-edges whose fields were captured.
    pub fn touched_edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.edges.iter().map(|&(e, _)| e)
    }
}

impl HalfEdgeMesh {
    /// Merge the polygon of `from.0` into the polygon of `into`.
    ///
    /// `from.1` lists the half-edges of the `from` polygon whose twins lie
    /// on `into`; they must be one contiguous run of its cycle and must not
    /// cover the whole cycle. Panics otherwise.
    #[track_caller]
    pub fn merge_seeds(&mut self, into: OutputIndex, from: (OutputIndex, &[EdgeIndex])) -> ConnectivityBackup {
        let (from_seed, shared) = from;
        assert!(
            !shared.is_empty(),
            "merging {:?} into {:?} needs at least one shared edge",
            from_seed,
            into
        );
        let from_face = self.face(shared[0]);
        let into_face = self.face(self.twin(shared[0]));
        assert_ne!(from_face, into_face, "cannot merge face {:?} into itself", from_face);

        let cycle = self.polygon_edges(from_seed.edge());
        let run = shared_run(&cycle, shared);
        let twins: SmallVec<[EdgeIndex; 4]> = run.iter().map(|&s| self.twin(s)).collect();
        for &t in &twins {
            assert_eq!(self.face(t), into_face, "edge {:?} is not on the target polygon", t);
        }
        let survivor = cycle
            .iter()
            .copied()
            .find(|e| !run.contains(e))
            .unwrap_or(EdgeIndex::INVALID);

        // Capture before the first write.
        let mut edges: Vec<EdgeIndex> = cycle.clone();
        for &e in run.iter().chain(twins.iter()) {
            edges.extend([e, self.next(e), self.prev(e)]);
        }
        edges.sort_unstable();
        edges.dedup();
        let mut vertices: Vec<VertexIndex> = run
            .iter()
            .flat_map(|&s| [self.origin(s), self.target(s)])
            .collect();
        vertices.sort_unstable();
        vertices.dedup();

        let mut backup = ConnectivityBackup {
            edges: edges.iter().map(|&e| (e, *self.edge(e))).collect(),
            vertices: vertices.iter().map(|&v| (v, *self.vertex(v))).collect(),
            polygons: [from_face, into_face]
                .iter()
                .map(|&f| (f, self.polygon(f)))
                .collect(),
            counts: [self.n_vertices, self.n_half_edges, self.n_polygons],
            merged_seed: OutputIndex::INVALID,
        };

        // Unlink each shared pair in turn. Links written by an earlier
        // step are picked up by the next, so adjacent pairs collapse
        // correctly.
        let mut fallback: SmallVec<[EdgeIndex; 8]> = SmallVec::new();
        for (&s, &t) in run.iter().zip(twins.iter()) {
            let (ps, ns) = (self.prev(s), self.next(s));
            let (pt, nt) = (self.prev(t), self.next(t));
            self.set_next(ps, nt);
            self.set_prev(nt, ps);
            self.set_next(pt, ns);
            self.set_prev(ns, pt);
            fallback.extend([nt, ns]);
        }
        for &e in &cycle {
            if !run.contains(&e) {
                self.set_face_to_edge(e, into_face);
            }
        }
        for (&s, &t) in run.iter().zip(twins.iter()) {
            self.tombstone_edge(s);
            self.tombstone_edge(t);
        }

        for &v in &vertices {
            if self.is_live_edge(self.edge_of_vertex(v)) {
                continue;
            }
            let replacement = fallback
                .iter()
                .copied()
                .find(|&e| self.is_live_edge(e) && self.origin(e) == v);
            match replacement {
                Some(e) => self.set_incident_edge(v, e),
                None => self.remove_vertex(v),
            }
        }

        let merged = if self.is_live_edge(into.edge()) {
            into
        } else {
            OutputIndex::from(survivor)
        };
        self.retire_face(from_face);
        if !self.is_live_edge(self.polygon(into_face)) {
            self.set_edge_to_face(into_face, merged.edge());
        }
        backup.merged_seed = merged;

        tracing::trace!(
            from = ?from_seed,
            into = ?into,
            removed = run.len(),
            merged = ?merged,
            "merged polygons"
        );
        backup
    }

    /// Undo a `merge_seeds` call. Must be applied to the mesh state that
    /// the merge produced.
    pub fn rollback_merge(&mut self, backup: ConnectivityBackup) {
        for (e, edge) in backup.edges {
            *self.edge_mut(e) = edge;
        }
        for (v, vertex) in backup.vertices {
            *self.vertex_mut(v) = vertex;
        }
        for (f, e) in backup.polygons {
            self.set_edge_to_face(f, e);
        }
        let [nv, ne, np] = backup.counts;
        self.n_vertices = nv;
        self.n_half_edges = ne;
        self.n_polygons = np;
    }
}

/// Order `shared` as it appears along `cycle`, starting at the edge whose
/// predecessor is not shared.
#[track_caller]
fn shared_run(cycle: &[EdgeIndex], shared: &[EdgeIndex]) -> SmallVec<[EdgeIndex; 4]> {
    let n = cycle.len();
    let start = (0..n)
        .find(|&i| shared.contains(&cycle[i]) && !shared.contains(&cycle[(i + n - 1) % n]))
        .unwrap_or_else(|| panic!("shared edges {:?} do not form a proper run of {:?}", shared, cycle));
    let run: SmallVec<[EdgeIndex; 4]> = (0..n)
        .map(|k| cycle[(start + k) % n])
        .take_while(|e| shared.contains(e))
        .collect();
    assert_eq!(
        run.len(),
        shared.len(),
        "shared edges {:?} are not contiguous on the source polygon",
        shared
    );
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vertex;

    fn square() -> HalfEdgeMesh {
        HalfEdgeMesh::from_triangles(
            vec![
                Vertex::new(0.0, 0.0),
                Vertex::new(1.0, 0.0),
                Vertex::new(0.0, 1.0),
                Vertex::new(1.0, 1.0),
            ],
            &[[0, 1, 3], [0, 3, 2]],
        )
        .unwrap()
    }

    // Edge 3 (0 -> 3) of triangle 1 is the diagonal, twin of edge 2.

    #[test]
    fn merge_two_triangles_into_quad() {
        let mut mesh = square();
        let backup = mesh.merge_seeds(
            OutputIndex::new(0),
            (OutputIndex::new(3), &[EdgeIndex::new(3)][..]),
        );
        assert_eq!(backup.merged_seed(), OutputIndex::new(0));
        assert_eq!(mesh.output_seed_edge_count(OutputIndex::new(0)), 4);
        assert_eq!(mesh.number_of_edges(), 8);
        assert_eq!(mesh.number_of_polygons(), 1);
        assert_eq!(mesh.number_of_vertices(), 4);
        assert!(!mesh.polygon(FaceIndex::new(1)).is_valid());
        assert!(mesh.is_polygon_convex(OutputIndex::new(0)));
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn rollback_restores_exact_state() {
        let mut mesh = square();
        let before = mesh.clone();
        let backup = mesh.merge_seeds(
            OutputIndex::new(0),
            (OutputIndex::new(3), &[EdgeIndex::new(3)][..]),
        );
        assert_ne!(mesh, before);
        mesh.rollback_merge(backup);
        assert_eq!(mesh, before);
    }

    #[test]
    fn tombstoned_into_seed_is_replaced() {
        let mut mesh = square();
        let backup = mesh.merge_seeds(
            OutputIndex::new(2),
            (OutputIndex::new(3), &[EdgeIndex::new(3)][..]),
        );
        let seed = backup.merged_seed();
        assert_eq!(seed, OutputIndex::new(4));
        assert!(mesh.is_live_edge(seed.edge()));
        assert_eq!(mesh.output_seed_edge_count(seed), 4);
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    #[should_panic(expected = "shared edge")]
    fn empty_shared_edges_panics() {
        let mut mesh = square();
        let _ = mesh.merge_seeds(OutputIndex::new(0), (OutputIndex::new(3), &[] as &[EdgeIndex]));
    }
}
