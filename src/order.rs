// Copyright 2025 Lars Brubaker
// License: MIT
//
// Triangle orderings for cavity growth.
//
// The order decides which seed claims a contested triangle first, so it
// shapes the output polygons. It never affects correctness.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::geom::{triangle_angles, triangle_area2, Real};
use crate::mesh::{FaceIndex, HalfEdgeMesh};

/// How triangles are ordered before cavities are grown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TriangleComparator {
    /// Face-table order.
    #[default]
    Unsorted,
    /// Shuffled. A fixed seed makes the order reproducible; `None` draws
    /// from the thread RNG.
    Random { seed: Option<u64> },
    /// By the shortest (`by_min`) or longest edge.
    EdgeLength { ascending: bool, by_min: bool },
    /// By the smallest (`by_min`) or largest interior angle.
    Angle { ascending: bool, by_min: bool },
    Area { ascending: bool },
}

impl TriangleComparator {
    /// Live faces of `mesh` in this order. Ties keep face-table order.
    pub fn sort(&self, mesh: &HalfEdgeMesh) -> Vec<FaceIndex> {
        let mut faces: Vec<FaceIndex> = (0..mesh.face_slots())
            .map(FaceIndex::new)
            .filter(|&f| mesh.polygon(f).is_valid())
            .collect();

        let ascending = match *self {
            TriangleComparator::Unsorted => return faces,
            TriangleComparator::Random { seed } => {
                match seed {
                    Some(s) => faces.shuffle(&mut StdRng::seed_from_u64(s)),
                    None => faces.shuffle(&mut rand::rng()),
                }
                return faces;
            }
            TriangleComparator::EdgeLength { ascending, .. }
            | TriangleComparator::Angle { ascending, .. }
            | TriangleComparator::Area { ascending } => ascending,
        };

        let mut keyed: Vec<(Real, FaceIndex)> = faces.iter().map(|&f| (self.key(mesh, f), f)).collect();
        if ascending {
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        } else {
            keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        }
        faces.clear();
        faces.extend(keyed.into_iter().map(|(_, f)| f));
        faces
    }

    fn key(&self, mesh: &HalfEdgeMesh, face: FaceIndex) -> Real {
        match *self {
            TriangleComparator::EdgeLength { by_min, .. } => {
                let lengths = mesh.edges_of_triangle(face).map(|e| mesh.edge_length2(e));
                extremum(lengths, by_min)
            }
            TriangleComparator::Angle { by_min, .. } => {
                let [a, b, c] = mesh.vertices_of_triangle(face);
                extremum(triangle_angles(a, b, c), by_min)
            }
            TriangleComparator::Area { .. } => {
                let [a, b, c] = mesh.vertices_of_triangle(face);
                0.5 * triangle_area2(a, b, c).abs()
            }
            TriangleComparator::Unsorted | TriangleComparator::Random { .. } => 0.0,
        }
    }
}

fn extremum(values: [Real; 3], min: bool) -> Real {
    let fold = if min { Real::min } else { Real::max };
    values[1..].iter().copied().fold(values[0], fold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vertex;

    // Three triangles of different sizes along the x axis, sharing edges.
    fn strip() -> HalfEdgeMesh {
        HalfEdgeMesh::from_triangles(
            vec![
                Vertex::new(0.0, 0.0),
                Vertex::new(4.0, 0.0),
                Vertex::new(0.0, 4.0),
                Vertex::new(4.0, 1.0),
                Vertex::new(5.0, 1.0),
            ],
            &[[0, 1, 2], [1, 3, 2], [1, 4, 3]],
        )
        .unwrap()
    }

    fn ids(faces: &[FaceIndex]) -> Vec<usize> {
        faces.iter().map(|f| f.idx()).collect()
    }

    #[test]
    fn unsorted_is_identity() {
        let mesh = strip();
        assert_eq!(ids(&TriangleComparator::Unsorted.sort(&mesh)), vec![0, 1, 2]);
    }

    #[test]
    fn area_orders_both_ways() {
        let mesh = strip();
        let up = TriangleComparator::Area { ascending: true }.sort(&mesh);
        let down = TriangleComparator::Area { ascending: false }.sort(&mesh);
        assert_eq!(ids(&up), vec![2, 1, 0]);
        assert_eq!(ids(&down), vec![0, 1, 2]);
    }

    #[test]
    fn edge_length_by_min() {
        let mesh = strip();
        let order = TriangleComparator::EdgeLength { ascending: true, by_min: true }.sort(&mesh);
        // Triangles 1 and 2 tie on a unit edge and keep face order.
        assert_eq!(ids(&order), vec![1, 2, 0]);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let mesh = strip();
        let cmp = TriangleComparator::Random { seed: Some(7) };
        let a = cmp.sort(&mesh);
        let b = cmp.sort(&mesh);
        assert_eq!(a, b);
        let mut sorted = ids(&a);
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn extremum_picks_min_and_max() {
        assert_eq!(extremum([3.0, 1.0, 2.0], true), 1.0);
        assert_eq!(extremum([3.0, 1.0, 2.0], false), 3.0);
    }
}
