// Copyright 2025 Lars Brubaker
// End-to-end refinement through DelaunayCavityRefiner.

mod helpers;

use approx::assert_relative_eq;
use cavity_mesh::{
    DelaunayCavityRefiner, EdgeIndex, FaceIndex, HalfEdgeMesh, MemoryStat, MergingPolicy, MergingStrategy, MeshError,
    MeshRefiner, MeshStat, OutputIndex, RefineError, RefinerOption, SelectionCriterion, TimeStat, TriangleComparator,
};
use helpers::*;

fn refine(refiner: &mut DelaunayCavityRefiner, input: &HalfEdgeMesh) -> HalfEdgeMesh {
    let output = refiner.refine_mesh(input).expect("refinement failed");
    assert_eq!(output.validate(), Ok(()));
    assert_partition(&output, refiner.output_seeds());
    output
}

#[test]
fn square_becomes_one_quad() {
    let mut refiner = DelaunayCavityRefiner::new();
    let output = refine(&mut refiner, &square());
    let seeds = refiner.output_seeds();
    assert_eq!(seeds.len(), 1);
    assert_eq!(output.output_seed_edge_count(seeds[0]), 4);
    assert!(output.is_polygon_convex(seeds[0]));
}

#[test]
fn grid_cells_become_quads() {
    let mut refiner = DelaunayCavityRefiner::new();
    let output = refine(&mut refiner, &grid(2));
    let seeds = refiner.output_seeds();
    assert_eq!(seeds.len(), 4);
    for &s in seeds {
        assert_eq!(output.output_seed_edge_count(s), 4);
    }
    assert_eq!(output.number_of_edges(), 24);
    assert_eq!(output.number_of_vertices(), 9);
}

#[test]
fn area_is_preserved() {
    let input = jittered_grid(5, &[(0.2, -0.1), (-0.15, 0.2), (0.05, 0.05), (-0.2, -0.2)]);
    let input_seeds: Vec<OutputIndex> = (0..input.face_slots())
        .map(|f| OutputIndex::from(input.polygon(FaceIndex::new(f))))
        .collect();
    let expected = total_area(&input, &input_seeds);

    for comparator in [
        TriangleComparator::Unsorted,
        TriangleComparator::Area { ascending: false },
        TriangleComparator::Angle { ascending: true, by_min: true },
        TriangleComparator::EdgeLength { ascending: false, by_min: false },
        TriangleComparator::Random { seed: Some(11) },
    ] {
        let mut refiner = DelaunayCavityRefiner::with(
            comparator,
            SelectionCriterion::All,
            MergingStrategy::MergeTriangles(MergingPolicy::LongestEdge),
        );
        let output = refine(&mut refiner, &input);
        assert_relative_eq!(total_area(&output, refiner.output_seeds()), expected, epsilon = 1e-9);
        assert_relative_eq!(expected, 25.0, epsilon = 1e-9);
    }
}

#[test]
fn seeded_random_runs_are_identical() {
    let input = jittered_grid(4, &[(0.1, 0.2), (-0.2, 0.1), (0.15, -0.2)]);
    let comparator = TriangleComparator::Random { seed: Some(0xfeed) };
    let strategy = MergingStrategy::MergeTriangles(MergingPolicy::MaximizeConvexity);

    let mut a = DelaunayCavityRefiner::with(comparator.clone(), SelectionCriterion::All, strategy);
    let mut b = DelaunayCavityRefiner::with(comparator, SelectionCriterion::All, strategy);
    let out_a = refine(&mut a, &input);
    let out_b = refine(&mut b, &input);
    assert_eq!(out_a, out_b);
    assert_eq!(a.output_seeds(), b.output_seeds());
}

#[test]
fn non_triangle_input_is_rejected() {
    let mut refiner = DelaunayCavityRefiner::new();
    let quads = refine(&mut refiner, &grid(1));
    let err = refiner.refine_mesh(&quads).unwrap_err();
    assert!(matches!(err, RefineError::NotATriangulation { edges: 4, .. }));
    assert!(refiner.output_seeds().is_empty());
}

#[test]
fn broken_input_is_rejected() {
    let mut input = grid(1);
    input.set_next(EdgeIndex::new(0), EdgeIndex::new(4));
    let err = DelaunayCavityRefiner::new().refine_mesh(&input).unwrap_err();
    assert!(matches!(err, RefineError::InvalidMesh(MeshError::BrokenCycle { .. })));
}

#[test]
fn degenerate_triangle_stays_alone() {
    // A zero-area triangle under the edge 0-1 of a proper triangle.
    let input = HalfEdgeMesh::from_triangles(
        points(&[(0.0, 0.0), (2.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
        &[[0, 1, 3], [0, 2, 1]],
    )
    .unwrap();
    let mut refiner = DelaunayCavityRefiner::new();
    let output = refine(&mut refiner, &input);
    assert_eq!(refiner.output_seeds().len(), 2);
    assert_eq!(output.number_of_polygons(), 2);
}

#[test]
fn selection_limits_seeds() {
    let input = grid(2);
    // Only triangles in the left column may seed; the rest are grown into
    // or left as triangles.
    let criterion = SelectionCriterion::custom(|mesh, face| {
        let [a, b, c] = mesh.vertices_of_triangle(face);
        (a.x + b.x + c.x) / 3.0 < 1.0
    });
    let mut refiner = DelaunayCavityRefiner::new();
    refiner.set_selection_criterion(criterion);
    let output = refine(&mut refiner, &input);
    // Left cells become quads, right cells stay as four triangles.
    let mut sizes: Vec<usize> = refiner
        .output_seeds()
        .iter()
        .map(|&s| output.output_seed_edge_count(s))
        .collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![3, 3, 3, 3, 4, 4]);
}

#[test]
fn merging_removes_leftover_triangles() {
    let input = grid(2);
    let criterion = SelectionCriterion::custom(|mesh, face| {
        let [a, b, c] = mesh.vertices_of_triangle(face);
        (a.x + b.x + c.x) / 3.0 < 1.0
    });
    let mut refiner = DelaunayCavityRefiner::with(
        TriangleComparator::Unsorted,
        criterion,
        MergingStrategy::MergeTriangles(MergingPolicy::SmallestNeighbor),
    );
    refiner.set_option(RefinerOption::KeepIntermediate, true);
    let output = refine(&mut refiner, &input);

    let before = refiner.output_seeds_before_post_process().unwrap();
    assert_eq!(before.len(), 6);
    let intermediate = refiner.mesh_before_post_process().unwrap();
    assert_partition(intermediate, before);

    for &s in refiner.output_seeds() {
        assert!(output.output_seed_edge_count(s) >= 4);
    }
    assert!(refiner.output_seeds().len() < before.len());
}

#[test]
fn intermediate_is_not_kept_by_default() {
    let mut refiner = DelaunayCavityRefiner::new();
    refiner.set_merging_strategy(MergingStrategy::MergeTriangles(MergingPolicy::BiggestNeighbor));
    refine(&mut refiner, &grid(2));
    assert!(refiner.output_seeds_before_post_process().is_none());
    assert!(refiner.mesh_before_post_process().is_none());
}

#[test]
fn stats_are_filled() {
    let mut refiner = DelaunayCavityRefiner::new();
    refiner.set_comparator(TriangleComparator::Area { ascending: true });
    refiner.set_merging_strategy(MergingStrategy::MergeTriangles(MergingPolicy::ShortestEdge));
    refine(&mut refiner, &grid(2));
    let stats = refiner.stats();
    assert_eq!(stats.mesh_stat(MeshStat::Polygons), 4);
    assert_eq!(stats.mesh_stat(MeshStat::Vertices), 9);
    assert_eq!(stats.mesh_stat(MeshStat::Edges), 24);
    assert_eq!(stats.mesh_stat(MeshStat::BorderEdges), 8);
    assert!(stats.time.contains_key(&TimeStat::Total));
    assert!(stats.time.contains_key(&TimeStat::CavityMerging));
    assert!(stats.memory_stat(MemoryStat::EdgeMap) > 0);
    assert!(stats.memory_stat(MemoryStat::Total) >= stats.memory_stat(MemoryStat::EdgesOutput));
}
