// Copyright 2025 Lars Brubaker
// License: MIT
//
// Refinement pipeline: sort -> circumcenters -> cavities -> insertion ->
// optional merging.

use std::time::Instant;

use crate::cavity::{compute_circumcenters, CavityWalker};
use crate::criteria::SelectionCriterion;
use crate::error::RefineError;
use crate::insertion::insert_cavities;
use crate::merging::MergingStrategy;
use crate::mesh::{HalfEdgeMesh, OutputIndex};
use crate::order::TriangleComparator;
use crate::stats::{MemoryStat, RefinementStats, TimeStat};

/// Something that turns a triangulation into a polygonal mesh.
pub trait MeshRefiner {
    fn refine_mesh(&mut self, input: &HalfEdgeMesh) -> Result<HalfEdgeMesh, RefineError>;

    /// Seeds of the polygons produced by the last run.
    fn output_seeds(&self) -> &[OutputIndex];

    /// Seeds right after cavity insertion, if kept.
    fn output_seeds_before_post_process(&self) -> Option<&[OutputIndex]> {
        None
    }

    /// Mesh right after cavity insertion, if kept.
    fn mesh_before_post_process(&self) -> Option<&HalfEdgeMesh> {
        None
    }

    fn stats(&self) -> &RefinementStats;
}

/// Boolean switches for `DelaunayCavityRefiner::set_option`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefinerOption {
    /// Keep a copy of the mesh and seeds from before the merging pass.
    /// Only has an effect when the strategy merges.
    KeepIntermediate,
}

/// Grows Delaunay cavities on a triangulation and turns each into a polygon.
#[derive(Clone, Debug, Default)]
pub struct DelaunayCavityRefiner {
    comparator: TriangleComparator,
    criterion: SelectionCriterion,
    strategy: MergingStrategy,
    keep_intermediate: bool,

    seeds: Vec<OutputIndex>,
    seeds_before_post_process: Option<Vec<OutputIndex>>,
    mesh_before_post_process: Option<HalfEdgeMesh>,
    stats: RefinementStats,
}

impl DelaunayCavityRefiner {
    /// Unsorted triangles, every triangle may seed, exclusion only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(comparator: TriangleComparator, criterion: SelectionCriterion, strategy: MergingStrategy) -> Self {
        Self {
            comparator,
            criterion,
            strategy,
            ..Self::default()
        }
    }

    pub fn set_comparator(&mut self, comparator: TriangleComparator) {
        self.comparator = comparator;
    }

    pub fn set_selection_criterion(&mut self, criterion: SelectionCriterion) {
        self.criterion = criterion;
    }

    pub fn set_merging_strategy(&mut self, strategy: MergingStrategy) {
        self.strategy = strategy;
    }

    pub fn set_option(&mut self, option: RefinerOption, value: bool) {
        match option {
            RefinerOption::KeepIntermediate => self.keep_intermediate = value,
        }
    }

    pub fn comparator(&self) -> &TriangleComparator {
        &self.comparator
    }

    pub fn selection_criterion(&self) -> &SelectionCriterion {
        &self.criterion
    }

    pub fn merging_strategy(&self) -> MergingStrategy {
        self.strategy
    }
}

impl MeshRefiner for DelaunayCavityRefiner {
    fn refine_mesh(&mut self, input: &HalfEdgeMesh) -> Result<HalfEdgeMesh, RefineError> {
        self.seeds.clear();
        self.seeds_before_post_process = None;
        self.mesh_before_post_process = None;
        self.stats.clear();

        input.validate()?;
        if let Some((face, edges)) = input.first_non_triangle() {
            return Err(RefineError::NotATriangulation { face, edges });
        }

        let start = Instant::now();

        let t = Instant::now();
        let order = self.comparator.sort(input);
        self.stats.add_time(TimeStat::TriangleSorting, t.elapsed().as_secs_f64());

        let t = Instant::now();
        let circumcenters = compute_circumcenters(input, &order);
        self.stats
            .add_time(TimeStat::CircumcenterComputation, t.elapsed().as_secs_f64());

        let t = Instant::now();
        let mut in_cavity = vec![false; input.face_slots()];
        let mut walker = CavityWalker::new(input);
        let cavities = walker.compute_cavities(&circumcenters, &mut in_cavity, &self.criterion, &self.strategy);
        self.stats.add_time(TimeStat::CavityComputation, t.elapsed().as_secs_f64());

        let t = Instant::now();
        let mut output = input.clone();
        let mut seeds = insert_cavities(input, &mut output, &cavities);
        self.stats.add_time(TimeStat::CavityInsertion, t.elapsed().as_secs_f64());

        let cavity_bytes: u64 = cavities.iter().map(|c| c.memory_usage()).sum();
        self.stats.set_memory(MemoryStat::CavityArray, cavity_bytes);
        self.stats.set_memory(
            MemoryStat::VisitedArray,
            walker.memory_usage() + (in_cavity.capacity() * std::mem::size_of::<bool>()) as u64,
        );
        drop(cavities);

        if self.strategy.performs_post_insertion() {
            if self.keep_intermediate {
                self.seeds_before_post_process = Some(seeds.clone());
                self.mesh_before_post_process = Some(output.clone());
            }
            let t = Instant::now();
            let report = self.strategy.post_insertion(&mut output, &mut seeds);
            self.stats.add_time(TimeStat::CavityMerging, t.elapsed().as_secs_f64());
            self.stats.set_memory(MemoryStat::EdgeMap, report.edge_map_bytes);
        }

        self.stats.add_time(TimeStat::Total, start.elapsed().as_secs_f64());
        self.stats.record_mesh(&output);
        self.stats.set_memory(MemoryStat::EdgesInput, input.edge_memory());
        self.stats.set_memory(MemoryStat::VerticesInput, input.vertex_memory());
        self.stats.set_memory(MemoryStat::EdgesOutput, output.edge_memory());
        self.stats.set_memory(MemoryStat::VerticesOutput, output.vertex_memory());
        self.stats.total_memory();

        tracing::debug!(
            triangles = input.number_of_polygons(),
            polygons = seeds.len(),
            seconds = self.stats.time_stat(TimeStat::Total),
            "refined mesh"
        );

        self.seeds = seeds;
        Ok(output)
    }

    fn output_seeds(&self) -> &[OutputIndex] {
        &self.seeds
    }

    fn output_seeds_before_post_process(&self) -> Option<&[OutputIndex]> {
        self.seeds_before_post_process.as_deref()
    }

    fn mesh_before_post_process(&self) -> Option<&HalfEdgeMesh> {
        self.mesh_before_post_process.as_ref()
    }

    fn stats(&self) -> &RefinementStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vertex;
    use crate::merging::MergingPolicy;

    fn fan() -> HalfEdgeMesh {
        HalfEdgeMesh::from_triangles(
            vec![
                Vertex::new(0.0, 0.0),
                Vertex::new(2.0, 0.0),
                Vertex::new(2.0, 2.0),
                Vertex::new(0.0, 2.0),
                Vertex::new(1.0, 0.5),
            ],
            &[[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
        )
        .unwrap()
    }

    #[test]
    fn setters_replace_configuration() {
        let mut refiner = DelaunayCavityRefiner::new();
        assert_eq!(*refiner.comparator(), TriangleComparator::Unsorted);
        assert!(refiner.selection_criterion().is_null());
        refiner.set_comparator(TriangleComparator::Area { ascending: true });
        refiner.set_selection_criterion(SelectionCriterion::MinArea { area: 1.0 });
        refiner.set_merging_strategy(MergingStrategy::MergeTriangles(MergingPolicy::LongestEdge));
        assert_eq!(*refiner.comparator(), TriangleComparator::Area { ascending: true });
        assert!(!refiner.selection_criterion().is_null());
        assert!(refiner.merging_strategy().performs_post_insertion());
    }

    #[test]
    fn rerun_resets_previous_results() {
        let input = fan();
        let mut refiner = DelaunayCavityRefiner::new();
        refiner.set_merging_strategy(MergingStrategy::MergeTriangles(MergingPolicy::SmallestNeighbor));
        refiner.set_option(RefinerOption::KeepIntermediate, true);
        let first = refiner.refine_mesh(&input).unwrap();
        assert!(refiner.mesh_before_post_process().is_some());

        refiner.set_option(RefinerOption::KeepIntermediate, false);
        let second = refiner.refine_mesh(&input).unwrap();
        assert_eq!(first, second);
        assert!(refiner.mesh_before_post_process().is_none());
        assert_eq!(refiner.stats().mesh_stat(crate::stats::MeshStat::Polygons), refiner.output_seeds().len());
    }
}
