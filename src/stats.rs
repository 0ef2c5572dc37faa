// Copyright 2025 Lars Brubaker
// License: MIT
//
// Named counters collected during a refinement run.

use std::collections::HashMap;

use crate::mesh::{EdgeIndex, HalfEdgeMesh};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshStat {
    Polygons,
    Vertices,
    Edges,
    BorderEdges,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeStat {
    TriangleSorting,
    CircumcenterComputation,
    CavityComputation,
    CavityInsertion,
    CavityMerging,
    Total,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemoryStat {
    Total,
    CavityArray,
    VisitedArray,
    EdgeMap,
    EdgesInput,
    EdgesOutput,
    VerticesInput,
    VerticesOutput,
}

impl MeshStat {
    pub const ALL: [MeshStat; 4] = [MeshStat::Polygons, MeshStat::Vertices, MeshStat::Edges, MeshStat::BorderEdges];

    pub fn name(self) -> &'static str {
        match self {
            MeshStat::Polygons => "n_polygons",
            MeshStat::Vertices => "n_vertices",
            MeshStat::Edges => "n_half_edges",
            MeshStat::BorderEdges => "n_border_edges",
        }
    }
}

impl TimeStat {
    pub fn name(self) -> &'static str {
        match self {
            TimeStat::TriangleSorting => "t_triangle_sorting",
            TimeStat::CircumcenterComputation => "t_circumcenters",
            TimeStat::CavityComputation => "t_cavity_computation",
            TimeStat::CavityInsertion => "t_cavity_insertion",
            TimeStat::CavityMerging => "t_cavity_merging",
            TimeStat::Total => "t_total",
        }
    }
}

impl MemoryStat {
    pub fn name(self) -> &'static str {
        match self {
            MemoryStat::Total => "memory_total",
            MemoryStat::CavityArray => "memory_cavity_array",
            MemoryStat::VisitedArray => "memory_visited_array",
            MemoryStat::EdgeMap => "memory_edge_map",
            MemoryStat::EdgesInput => "memory_edges_input",
            MemoryStat::EdgesOutput => "memory_edges_output",
            MemoryStat::VerticesInput => "memory_vertices_input",
            MemoryStat::VerticesOutput => "memory_vertices_output",
        }
    }
}

/// Counters filled by a refiner. Reporting is left to the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefinementStats {
    pub mesh: HashMap<MeshStat, usize>,
    /// Seconds.
    pub time: HashMap<TimeStat, f64>,
    /// Bytes.
    pub memory: HashMap<MemoryStat, u64>,
}

impl RefinementStats {
    pub fn clear(&mut self) {
        self.mesh.clear();
        self.time.clear();
        self.memory.clear();
    }

    /// Record the size of `mesh`.
    pub fn record_mesh(&mut self, mesh: &HalfEdgeMesh) {
        let border = (0..mesh.edge_slots())
            .map(EdgeIndex::new)
            .filter(|&e| mesh.is_live_edge(e) && mesh.edge(e).is_border)
            .count();
        self.mesh.insert(MeshStat::Polygons, mesh.number_of_polygons());
        self.mesh.insert(MeshStat::Vertices, mesh.number_of_vertices());
        self.mesh.insert(MeshStat::Edges, mesh.number_of_edges());
        self.mesh.insert(MeshStat::BorderEdges, border);
    }

    pub fn add_time(&mut self, stat: TimeStat, seconds: f64) {
        *self.time.entry(stat).or_insert(0.0) += seconds;
    }

    pub fn set_memory(&mut self, stat: MemoryStat, bytes: u64) {
        self.memory.insert(stat, bytes);
    }

    /// Sum of every memory entry except `Total`, stored as `Total`.
    pub fn total_memory(&mut self) -> u64 {
        let total = self
            .memory
            .iter()
            .filter(|(k, _)| **k != MemoryStat::Total)
            .map(|(_, v)| v)
            .sum();
        self.memory.insert(MemoryStat::Total, total);
        total
    }

    pub fn mesh_stat(&self, stat: MeshStat) -> usize {
        self.mesh.get(&stat).copied().unwrap_or(0)
    }

    pub fn time_stat(&self, stat: TimeStat) -> f64 {
        self.time.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn memory_stat(&self, stat: MemoryStat) -> u64 {
        self.memory.get(&stat).copied().unwrap_or(0)
    }
}
