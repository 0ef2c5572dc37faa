// cavity-mesh: polygonal meshes from Delaunay cavities on a triangulation
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod cavity;
pub mod criteria;
pub mod error;
pub mod geom;
pub mod insertion;
pub mod merging;
pub mod mesh;
pub mod order;
pub mod refiner;
pub mod stats;

pub use cavity::{Cavity, CavityWalker};
pub use criteria::SelectionCriterion;
pub use error::{MeshError, RefineError};
pub use geom::{Real, Vertex};
pub use merging::{MergeOutcome, MergeReport, MergingPolicy, MergingStrategy, UnionFindOutputMap};
pub use mesh::{ConnectivityBackup, EdgeIndex, FaceIndex, HalfEdge, HalfEdgeMesh, HeVertex, OutputIndex, VertexIndex};
pub use order::TriangleComparator;
pub use refiner::{DelaunayCavityRefiner, MeshRefiner, RefinerOption};
pub use stats::{MemoryStat, MeshStat, RefinementStats, TimeStat};
