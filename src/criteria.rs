// Copyright 2025 Lars Brubaker
// License: MIT
//
// Selection criteria: which triangles may seed a cavity.

use std::fmt;
use std::sync::Arc;

use crate::geom::{triangle_angles, triangle_area2, Real};
use crate::mesh::{FaceIndex, HalfEdgeMesh};

type Predicate = dyn Fn(&HalfEdgeMesh, FaceIndex) -> bool + Send + Sync;

/// Decides whether a triangle is allowed to seed a cavity. Triangles that
/// are never selected still end up in some polygon: either grown into
/// another cavity or emitted on their own.
#[derive(Clone, Default)]
pub enum SelectionCriterion {
    /// Every triangle is selected.
    #[default]
    All,
    /// Smallest interior angle is at most `radians`.
    MinAngle { radians: Real },
    /// Area is at most `area`.
    MinArea { area: Real },
    Not(Box<SelectionCriterion>),
    And(Box<SelectionCriterion>, Box<SelectionCriterion>),
    Or(Box<SelectionCriterion>, Box<SelectionCriterion>),
    Custom(Arc<Predicate>),
}

impl SelectionCriterion {
    /// `MinAngle` from a threshold in degrees. Values of 180 or more would
    /// select every triangle and are clamped just below a straight angle.
    pub fn min_angle_degrees(degrees: Real) -> Self {
        let mut radians = degrees.to_radians();
        if radians >= std::f64::consts::PI {
            tracing::warn!(degrees, "minimum angle threshold clamped below 180 degrees");
            radians = std::f64::consts::PI - 1e-6;
        }
        SelectionCriterion::MinAngle { radians }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&HalfEdgeMesh, FaceIndex) -> bool + Send + Sync + 'static,
    {
        SelectionCriterion::Custom(Arc::new(f))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        SelectionCriterion::Not(Box::new(self))
    }

    pub fn and(self, other: SelectionCriterion) -> Self {
        SelectionCriterion::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: SelectionCriterion) -> Self {
        SelectionCriterion::Or(Box::new(self), Box::new(other))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SelectionCriterion::All)
    }

    pub fn is_selected(&self, mesh: &HalfEdgeMesh, face: FaceIndex) -> bool {
        match self {
            SelectionCriterion::All => true,
            SelectionCriterion::MinAngle { radians } => {
                let [a, b, c] = mesh.vertices_of_triangle(face);
                let [x, y, z] = triangle_angles(a, b, c);
                x.min(y).min(z) <= *radians
            }
            SelectionCriterion::MinArea { area } => {
                let [a, b, c] = mesh.vertices_of_triangle(face);
                0.5 * triangle_area2(a, b, c).abs() <= *area
            }
            SelectionCriterion::Not(inner) => !inner.is_selected(mesh, face),
            SelectionCriterion::And(l, r) => l.is_selected(mesh, face) && r.is_selected(mesh, face),
            SelectionCriterion::Or(l, r) => l.is_selected(mesh, face) || r.is_selected(mesh, face),
            SelectionCriterion::Custom(f) => f(mesh, face),
        }
    }
}

impl fmt::Debug for SelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionCriterion::All => f.write_str("All"),
            SelectionCriterion::MinAngle { radians } => {
                f.debug_struct("MinAngle").field("radians", radians).finish()
            }
            SelectionCriterion::MinArea { area } => f.debug_struct("MinArea").field("area", area).finish(),
            SelectionCriterion::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            SelectionCriterion::And(l, r) => f.debug_tuple("And").field(l).field(r).finish(),
            SelectionCriterion::Or(l, r) => f.debug_tuple("Or").field(l).field(r).finish(),
            SelectionCriterion::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
