// Copyright 2025 Lars Brubaker
// License: MIT
//
// Planar geometric primitives used by the cavity refiner.
//
// Everything works on plain (x, y) doubles. Predicates are the straight
// determinant forms; callers that need a tolerance apply it themselves.

use std::ops::{Add, Mul, Sub};

pub type Real = f64;

/// Coordinate tolerance used by `Vertex` equality.
pub const EPSILON: Real = 1e-9;

/// A point in the plane.
#[derive(Copy, Clone, Debug, Default)]
pub struct Vertex {
    pub x: Real,
    pub y: Real,
}

impl Vertex {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, v: Vertex) -> Real {
        self.x * v.x + self.y * v.y
    }

    /// Z component of (v1 - self) x (v2 - self). Positive when
    /// (self, v1, v2) turn counter-clockwise.
    #[inline]
    pub fn cross2d(self, v1: Vertex, v2: Vertex) -> Real {
        let a = v1 - self;
        let b = v2 - self;
        a.x * b.y - a.y * b.x
    }

    #[inline]
    pub fn dist2(self, v: Vertex) -> Real {
        let d = v - self;
        d.dot(d)
    }

    /// Returns true if `p` lies strictly inside the circumcircle of the
    /// counter-clockwise triangle (a, b, c).
    pub fn in_circle(a: Vertex, b: Vertex, c: Vertex, p: Vertex) -> bool {
        let ax = a.x - p.x;
        let ay = a.y - p.y;
        let bx = b.x - p.x;
        let by = b.y - p.y;
        let cx = c.x - p.x;
        let cy = c.y - p.y;

        let a_lift = ax * ax + ay * ay;
        let b_lift = bx * bx + by * by;
        let c_lift = cx * cx + cy * cy;

        let det = ax * (by * c_lift - b_lift * cy) - ay * (bx * c_lift - b_lift * cx)
            + a_lift * (bx * cy - by * cx);

        det > 0.0
    }

    /// Center of the circle through `a`, `b` and `c`.
    ///
    /// Returns `None` for collinear (or coincident) input, where the
    /// circle does not exist, and whenever the result is not finite.
    pub fn circumcenter(a: Vertex, b: Vertex, c: Vertex) -> Option<Vertex> {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d == 0.0 {
            return None;
        }
        let a2 = a.dot(a);
        let b2 = b.dot(b);
        let c2 = c.dot(c);
        let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
        let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
        if ux.is_finite() && uy.is_finite() {
            Some(Vertex::new(ux, uy))
        } else {
            None
        }
    }
}

impl Add for Vertex {
    type Output = Vertex;
    #[inline]
    fn add(self, o: Vertex) -> Vertex {
        Vertex::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Vertex {
    type Output = Vertex;
    #[inline]
    fn sub(self, o: Vertex) -> Vertex {
        Vertex::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<Real> for Vertex {
    type Output = Vertex;
    #[inline]
    fn mul(self, s: Real) -> Vertex {
        Vertex::new(self.x * s, self.y * s)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, o: &Vertex) -> bool {
        (self.x - o.x).abs() < EPSILON && (self.y - o.y).abs() < EPSILON
    }
}

/// Twice the signed area of (a, b, c).
#[inline]
pub fn triangle_area2(a: Vertex, b: Vertex, c: Vertex) -> Real {
    a.cross2d(b, c)
}

/// Interior angles (radians) at a, b and c of triangle (a, b, c).
pub fn triangle_angles(a: Vertex, b: Vertex, c: Vertex) -> [Real; 3] {
    let ab = b - a;
    let bc = c - b;
    let ca = a - c;

    let angle = |u: Vertex, v: Vertex| -> Real {
        let denom = u.dot(u).sqrt() * v.dot(v).sqrt();
        (u.dot(v) / denom).clamp(-1.0, 1.0).acos()
    };

    [
        angle(ab, ca * -1.0),
        angle(bc, ab * -1.0),
        angle(ca, bc * -1.0),
    ]
}
