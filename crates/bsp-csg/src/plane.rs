//! Oriented cutting planes and point classification.

use std::ops::BitOr;

use nalgebra::{Point3, Vector3};

use crate::{CsgError, Real, Vertex};

/// Default epsilon for plane classification.
/// Points within this distance of the plane are considered "on" the plane.
pub const PLANE_EPSILON: Real = 1e-5;

const COLLINEAR_SINE: Real = 1e-10;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a polygon relative to a plane.
///
/// Classifications combine with `|`: folding the sides of every vertex
/// of a polygon yields the polygon's classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    /// All vertices are on the plane (coplanar)
    #[default]
    Coplanar,
    /// No vertex is behind the plane, at least one is in front
    Front,
    /// No vertex is in front of the plane, at least one is behind
    Back,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

impl Classification {
    const fn bits(self) -> u8 {
        match self {
            Classification::Coplanar => 0,
            Classification::Front => 1,
            Classification::Back => 2,
            Classification::Spanning => 3,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Classification::Coplanar,
            1 => Classification::Front,
            2 => Classification::Back,
            _ => Classification::Spanning,
        }
    }
}

impl From<PlaneSide> for Classification {
    fn from(side: PlaneSide) -> Self {
        match side {
            PlaneSide::Front => Classification::Front,
            PlaneSide::Back => Classification::Back,
            PlaneSide::OnPlane => Classification::Coplanar,
        }
    }
}

impl BitOr for Classification {
    type Output = Classification;

    fn bitor(self, rhs: Classification) -> Classification {
        Classification::from_bits(self.bits() | rhs.bits())
    }
}

impl BitOr<PlaneSide> for Classification {
    type Output = Classification;

    fn bitor(self, rhs: PlaneSide) -> Classification {
        self | Classification::from(rhs)
    }
}

/// A plane in 3D space, represented as `normal · point = offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane3D {
    normal: Vector3<Real>,
    offset: Real,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector3<Real>, offset: Real) -> Self {
        let norm = normal.norm();
        assert!(norm > Real::EPSILON, "Plane normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Creates a plane from a point on the plane and a normal vector.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn from_point_and_normal(point: Point3<Real>, normal: Vector3<Real>) -> Self {
        let norm = normal.norm();
        assert!(norm > Real::EPSILON, "Plane normal cannot be zero");
        let unit_normal = normal / norm;
        let offset = unit_normal.dot(&point.coords);
        Self {
            normal: unit_normal,
            offset,
        }
    }

    /// Creates a plane through the positions of three vertices.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// Fails with [`CsgError::DegeneratePolygon`] if the points are collinear.
    pub fn from_vertices(a: &Vertex, b: &Vertex, c: &Vertex) -> Result<Self, CsgError> {
        let (a, b, c) = (a.position(), b.position(), c.position());
        let ab = b - a;
        let ac = c - a;
        let cross = ab.cross(&ac);
        let scale = ab.norm() * ac.norm();
        if !cross.iter().all(|c| c.is_finite()) {
            return Err(CsgError::NonFiniteCoordinate);
        }
        // |ab × ac| = |ab||ac| sin θ; reject when the angle between the edges vanishes.
        let area = cross.norm();
        if scale <= Real::EPSILON || area <= Real::EPSILON || area <= scale * COLLINEAR_SINE {
            return Err(CsgError::DegeneratePolygon);
        }
        Ok(Self::from_point_and_normal(a, cross))
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> Real {
        self.offset
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies which side of the plane a point lies on.
    /// Uses the default `PLANE_EPSILON` tolerance.
    #[inline]
    pub fn classify_point(&self, point: Point3<Real>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point3<Real>, epsilon: Real) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Returns `true` if `other` faces the same way as this plane.
    #[inline]
    pub fn faces_same_direction(&self, other: &Plane3D) -> bool {
        self.normal.dot(&other.normal) > 0.0
    }

    /// Parameter `t` at which the segment `start -> end` meets the plane.
    ///
    /// Returns `None` when the segment is parallel to the plane.
    pub(crate) fn intersection_parameter(&self, start: Point3<Real>, end: Point3<Real>) -> Option<Real> {
        let denom = self.normal.dot(&(end - start));
        if denom.abs() < Real::EPSILON {
            return None;
        }
        Some((self.offset - self.normal.dot(&start.coords)) / denom)
    }
}
