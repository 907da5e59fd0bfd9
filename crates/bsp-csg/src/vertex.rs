//! Polygon vertex: a position with a surface normal.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::Real;

/// A vertex of a polygon, holding a position and a unit surface normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    position: Point3<Real>,
    normal: Vector3<Real>,
}

impl Vertex {
    /// Creates a new vertex. The normal is stored as given.
    pub const fn new(position: Point3<Real>, normal: Vector3<Real>) -> Self {
        Self { position, normal }
    }

    #[inline]
    pub fn position(&self) -> Point3<Real> {
        self.position
    }

    #[inline]
    pub fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Returns `true` if every component of the position and normal is finite.
    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.normal.iter()).all(|c| c.is_finite())
    }

    /// Returns a copy with the normal pointing the other way.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            position: self.position,
            normal: -self.normal,
        }
    }

    /// Linearly interpolates between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// The position is blended linearly; the blended normal is renormalized.
    /// `t` is not clamped.
    pub fn lerp(&self, other: &Vertex, t: Real) -> Vertex {
        let position = self.position + (other.position - self.position) * t;
        let blended = self.normal + (other.normal - self.normal) * t;
        let normal = blended.try_normalize(Real::EPSILON).unwrap_or(self.normal);
        Vertex { position, normal }
    }

    /// Applies an affine transform to the position and `normal_matrix`
    /// (inverse-transpose of the linear part) to the normal.
    pub(crate) fn transformed(&self, matrix: &Matrix4<Real>, normal_matrix: &Matrix3<Real>) -> Self {
        let position = matrix.transform_point(&self.position);
        let mapped = normal_matrix * self.normal;
        let normal = mapped.try_normalize(Real::EPSILON).unwrap_or(mapped);
        Self { position, normal }
    }
}
