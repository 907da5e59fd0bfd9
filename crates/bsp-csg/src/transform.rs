//! Affine transforms applied to meshes.

use nalgebra::{Matrix3, Matrix4, Rotation3, Unit, Vector3};

use crate::{CsgError, Plane3D, Polygon, Real};

/// A coordinate axis. Mirroring "along X" reflects through the YZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    pub fn unit(self) -> Vector3<Real> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

}

/// An invertible affine transform stored as a homogeneous 4x4 matrix.
///
/// The normal matrix (inverse-transpose of the linear part) is computed once
/// on construction; a `Transform` value is always invertible.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4<Real>,
    normal_matrix: Matrix3<Real>,
    determinant: Real,
}

/// Bottom row entries further than this from `[0, 0, 0, 1]` make a matrix non-affine.
const AFFINE_EPSILON: Real = 1e-12;

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
            normal_matrix: Matrix3::identity(),
            determinant: 1.0,
        }
    }

    /// Wraps a homogeneous matrix, checking that it is affine and invertible.
    pub fn from_matrix(matrix: Matrix4<Real>) -> Result<Self, CsgError> {
        if !matrix.iter().all(|c| c.is_finite()) {
            return Err(CsgError::NonFiniteCoordinate);
        }
        let bottom = matrix.fixed_view::<1, 4>(3, 0);
        let expected = [0.0, 0.0, 0.0, 1.0];
        if bottom
            .iter()
            .zip(expected)
            .any(|(value, want)| (value - want).abs() > AFFINE_EPSILON)
        {
            return Err(CsgError::NonAffineTransform);
        }

        let linear: Matrix3<Real> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let determinant = linear.determinant();
        let inverse = linear
            .try_inverse()
            .filter(|_| determinant.abs() > Real::EPSILON)
            .ok_or(CsgError::SingularTransform)?;

        Ok(Self {
            matrix,
            normal_matrix: inverse.transpose(),
            determinant,
        })
    }

    /// Translation by `(x, y, z)`. Every offset must be finite.
    pub fn translation(x: Real, y: Real, z: Real) -> Result<Self, CsgError> {
        Self::from_matrix(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    /// Non-uniform scaling. Every factor must be finite and non-zero.
    pub fn scaling(x: Real, y: Real, z: Real) -> Result<Self, CsgError> {
        Self::from_matrix(Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)))
    }

    /// Rotation by `angle` radians around `axis` (right-hand rule).
    pub fn rotation(axis: Vector3<Real>, angle: Real) -> Result<Self, CsgError> {
        let axis = Unit::try_new(axis, Real::EPSILON).ok_or(CsgError::InvalidDimension {
            name: "rotation axis length",
            value: axis.norm(),
        })?;
        Self::from_matrix(Rotation3::from_axis_angle(&axis, angle).to_homogeneous())
    }

    /// Rotation by Euler angles in radians: around X, then Y, then Z.
    pub fn rotation_xyz(x: Real, y: Real, z: Real) -> Result<Self, CsgError> {
        Self::from_matrix(Rotation3::from_euler_angles(x, y, z).to_homogeneous())
    }

    /// Reflection across the plane perpendicular to `axis` through the origin.
    pub fn mirror(axis: Axis) -> Self {
        let factors = Vector3::repeat(1.0) - axis.unit() * 2.0;
        let linear = Matrix3::from_diagonal(&factors);
        Self {
            matrix: linear.to_homogeneous(),
            normal_matrix: linear,
            determinant: -1.0,
        }
    }

    /// Returns the transform applying `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            matrix: next.matrix * self.matrix,
            normal_matrix: next.normal_matrix * self.normal_matrix,
            determinant: next.determinant * self.determinant,
        }
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix4<Real> {
        &self.matrix
    }

    /// Determinant of the linear part.
    #[inline]
    pub fn determinant(&self) -> Real {
        self.determinant
    }

    /// Returns `true` if the transform reverses orientation.
    #[inline]
    pub fn is_mirroring(&self) -> bool {
        self.determinant < 0.0
    }

    /// Transforms one polygon. Winding is reversed for mirroring transforms
    /// so the vertex order keeps matching the outward normal.
    pub(crate) fn apply(&self, polygon: &Polygon) -> Polygon {
        let mut vertices =
            polygon.map_vertices(|v| v.transformed(&self.matrix, &self.normal_matrix));
        if self.is_mirroring() {
            vertices.reverse();
        }
        let normal = self.normal_matrix * polygon.plane().normal();
        let plane = Plane3D::from_point_and_normal(vertices[0].position(), normal);
        Polygon::with_plane(vertices, plane)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
