//! Error type for geometry construction.

use thiserror::Error;

use crate::Real;

/// Errors raised when constructing geometry from invalid input.
///
/// Boolean operations never fail: every value they consume has already been
/// validated at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsgError {
    /// A polygon was given fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    /// The defining vertices of a polygon are collinear (zero-area normal).
    #[error("polygon is degenerate: its first three vertices are collinear")]
    DegeneratePolygon,

    /// A vertex normal has (near) zero length.
    #[error("vertex normal has zero length")]
    ZeroNormal,

    /// A vertex lies off the plane of the polygon's first three vertices.
    #[error("polygon is not planar: a vertex lies {distance} off its plane")]
    NonPlanarPolygon { distance: Real },

    /// A coordinate or normal component is NaN or infinite.
    #[error("coordinate is not finite")]
    NonFiniteCoordinate,

    /// The linear part of a transform cannot be inverted.
    #[error("transform is singular (determinant is zero)")]
    SingularTransform,

    /// The bottom row of a homogeneous matrix is not `[0, 0, 0, 1]`.
    #[error("matrix is not an affine transform")]
    NonAffineTransform,

    /// Tolerances must be finite and strictly positive.
    #[error("invalid tolerance {value}")]
    InvalidTolerance { value: Real },

    /// A shape parameter is out of range.
    #[error("invalid {name}: {value}")]
    InvalidDimension { name: &'static str, value: Real },
}
