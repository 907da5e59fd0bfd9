//! Constructive Solid Geometry on polygon meshes using BSP trees.
//!
//! A [`Csg`] is an immutable bag of planar [`Polygon`]s enclosing a solid.
//! Boolean combinations ([`Csg::union`], [`Csg::subtract`],
//! [`Csg::intersect`]) are computed by building a [`BspTree`] from each
//! operand and clipping the polygons of one against the other.
//!
//! # Example
//!
//! ```ignore
//! use bsp_csg::{Csg, Transform};
//!
//! let a: Csg = /* polygons from a shape generator */;
//! let b = a.transformed(&Transform::translation(0.5, 0.0, 0.0)?);
//!
//! let merged = a.union(&b);
//! let carved = a.subtract(&b);
//! let common = a.intersect(&b);
//! ```

mod aabb;
pub mod bsp;
mod csg;
mod error;
mod plane;
mod polygon;
mod split;
mod transform;
mod vertex;

pub use aabb::Aabb;
pub use bsp::{BspNode, BspTree, FirstPolygon, PlaneSelector};
pub use csg::Csg;
pub use error::CsgError;
pub use plane::{Classification, Plane3D, PlaneSide, PLANE_EPSILON};
pub use polygon::Polygon;
pub use split::PolygonSplit;
pub use transform::{Axis, Transform};
pub use vertex::Vertex;

/// Scalar type used throughout the crate.
pub type Real = f64;

/// Numerical tolerance shared by every plane classification of one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Points closer than this to a plane are classified as on the plane.
    pub plane: Real,
}

impl Tolerance {
    /// Creates a tolerance with the given plane epsilon.
    pub fn new(plane: Real) -> Result<Self, CsgError> {
        if !plane.is_finite() || plane <= 0.0 {
            return Err(CsgError::InvalidTolerance { value: plane });
        }
        Ok(Self { plane })
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            plane: PLANE_EPSILON,
        }
    }
}
