//! Solid primitives and shape trees on top of [`bsp_csg`].
//!
//! A [`Shape`] describes a solid (cubes, spheres, cylinders, their
//! transforms and boolean combinations) and turns into a [`bsp_csg::Csg`]
//! through [`Shape::to_csg`]. Curved surfaces are approximated with the
//! number of segments in the [`FacetContext`].
//!
//! ```ignore
//! use csg_shapes::{FacetContext, Shape};
//!
//! let bracket = Shape::cuboid(4.0, 2.0, 1.0)
//!     .difference(Shape::cylinder(0.5, 2.0).translate(1.0, 0.0, 0.0)?);
//! let mesh = bracket.to_csg(&FacetContext::default())?;
//! ```

mod context;
mod primitives;
mod shape;

pub use bsp_csg::Axis;
pub use context::FacetContext;
pub use shape::Shape;
