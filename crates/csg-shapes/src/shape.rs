//! The closed set of solids that can be turned into a [`Csg`].

use bsp_csg::{Axis, Csg, CsgError, Real, Transform};
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{FacetContext, primitives};

/// A solid described as a tree of primitives, transforms and booleans.
///
/// Every variant converts to polygons through [`Shape::to_csg`]. Primitives
/// are centered at the origin; use [`Shape::translate`] and friends to place
/// them.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box with the given edge lengths.
    Cube { size: Vector3<Real> },
    Sphere { radius: Real },
    /// Cylinder along the z axis.
    Cylinder { radius: Real, height: Real },
    Transformed {
        transform: Transform,
        shape: Box<Shape>,
    },
    /// Reflection through the plane perpendicular to `axis`.
    Mirror { axis: Axis, shape: Box<Shape> },
    /// Union of all children. Empty when there are none.
    Union(Vec<Shape>),
    /// `base` with every shape in `subtract` carved out.
    Difference {
        base: Box<Shape>,
        subtract: Vec<Shape>,
    },
    /// Region common to all children. Empty when there are none.
    Intersection(Vec<Shape>),
}

impl Shape {
    /// Cube with edge length `size`.
    pub fn cube(size: Real) -> Self {
        Shape::Cube {
            size: Vector3::repeat(size),
        }
    }

    pub fn cuboid(x: Real, y: Real, z: Real) -> Self {
        Shape::Cube {
            size: Vector3::new(x, y, z),
        }
    }

    /// Box spanning the two corners. Fails if `min` exceeds `max` on any axis.
    pub fn cube_from_corners(min: Point3<Real>, max: Point3<Real>) -> Result<Self, CsgError> {
        let size = max - min;
        if let Some(&value) = size.iter().find(|d| !(**d > 0.0)) {
            return Err(CsgError::InvalidDimension {
                name: "corner extent",
                value,
            });
        }
        let center = nalgebra::center(&min, &max);
        Shape::Cube { size }.translate(center.x, center.y, center.z)
    }

    pub fn sphere(radius: Real) -> Self {
        Shape::Sphere { radius }
    }

    pub fn cylinder(radius: Real, height: Real) -> Self {
        Shape::Cylinder { radius, height }
    }

    /// Applies `transform` to this shape.
    pub fn transform(self, transform: Transform) -> Self {
        match self {
            Shape::Transformed {
                transform: inner,
                shape,
            } => Shape::Transformed {
                transform: inner.then(&transform),
                shape,
            },
            shape => Shape::Transformed {
                transform,
                shape: Box::new(shape),
            },
        }
    }

    pub fn translate(self, x: Real, y: Real, z: Real) -> Result<Self, CsgError> {
        Ok(self.transform(Transform::translation(x, y, z)?))
    }

    pub fn scale(self, x: Real, y: Real, z: Real) -> Result<Self, CsgError> {
        Ok(self.transform(Transform::scaling(x, y, z)?))
    }

    /// Rotation by `angle` radians around `axis`.
    pub fn rotate(self, axis: Vector3<Real>, angle: Real) -> Result<Self, CsgError> {
        Ok(self.transform(Transform::rotation(axis, angle)?))
    }

    /// Rotation by Euler angles in radians: around X, then Y, then Z.
    pub fn rotate_xyz(self, x: Real, y: Real, z: Real) -> Result<Self, CsgError> {
        Ok(self.transform(Transform::rotation_xyz(x, y, z)?))
    }

    pub fn mirror(self, axis: Axis) -> Self {
        Shape::Mirror {
            axis,
            shape: Box::new(self),
        }
    }

    pub fn union(self, other: Shape) -> Self {
        match self {
            Shape::Union(mut children) => {
                children.push(other);
                Shape::Union(children)
            }
            shape => Shape::Union(vec![shape, other]),
        }
    }

    pub fn difference(self, other: Shape) -> Self {
        match self {
            Shape::Difference { base, mut subtract } => {
                subtract.push(other);
                Shape::Difference { base, subtract }
            }
            shape => Shape::Difference {
                base: Box::new(shape),
                subtract: vec![other],
            },
        }
    }

    pub fn intersection(self, other: Shape) -> Self {
        match self {
            Shape::Intersection(mut children) => {
                children.push(other);
                Shape::Intersection(children)
            }
            shape => Shape::Intersection(vec![shape, other]),
        }
    }

    /// Short name of the variant, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Cube { .. } => "cube",
            Shape::Sphere { .. } => "sphere",
            Shape::Cylinder { .. } => "cylinder",
            Shape::Transformed { .. } => "transformed",
            Shape::Mirror { .. } => "mirror",
            Shape::Union(_) => "union",
            Shape::Difference { .. } => "difference",
            Shape::Intersection(_) => "intersection",
        }
    }

    /// Generates the polygons of this shape.
    ///
    /// Booleans fold their children left to right. Children are evaluated
    /// on the rayon thread pool when the `parallel` feature is enabled.
    #[instrument(level = "debug", skip_all, fields(kind = self.kind()))]
    pub fn to_csg(&self, context: &FacetContext) -> Result<Csg, CsgError> {
        let csg = match self {
            Shape::Cube { size } => primitives::cube(size)?,
            Shape::Sphere { radius } => primitives::sphere(*radius, context)?,
            Shape::Cylinder { radius, height } => {
                primitives::cylinder(*radius, *height, context)?
            }
            Shape::Transformed { transform, shape } => {
                shape.to_csg(context)?.transformed(transform)
            }
            Shape::Mirror { axis, shape } => shape.to_csg(context)?.mirrored(*axis),
            Shape::Union(children) => evaluate(children, context)?
                .into_iter()
                .reduce(|acc, next| acc.union(&next))
                .unwrap_or_default(),
            Shape::Difference { base, subtract } => {
                let base = base.to_csg(context)?;
                evaluate(subtract, context)?
                    .iter()
                    .fold(base, |acc, next| acc.subtract(next))
            }
            Shape::Intersection(children) => evaluate(children, context)?
                .into_iter()
                .reduce(|acc, next| acc.intersect(&next))
                .unwrap_or_default(),
        };
        debug!(polygons = csg.len(), "generated");
        Ok(csg)
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate(shapes: &[Shape], context: &FacetContext) -> Result<Vec<Csg>, CsgError> {
    shapes.iter().map(|shape| shape.to_csg(context)).collect()
}

#[cfg(feature = "parallel")]
fn evaluate(shapes: &[Shape], context: &FacetContext) -> Result<Vec<Csg>, CsgError> {
    shapes.par_iter().map(|shape| shape.to_csg(context)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cube_from_corners_places_the_box() {
        let shape = Shape::cube_from_corners(Point3::new(1.0, 2.0, 3.0), Point3::new(2.0, 4.0, 6.0))
            .unwrap();
        let csg = shape.to_csg(&FacetContext::default()).unwrap();

        let bounds = csg.bounding_box().unwrap();
        assert_relative_eq!(bounds.min, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
        assert_relative_eq!(bounds.max, Point3::new(2.0, 4.0, 6.0), epsilon = 1e-12);
        assert_relative_eq!(csg.volume(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn cube_from_corners_rejects_inverted_corners() {
        let err = Shape::cube_from_corners(Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 1.0, 0.0));
        assert_eq!(
            err,
            Err(CsgError::InvalidDimension {
                name: "corner extent",
                value: -1.0
            })
        );
    }

    #[test]
    fn transforms_are_merged() {
        let shape = Shape::cube(1.0)
            .translate(1.0, 0.0, 0.0)
            .and_then(|s| s.translate(0.0, 2.0, 0.0))
            .unwrap();
        let Shape::Transformed { transform, shape } = shape else {
            panic!("expected a transformed shape");
        };
        assert_eq!(*shape, Shape::cube(1.0));
        let moved = transform.matrix().transform_point(&Point3::origin());
        assert_relative_eq!(moved, Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn non_finite_offsets_are_rejected() {
        assert_eq!(
            Shape::cube(1.0).translate(Real::NAN, 0.0, 0.0),
            Err(CsgError::NonFiniteCoordinate)
        );
        assert_eq!(
            Shape::cube(1.0).rotate_xyz(0.0, Real::INFINITY, 0.0),
            Err(CsgError::NonFiniteCoordinate)
        );
        assert!(
            Shape::cube_from_corners(Point3::origin(), Point3::new(1.0, 1.0, Real::INFINITY))
                .is_err()
        );
    }

    #[test]
    fn rotate_xyz_turns_a_slab() {
        let slab = Shape::cuboid(4.0, 1.0, 1.0)
            .rotate_xyz(0.0, 0.0, std::f64::consts::FRAC_PI_2)
            .unwrap();
        let bounds = slab.to_csg(&FacetContext::default()).unwrap().bounding_box().unwrap();

        assert_relative_eq!(bounds.max.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(bounds.max.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn builders_flatten_booleans() {
        let shape = Shape::cube(1.0)
            .union(Shape::sphere(1.0))
            .union(Shape::cylinder(1.0, 1.0));
        assert!(matches!(shape, Shape::Union(ref c) if c.len() == 3));

        let shape = Shape::cube(2.0)
            .difference(Shape::sphere(1.0))
            .difference(Shape::cube(0.5));
        assert!(matches!(shape, Shape::Difference { ref subtract, .. } if subtract.len() == 2));
    }

    #[test]
    fn empty_booleans_are_empty() {
        let context = FacetContext::default();
        assert!(Shape::Union(vec![]).to_csg(&context).unwrap().is_empty());
        assert!(Shape::Intersection(vec![]).to_csg(&context).unwrap().is_empty());
    }

    #[test]
    fn invalid_child_fails_the_whole_shape() {
        let shape = Shape::cube(1.0).union(Shape::sphere(-1.0));
        assert!(matches!(
            shape.to_csg(&FacetContext::default()),
            Err(CsgError::InvalidDimension { name: "sphere radius", .. })
        ));
    }

    #[test]
    fn kind_names_variants() {
        assert_eq!(Shape::cube(1.0).kind(), "cube");
        assert_eq!(Shape::cube(1.0).mirror(Axis::X).kind(), "mirror");
        assert_eq!(Shape::Intersection(vec![]).kind(), "intersection");
    }
}
