//! Solid meshes and boolean operations.

use nalgebra::Point3;
use tracing::{debug, instrument};

use crate::{Aabb, Axis, BspTree, CsgError, Polygon, Real, Tolerance, Transform};

/// A solid represented by the polygons of its closed boundary.
///
/// A `Csg` is immutable from the outside: every operation returns a new
/// value and leaves its operands untouched. Polygon order carries no meaning,
/// but it is deterministic for deterministic inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Csg {
    polygons: Vec<Polygon>,
}

impl Csg {
    /// Creates a solid from boundary polygons wound counter-clockwise when
    /// seen from outside.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// The empty solid.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[inline]
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Number of boundary polygons.
    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Returns the space covered by either solid.
    ///
    /// ```text
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    pub fn union(&self, other: &Csg) -> Csg {
        self.union_with_tolerance(other, Tolerance::default())
    }

    #[instrument(skip_all, fields(a = self.len(), b = other.len()))]
    pub fn union_with_tolerance(&self, other: &Csg, tolerance: Tolerance) -> Csg {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let (mut a, mut b) = self.trees(other, tolerance);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();

        let result = Csg::combine(a, b);
        debug!(polygons = result.len(), "union");
        result
    }

    /// Returns the space covered by `self` but not by `other`.
    ///
    /// ```text
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn subtract(&self, other: &Csg) -> Csg {
        self.subtract_with_tolerance(other, Tolerance::default())
    }

    #[instrument(skip_all, fields(a = self.len(), b = other.len()))]
    pub fn subtract_with_tolerance(&self, other: &Csg, tolerance: Tolerance) -> Csg {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }

        let (mut a, mut b) = self.trees(other, tolerance);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        // b stays inverted: its surface bounds the carved-out cavity.
        a.invert();

        let result = Csg::combine(a, b);
        debug!(polygons = result.len(), "subtract");
        result
    }

    /// Returns the space covered by both solids.
    ///
    /// ```text
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn intersect(&self, other: &Csg) -> Csg {
        self.intersect_with_tolerance(other, Tolerance::default())
    }

    #[instrument(skip_all, fields(a = self.len(), b = other.len()))]
    pub fn intersect_with_tolerance(&self, other: &Csg, tolerance: Tolerance) -> Csg {
        if self.is_empty() || other.is_empty() {
            return Csg::empty();
        }

        let (mut a, mut b) = self.trees(other, tolerance);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.invert();
        b.invert();

        let result = Csg::combine(a, b);
        debug!(polygons = result.len(), "intersect");
        result
    }

    /// Swaps inside and outside by flipping every polygon.
    pub fn invert(&self) -> Csg {
        Csg {
            polygons: self.polygons.iter().map(Polygon::flipped).collect(),
        }
    }

    /// Applies an affine transform to every vertex.
    ///
    /// Normals are mapped with the inverse-transpose of the linear part and
    /// renormalized. Mirroring transforms reverse the winding of every
    /// polygon so that normals keep pointing outward.
    pub fn transformed(&self, transform: &Transform) -> Csg {
        Csg {
            polygons: self.polygons.iter().map(|p| transform.apply(p)).collect(),
        }
    }

    pub fn translated(&self, x: Real, y: Real, z: Real) -> Result<Csg, CsgError> {
        Ok(self.transformed(&Transform::translation(x, y, z)?))
    }

    pub fn scaled(&self, x: Real, y: Real, z: Real) -> Result<Csg, CsgError> {
        Ok(self.transformed(&Transform::scaling(x, y, z)?))
    }

    /// Reflects the solid across the plane perpendicular to `axis`.
    pub fn mirrored(&self, axis: Axis) -> Csg {
        self.transformed(&Transform::mirror(axis))
    }

    /// Bounding box of every vertex, or `None` for an empty solid.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(
            self.polygons
                .iter()
                .flat_map(|p| p.vertices().iter().map(|v| v.position())),
        )
    }

    /// Enclosed volume, by the divergence theorem over fan triangles.
    ///
    /// Meaningful only for closed, outward-wound surfaces; an inverted solid
    /// reports a negative volume.
    pub fn volume(&self) -> Real {
        let sum: Real = self
            .polygons
            .iter()
            .flat_map(Polygon::triangles)
            .map(|[a, b, c]| {
                let (a, b, c) = (a.position().coords, b.position().coords, c.position().coords);
                a.dot(&b.cross(&c))
            })
            .sum();
        sum / 6.0
    }

    /// Total area of the boundary.
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Returns `true` if `point` lies strictly inside the solid.
    ///
    /// Builds a BSP tree of the boundary for the query; build one with
    /// [`BspTree::from_polygons`] and call [`BspTree::contains_point`] to
    /// test many points.
    pub fn contains_point(&self, point: Point3<Real>) -> bool {
        BspTree::from_polygons(self.polygons.clone()).contains_point(point)
    }

    fn trees(&self, other: &Csg, tolerance: Tolerance) -> (BspTree, BspTree) {
        (
            BspTree::from_polygons_with_tolerance(self.polygons.clone(), tolerance),
            BspTree::from_polygons_with_tolerance(other.polygons.clone(), tolerance),
        )
    }

    fn combine(a: BspTree, b: BspTree) -> Csg {
        let mut polygons = a.into_polygons();
        polygons.extend(b.into_polygons());
        Csg { polygons }
    }
}

impl From<Vec<Polygon>> for Csg {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self::new(polygons)
    }
}

impl FromIterator<Polygon> for Csg {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
