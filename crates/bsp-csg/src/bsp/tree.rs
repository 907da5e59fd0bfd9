//! BSP tree container and construction.

use nalgebra::Point3;
use tracing::trace;

use crate::{Polygon, Real, Tolerance};

use super::node::BspNode;
use super::selector::{FirstPolygon, PlaneSelector};

/// A Binary Space Partitioning tree for 3D polygons.
///
/// An empty tree has no root and encodes no solid: clipping against it is
/// the identity. The tree remembers the [`Tolerance`] it was built with and
/// uses it for every later classification.
///
/// # Construction
///
/// ```ignore
/// use bsp_csg::{BspTree, FirstPolygon};
///
/// let polygons: Vec<Polygon> = /* ... */;
/// let tree = BspTree::build(polygons, &FirstPolygon);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BspTree {
    root: Option<BspNode>,
    tolerance: Tolerance,
}

impl BspTree {
    /// Creates an empty BSP tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a BSP tree from a collection of polygons.
    ///
    /// Uses the provided [`PlaneSelector`] to choose splitting planes during
    /// construction. Polygons that span a splitting plane are split.
    ///
    /// Returns an empty tree if the input is empty.
    pub fn build<S: PlaneSelector>(polygons: Vec<Polygon>, selector: &S) -> Self {
        Self::build_with_tolerance(polygons, selector, Tolerance::default())
    }

    /// Builds a BSP tree classifying against planes with `tolerance`.
    pub fn build_with_tolerance<S: PlaneSelector>(
        polygons: Vec<Polygon>,
        selector: &S,
        tolerance: Tolerance,
    ) -> Self {
        let input = polygons.len();
        let root = BspNode::build(polygons, selector, tolerance.plane);
        trace!(input, depth = root.as_ref().map_or(0, BspNode::depth), "built BSP tree");
        Self { root, tolerance }
    }

    /// Builds a BSP tree using the default plane selector ([`FirstPolygon`]).
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self::build(polygons, &FirstPolygon)
    }

    /// Builds a BSP tree with [`FirstPolygon`] and the given tolerance.
    pub fn from_polygons_with_tolerance(polygons: Vec<Polygon>, tolerance: Tolerance) -> Self {
        Self::build_with_tolerance(polygons, &FirstPolygon, tolerance)
    }

    /// Returns `true` if the tree contains no polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a reference to the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&BspNode> {
        self.root.as_ref()
    }

    /// Returns the tolerance the tree classifies with.
    #[inline]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Returns the total number of polygons in the tree.
    pub fn polygon_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.polygon_count())
    }

    /// Returns the maximum depth of the tree (0 for empty tree).
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.depth())
    }

    /// Converts solid space to empty space and vice versa.
    pub fn invert(&mut self) {
        if let Some(ref mut root) = self.root {
            root.invert();
        }
    }

    /// Removes the parts of `polygons` that are inside this tree's solid.
    ///
    /// An empty tree passes every polygon through.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        match self.root {
            Some(ref root) => root.clip_polygons(polygons, self.tolerance.plane),
            None => polygons,
        }
    }

    /// Removes all polygons in this tree that are inside `other`'s solid.
    pub fn clip_to(&mut self, other: &BspTree) {
        let (Some(root), Some(other_root)) = (self.root.as_mut(), other.root.as_ref()) else {
            return;
        };
        root.clip_to(other_root, other.tolerance.plane);
    }

    /// Collects all polygons in the tree into a vector.
    ///
    /// Order is node first, then the front subtree, then the back subtree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::with_capacity(self.polygon_count());
        if let Some(ref root) = self.root {
            root.collect_polygons(&mut result);
        }
        result
    }

    /// Consumes the tree, returning its polygons in [`BspTree::all_polygons`] order.
    pub fn into_polygons(self) -> Vec<Polygon> {
        let mut result = Vec::new();
        if let Some(root) = self.root {
            root.into_polygons(&mut result);
        }
        result
    }

    /// Returns `true` if `point` is inside the solid bounded by the tree's
    /// polygons. The polygons must form a closed surface.
    pub fn contains_point(&self, point: Point3<Real>) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.contains_point(point, self.tolerance.plane))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vertex;
    use nalgebra::Vector3;

    fn make_triangle(a: [Real; 3], b: [Real; 3], c: [Real; 3]) -> Polygon {
        Polygon::new(
            [a, b, c]
                .iter()
                .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
                .collect(),
        )
        .unwrap()
    }

    fn quad(points: [[Real; 3]; 4]) -> Polygon {
        Polygon::new(
            points
                .iter()
                .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
                .collect(),
        )
        .unwrap()
    }

    /// Axis-aligned cube from `min` to `max`, faces wound outward.
    fn cube(min: [Real; 3], max: [Real; 3]) -> Vec<Polygon> {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;
        vec![
            quad([[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]]),
            quad([[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]),
            quad([[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]]),
            quad([[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]]),
            quad([[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
            quad([[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]]),
        ]
    }

    #[test]
    fn empty_tree() {
        let tree = BspTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.polygon_count(), 0);
        assert_eq!(tree.depth(), 0);
        assert!(!tree.contains_point(Point3::origin()));
    }

    #[test]
    fn build_empty() {
        let tree = BspTree::from_polygons(vec![]);
        assert!(tree.is_empty());
    }

    #[test]
    fn build_single_polygon() {
        let poly = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let tree = BspTree::from_polygons(vec![poly]);

        assert!(!tree.is_empty());
        assert_eq!(tree.polygon_count(), 1);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn build_coplanar_same_facing() {
        let poly1 = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let poly2 = make_triangle([1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0]);

        let tree = BspTree::from_polygons(vec![poly1, poly2]);

        assert_eq!(tree.polygon_count(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root().unwrap().polygons().len(), 2);
    }

    #[test]
    fn clip_against_empty_tree_is_identity() {
        let polys = cube([0.0; 3], [1.0; 3]);
        let tree = BspTree::new();
        assert_eq!(tree.clip_polygons(polys.clone()), polys);

        let mut full = BspTree::from_polygons(polys.clone());
        full.clip_to(&tree);
        assert_eq!(full.polygon_count(), 6);
    }

    #[test]
    fn cube_tree_contains_interior_points() {
        let tree = BspTree::from_polygons(cube([0.0; 3], [1.0; 3]));

        assert_eq!(tree.polygon_count(), 6);
        assert!(tree.contains_point(Point3::new(0.5, 0.5, 0.5)));
        assert!(tree.contains_point(Point3::new(0.1, 0.9, 0.2)));
        assert!(!tree.contains_point(Point3::new(1.5, 0.5, 0.5)));
        assert!(!tree.contains_point(Point3::new(0.5, -0.1, 0.5)));
    }

    #[test]
    fn invert_swaps_inside_and_outside() {
        let mut tree = BspTree::from_polygons(cube([0.0; 3], [1.0; 3]));
        tree.invert();

        assert!(!tree.contains_point(Point3::new(0.5, 0.5, 0.5)));
        assert!(tree.contains_point(Point3::new(2.0, 0.5, 0.5)));
        assert_eq!(tree.polygon_count(), 6);
    }

    #[test]
    fn clip_removes_polygons_inside_solid() {
        let tree = BspTree::from_polygons(cube([0.0; 3], [1.0; 3]));

        let inside = make_triangle([0.2, 0.2, 0.5], [0.8, 0.2, 0.5], [0.2, 0.8, 0.5]);
        let outside = make_triangle([2.0, 0.2, 0.5], [2.8, 0.2, 0.5], [2.2, 0.8, 0.5]);

        let clipped = tree.clip_polygons(vec![inside, outside.clone()]);
        assert_eq!(clipped, vec![outside]);
    }

    #[test]
    fn clip_to_keeps_only_outside_surface() {
        let mut a = BspTree::from_polygons(cube([0.0; 3], [1.0; 3]));
        let b = BspTree::from_polygons(cube([0.5, 0.0, 0.0], [1.5, 1.0, 1.0]));

        a.clip_to(&b);

        let total: Real = a.all_polygons().iter().map(Polygon::area).sum();
        // The right face at x=1 lies inside b and is removed. The side faces
        // survive whole: their halves over b are coplanar with b's faces and
        // face the same way, so they are kept.
        assert!((total - 5.0).abs() < 1e-9, "area {total}");
        assert_eq!(a.polygon_count(), 9);
    }

    #[test]
    fn into_polygons_matches_all_polygons() {
        let tree = BspTree::from_polygons(cube([0.0; 3], [1.0; 3]));
        let all = tree.all_polygons();
        assert_eq!(tree.into_polygons(), all);
    }

    #[test]
    fn tolerance_is_recorded() {
        let tolerance = Tolerance::new(1e-3).unwrap();
        let tree = BspTree::from_polygons_with_tolerance(cube([0.0; 3], [1.0; 3]), tolerance);
        assert_eq!(tree.tolerance(), tolerance);
    }
}
