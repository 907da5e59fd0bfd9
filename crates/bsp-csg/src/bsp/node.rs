//! BSP tree node implementation.

use std::mem;

use nalgebra::Point3;

use crate::{Plane3D, PlaneSide, Polygon, Real};

use super::selector::PlaneSelector;

/// A node in the BSP tree.
///
/// Each node partitions space using a splitting plane and stores polygons
/// that are coplanar with that plane, in either orientation. Polygons on the
/// front or back of the plane are stored in the respective child subtrees.
/// Each node exclusively owns its children.
#[derive(Debug, Clone)]
pub struct BspNode {
    /// The splitting plane for this node.
    plane: Plane3D,

    /// Polygons coplanar with the plane, facing either way.
    polygons: Vec<Polygon>,

    /// Subtree containing polygons in FRONT of the splitting plane.
    front: Option<Box<BspNode>>,

    /// Subtree containing polygons BEHIND the splitting plane.
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a new BSP node with the given splitting plane.
    ///
    /// The node starts with no coplanar polygons and no children.
    pub fn new(plane: Plane3D) -> Self {
        Self {
            plane,
            polygons: Vec::new(),
            front: None,
            back: None,
        }
    }

    /// Recursively builds a node from a list of polygons.
    ///
    /// The selector's plane splits every polygon in the list,
    /// including the one it came from. Returns `None` for an empty list.
    pub(crate) fn build<S: PlaneSelector>(
        polygons: Vec<Polygon>,
        selector: &S,
        epsilon: Real,
    ) -> Option<BspNode> {
        let plane = selector.splitting_plane(&polygons)?;

        let mut node = BspNode::new(plane);
        let mut front_list = Vec::new();
        let mut back_list = Vec::new();

        for polygon in &polygons {
            let split = node.plane.split_polygon_with_epsilon(polygon, epsilon);
            node.polygons.extend(split.coplanar_front);
            node.polygons.extend(split.coplanar_back);
            front_list.extend(split.front);
            back_list.extend(split.back);
        }

        node.front = BspNode::build(front_list, selector, epsilon).map(Box::new);
        node.back = BspNode::build(back_list, selector, epsilon).map(Box::new);

        Some(node)
    }

    /// Returns a reference to the splitting plane.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the polygons stored at this node.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Returns a reference to the front child subtree.
    #[inline]
    pub fn front(&self) -> Option<&BspNode> {
        self.front.as_deref()
    }

    /// Returns a reference to the back child subtree.
    #[inline]
    pub fn back(&self) -> Option<&BspNode> {
        self.back.as_deref()
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Returns the total number of polygons in this subtree (including all descendants).
    pub fn polygon_count(&self) -> usize {
        let mut count = self.polygons.len();

        if let Some(ref front) = self.front {
            count += front.polygon_count();
        }
        if let Some(ref back) = self.back {
            count += back.polygon_count();
        }

        count
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        let front_depth = self.front.as_ref().map_or(0, |n| n.depth());
        let back_depth = self.back.as_ref().map_or(0, |n| n.depth());
        1 + front_depth.max(back_depth)
    }

    /// Swaps solid and empty space for the whole subtree.
    ///
    /// Flips every stored polygon and every splitting plane, and swaps the
    /// front and back children of every node.
    pub(crate) fn invert(&mut self) {
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            node.polygons.iter_mut().for_each(Polygon::flip);
            node.plane = node.plane.flipped();
            mem::swap(&mut node.front, &mut node.back);

            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Removes the parts of `polygons` that lie inside the solid of this subtree.
    ///
    /// Fragments that fall behind a node without a back child are discarded;
    /// fragments in front of a node without a front child are kept.
    pub(crate) fn clip_polygons(&self, polygons: Vec<Polygon>, epsilon: Real) -> Vec<Polygon> {
        let mut front_list = Vec::with_capacity(polygons.len());
        let mut back_list = Vec::with_capacity(polygons.len());

        for polygon in &polygons {
            let split = self.plane.split_polygon_with_epsilon(polygon, epsilon);
            front_list.extend(split.coplanar_front);
            front_list.extend(split.front);
            back_list.extend(split.coplanar_back);
            back_list.extend(split.back);
        }

        let mut result = match self.front {
            Some(ref front) => front.clip_polygons(front_list, epsilon),
            None => front_list,
        };
        if let Some(ref back) = self.back {
            result.extend(back.clip_polygons(back_list, epsilon));
        }

        result
    }

    /// Replaces the polygons of this subtree with the result of clipping them
    /// against `other`.
    pub(crate) fn clip_to(&mut self, other: &BspNode, epsilon: Real) {
        let polygons = mem::take(&mut self.polygons);
        self.polygons = other.clip_polygons(polygons, epsilon);

        if let Some(ref mut front) = self.front {
            front.clip_to(other, epsilon);
        }
        if let Some(ref mut back) = self.back {
            back.clip_to(other, epsilon);
        }
    }

    /// Collects this node's polygons, then the front subtree's, then the back subtree's.
    pub(crate) fn collect_polygons(&self, result: &mut Vec<Polygon>) {
        result.extend(self.polygons.iter().cloned());
        if let Some(ref front) = self.front {
            front.collect_polygons(result);
        }
        if let Some(ref back) = self.back {
            back.collect_polygons(result);
        }
    }

    pub(crate) fn into_polygons(self, result: &mut Vec<Polygon>) {
        result.extend(self.polygons);
        if let Some(front) = self.front {
            front.into_polygons(result);
        }
        if let Some(back) = self.back {
            back.into_polygons(result);
        }
    }

    /// Returns `true` if `point` lies inside the solid this subtree encodes.
    ///
    /// Points on a splitting plane are resolved towards the front side.
    pub(crate) fn contains_point(&self, point: Point3<Real>, epsilon: Real) -> bool {
        let mut node = self;
        loop {
            node = match node.plane.classify_point_with_epsilon(point, epsilon) {
                PlaneSide::Front | PlaneSide::OnPlane => match node.front() {
                    Some(front) => front,
                    None => return false,
                },
                PlaneSide::Back => match node.back() {
                    Some(back) => back,
                    None => return true,
                },
            };
        }
    }
}
