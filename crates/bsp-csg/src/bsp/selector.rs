//! Choosing the splitting plane of each node.

use crate::{Plane3D, Polygon};

/// Picks the plane that partitions a list of polygons during construction.
pub trait PlaneSelector {
    /// Returns the splitting plane for `polygons`, or `None` if the list is
    /// empty. The plane should be one of the polygons' own planes so the
    /// tree stays a partition of the input surface.
    fn splitting_plane(&self, polygons: &[Polygon]) -> Option<Plane3D>;
}

/// Splits on the plane of the first polygon in the list.
///
/// Results depend only on input order, which keeps boolean operations
/// reproducible. [`Csg`](crate::Csg) always builds with this selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygon;

impl PlaneSelector for FirstPolygon {
    fn splitting_plane(&self, polygons: &[Polygon]) -> Option<Plane3D> {
        polygons.first().map(|p| p.plane().clone())
    }
}
