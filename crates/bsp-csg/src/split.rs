//! Polygon splitting against a plane.

use crate::{Classification, PLANE_EPSILON, Plane3D, PlaneSide, Polygon, Real};

/// Result of splitting one polygon by a plane.
///
/// A polygon lands in at most one of the coplanar buckets, or in `front`
/// and/or `back` (both only when it spans the plane).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonSplit {
    /// Coplanar, facing the same direction as the plane.
    pub coplanar_front: Option<Polygon>,
    /// Coplanar, facing away from the plane.
    pub coplanar_back: Option<Polygon>,
    /// The part in front of the plane.
    pub front: Option<Polygon>,
    /// The part behind the plane.
    pub back: Option<Polygon>,
}

impl PolygonSplit {
    /// Iterates over every non-empty bucket.
    pub fn pieces(&self) -> impl Iterator<Item = &Polygon> {
        [
            &self.coplanar_front,
            &self.coplanar_back,
            &self.front,
            &self.back,
        ]
        .into_iter()
        .flatten()
    }
}

impl Plane3D {
    /// Splits a polygon by this plane using `PLANE_EPSILON`.
    pub fn split_polygon(&self, polygon: &Polygon) -> PolygonSplit {
        self.split_polygon_with_epsilon(polygon, PLANE_EPSILON)
    }

    /// Splits a polygon by this plane.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back` depending on
    /// whether their own plane faces the same way as this one. Polygons wholly
    /// on one side are returned unchanged. Spanning polygons are cut: vertices
    /// on the plane are shared by both halves, and every edge running from
    /// front to back contributes one interpolated vertex to each half.
    pub fn split_polygon_with_epsilon(&self, polygon: &Polygon, epsilon: Real) -> PolygonSplit {
        let sides: Vec<PlaneSide> = polygon
            .vertices()
            .iter()
            .map(|v| self.classify_point_with_epsilon(v.position(), epsilon))
            .collect();
        let kind = sides
            .iter()
            .fold(Classification::Coplanar, |acc, &side| acc | side);

        match kind {
            Classification::Coplanar => {
                if self.faces_same_direction(polygon.plane()) {
                    PolygonSplit {
                        coplanar_front: Some(polygon.clone()),
                        ..Default::default()
                    }
                } else {
                    PolygonSplit {
                        coplanar_back: Some(polygon.clone()),
                        ..Default::default()
                    }
                }
            }
            Classification::Front => PolygonSplit {
                front: Some(polygon.clone()),
                ..Default::default()
            },
            Classification::Back => PolygonSplit {
                back: Some(polygon.clone()),
                ..Default::default()
            },
            Classification::Spanning => self.cut_spanning(polygon, &sides),
        }
    }

    /// Sutherland-Hodgman style walk over the edges of a spanning polygon.
    fn cut_spanning(&self, polygon: &Polygon, sides: &[PlaneSide]) -> PolygonSplit {
        let vertices = polygon.vertices();
        let n = vertices.len();

        let mut front_verts = Vec::with_capacity(n + 1);
        let mut back_verts = Vec::with_capacity(n + 1);

        for i in 0..n {
            let j = (i + 1) % n;
            let (current, next) = (&vertices[i], &vertices[j]);
            let (current_side, next_side) = (sides[i], sides[j]);

            match current_side {
                PlaneSide::Front => front_verts.push(current.clone()),
                PlaneSide::Back => back_verts.push(current.clone()),
                PlaneSide::OnPlane => {
                    front_verts.push(current.clone());
                    back_verts.push(current.clone());
                }
            }

            let crosses = matches!(
                (current_side, next_side),
                (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
            );
            if crosses {
                if let Some(t) = self.intersection_parameter(current.position(), next.position()) {
                    let cut = current.lerp(next, t);
                    front_verts.push(cut.clone());
                    back_verts.push(cut);
                }
            }
        }

        let close = |verts: Vec<_>| {
            (verts.len() >= 3).then(|| Polygon::with_plane(verts, polygon.plane().clone()))
        };

        PolygonSplit {
            front: close(front_verts),
            back: close(back_verts),
            ..Default::default()
        }
    }
}
