//! Planar polygon representation for BSP trees.

use nalgebra::{Point3, Vector3};

use crate::{Classification, CsgError, PLANE_EPSILON, Plane3D, Real, Vertex};

/// A convex planar polygon in 3D space, defined by an ordered list of vertices.
///
/// Vertices are in counter-clockwise winding order when viewed from the
/// front (the direction the plane normal points). The plane is derived from
/// the first three vertices when the polygon is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    plane: Plane3D,
}

impl Polygon {
    /// Creates a new polygon from a list of vertices.
    ///
    /// Fails if fewer than 3 vertices are provided, if any coordinate is not
    /// finite, if a vertex normal has zero length, if the first three
    /// vertices are collinear, or if a later vertex is further than
    /// [`PLANE_EPSILON`] from their plane.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self, CsgError> {
        if vertices.len() < 3 {
            return Err(CsgError::TooFewVertices {
                count: vertices.len(),
            });
        }
        if !vertices.iter().all(Vertex::is_finite) {
            return Err(CsgError::NonFiniteCoordinate);
        }
        if vertices.iter().any(|v| v.normal().norm() <= Real::EPSILON) {
            return Err(CsgError::ZeroNormal);
        }
        let plane = Plane3D::from_vertices(&vertices[0], &vertices[1], &vertices[2])?;
        if let Some(distance) = Self::off_plane_distance(&vertices, &plane) {
            return Err(CsgError::NonPlanarPolygon { distance });
        }
        Ok(Self { vertices, plane })
    }

    /// Creates a polygon whose vertices lie on a known plane, such as a
    /// fragment produced by splitting a parent polygon.
    pub(crate) fn with_plane(vertices: Vec<Vertex>, plane: Plane3D) -> Self {
        debug_assert!(vertices.len() >= 3);
        Self { vertices, plane }
    }

    /// Distance of the first vertex that lies off `plane`, if any.
    fn off_plane_distance(vertices: &[Vertex], plane: &Plane3D) -> Option<Real> {
        vertices[3..]
            .iter()
            .map(|v| plane.signed_distance(v.position()).abs())
            .find(|d| *d > PLANE_EPSILON)
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the plane that this polygon lies on.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the polygon with reversed winding, negated vertex normals and
    /// a flipped plane.
    pub fn flipped(&self) -> Self {
        Self {
            vertices: self.vertices.iter().rev().map(Vertex::flipped).collect(),
            plane: self.plane.flipped(),
        }
    }

    /// Flips the polygon in place. See [`Polygon::flipped`].
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for vertex in &mut self.vertices {
            *vertex = vertex.flipped();
        }
        self.plane = self.plane.flipped();
    }

    /// Computes the centroid (vertex average) of the polygon.
    pub fn centroid(&self) -> Point3<Real> {
        let sum: Vector3<Real> = self.vertices.iter().map(|v| v.position().coords).sum();
        Point3::from(sum / self.vertices.len() as Real)
    }

    /// Computes the area of the polygon.
    pub fn area(&self) -> Real {
        let origin = self.vertices[0].position();
        let doubled: Vector3<Real> = self
            .vertices
            .windows(2)
            .map(|w| (w[0].position() - origin).cross(&(w[1].position() - origin)))
            .sum();
        doubled.dot(&self.plane.normal()).abs() * 0.5
    }

    /// Fan-triangulates the polygon from its first vertex.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        let first = &self.vertices[0];
        self.vertices[1..]
            .windows(2)
            .map(move |w| [first, &w[0], &w[1]])
    }

    /// Classifies this polygon relative to a plane using `PLANE_EPSILON`.
    pub fn classify(&self, plane: &Plane3D) -> Classification {
        self.classify_with_epsilon(plane, PLANE_EPSILON)
    }

    /// Classifies this polygon relative to a plane.
    ///
    /// Returns:
    /// - `Front` if no vertex is behind the plane and some are in front
    /// - `Back` if no vertex is in front of the plane and some are behind
    /// - `Coplanar` if all vertices lie on the plane
    /// - `Spanning` if vertices are on both sides
    pub fn classify_with_epsilon(&self, plane: &Plane3D, epsilon: Real) -> Classification {
        self.vertices
            .iter()
            .map(|v| plane.classify_point_with_epsilon(v.position(), epsilon))
            .fold(Classification::Coplanar, |acc, side| acc | side)
    }

    pub(crate) fn map_vertices(&self, f: impl Fn(&Vertex) -> Vertex) -> Vec<Vertex> {
        self.vertices.iter().map(f).collect()
    }
}

impl From<&Polygon> for Plane3D {
    fn from(polygon: &Polygon) -> Self {
        polygon.plane.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_polygon_checked(points: &[[Real; 3]]) -> Result<Polygon, CsgError> {
        Polygon::new(
            points
                .iter()
                .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
                .collect(),
        )
    }

    fn make_polygon(points: &[[Real; 3]]) -> Polygon {
        make_polygon_checked(points).unwrap()
    }

    fn unit_square() -> Polygon {
        make_polygon(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
    }

    #[test]
    fn new_rejects_too_few_vertices() {
        let result = Polygon::new(vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
        ]);
        assert_eq!(result, Err(CsgError::TooFewVertices { count: 2 }));
    }

    #[test]
    fn new_rejects_collinear_vertices() {
        let result = Polygon::new(vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(2.0, 0.0, 0.0), Vector3::z()),
        ]);
        assert_eq!(result, Err(CsgError::DegeneratePolygon));
    }

    #[test]
    fn new_rejects_non_finite_coordinates() {
        let result = Polygon::new(vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(Real::NAN, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
        ]);
        assert_eq!(result, Err(CsgError::NonFiniteCoordinate));
    }

    #[test]
    fn new_rejects_zero_normals() {
        let result = Polygon::new(vec![
            Vertex::new(Point3::origin(), Vector3::zeros()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::zeros()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::zeros()),
        ]);
        assert_eq!(result, Err(CsgError::ZeroNormal));
    }

    #[test]
    fn new_rejects_thin_slivers() {
        let result = Polygon::new(vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(1e-7, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(1e-8, 1e-9, 0.0), Vector3::z()),
        ]);
        assert_eq!(result, Err(CsgError::DegeneratePolygon));
    }

    #[test]
    fn new_rejects_non_planar_vertices() {
        let result = make_polygon_checked(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.5],
            [0.0, 1.0, 0.0],
        ]);
        match result {
            Err(CsgError::NonPlanarPolygon { distance }) => assert!(distance > 0.1),
            other => panic!("expected a planarity error, got {other:?}"),
        }

        // Within the plane tolerance is fine.
        assert!(make_polygon_checked(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 1e-7],
            [0.0, 1.0, 0.0],
        ])
        .is_ok());
    }

    #[test]
    fn plane_derived_from_winding() {
        let square = unit_square();
        assert_relative_eq!(square.plane().normal(), Vector3::z());
        assert_relative_eq!(square.plane().offset(), 0.0);
    }

    #[test]
    fn flipped_reverses_winding_and_normals() {
        let square = unit_square();
        let flipped = square.flipped();

        assert_relative_eq!(flipped.plane().normal(), -Vector3::z());
        assert_eq!(flipped.vertices()[0].position(), square.vertices()[3].position());
        assert!(flipped.vertices().iter().all(|v| v.normal() == -Vector3::z()));
        assert_eq!(flipped.flipped(), square);

        let mut in_place = square.clone();
        in_place.flip();
        assert_eq!(in_place, flipped);
    }

    #[test]
    fn area_and_centroid() {
        let square = unit_square();
        assert_relative_eq!(square.area(), 1.0);
        assert_relative_eq!(square.flipped().area(), 1.0);
        assert_relative_eq!(square.centroid(), Point3::new(0.5, 0.5, 0.0));

        let triangle = make_polygon(&[[0.0, 0.0, 2.0], [4.0, 0.0, 2.0], [0.0, 3.0, 2.0]]);
        assert_relative_eq!(triangle.area(), 6.0);
    }

    #[test]
    fn triangles_fan_from_first_vertex() {
        let square = unit_square();
        let tris: Vec<_> = square.triangles().collect();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[1][0].position(), square.vertices()[0].position());
        assert_eq!(tris[1][2].position(), square.vertices()[3].position());
    }

    #[test]
    fn classify_against_planes() {
        let square = unit_square();

        assert_eq!(
            square.classify(&Plane3D::new(Vector3::z(), -1.0)),
            Classification::Front
        );
        assert_eq!(
            square.classify(&Plane3D::new(Vector3::z(), 1.0)),
            Classification::Back
        );
        assert_eq!(
            square.classify(&Plane3D::new(Vector3::z(), 0.0)),
            Classification::Coplanar
        );
        assert_eq!(
            square.classify(&Plane3D::new(Vector3::x(), 0.5)),
            Classification::Spanning
        );
        // Touching along an edge only counts as the side the rest lies on.
        assert_eq!(
            square.classify(&Plane3D::new(Vector3::x(), 0.0)),
            Classification::Front
        );
    }
}
