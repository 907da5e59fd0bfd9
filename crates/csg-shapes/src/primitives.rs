//! Polygon generators for the primitive solids.

use std::f64::consts::{PI, TAU};

use bsp_csg::{Csg, CsgError, Polygon, Real, Vertex};
use nalgebra::{Point3, Vector3};

use crate::FacetContext;

/// Corner indices and outward normal of each cube face. Bit 0 of a corner
/// index selects +x, bit 1 selects +y, bit 2 selects +z.
const CUBE_FACES: [([usize; 4], [Real; 3]); 6] = [
    ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
    ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
    ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
];

fn positive(name: &'static str, value: Real) -> Result<Real, CsgError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CsgError::InvalidDimension { name, value })
    }
}

/// Box of the given size centered at the origin.
pub(crate) fn cube(size: &Vector3<Real>) -> Result<Csg, CsgError> {
    let half = Vector3::new(
        positive("cube width", size.x)? / 2.0,
        positive("cube depth", size.y)? / 2.0,
        positive("cube height", size.z)? / 2.0,
    );
    let corner = |i: usize| {
        let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
        Point3::new(sign(1) * half.x, sign(2) * half.y, sign(4) * half.z)
    };

    CUBE_FACES
        .iter()
        .map(|(indices, n)| {
            let normal = Vector3::new(n[0], n[1], n[2]);
            Polygon::new(indices.iter().map(|&i| Vertex::new(corner(i), normal)).collect())
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Csg::new)
}

/// UV sphere centered at the origin: `segments` slices around the z axis
/// and half as many stacks from pole to pole.
pub(crate) fn sphere(radius: Real, context: &FacetContext) -> Result<Csg, CsgError> {
    let radius = positive("sphere radius", radius)?;
    let slices = context.segments() as usize;
    let stacks = (slices / 2).max(2);

    let vertex = |i: usize, j: usize| {
        let theta = TAU * i as Real / slices as Real;
        let phi = PI * j as Real / stacks as Real;
        let dir = Vector3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos());
        Vertex::new(Point3::from(dir * radius), dir)
    };

    let mut polygons = Vec::with_capacity(slices * stacks);
    for i in 0..slices {
        for j in 0..stacks {
            let mut vertices = vec![vertex(i, j), vertex(i, j + 1)];
            if j + 1 < stacks {
                vertices.push(vertex(i + 1, j + 1));
            }
            if j > 0 {
                vertices.push(vertex(i + 1, j));
            }
            polygons.push(Polygon::new(vertices)?);
        }
    }
    Ok(Csg::new(polygons))
}

/// Cylinder along the z axis, centered at the origin.
pub(crate) fn cylinder(radius: Real, height: Real, context: &FacetContext) -> Result<Csg, CsgError> {
    let radius = positive("cylinder radius", radius)?;
    let half = positive("cylinder height", height)? / 2.0;
    let sides = context.segments() as usize;

    let rim: Vec<Vector3<Real>> = (0..sides)
        .map(|i| {
            let theta = TAU * i as Real / sides as Real;
            Vector3::new(theta.cos(), theta.sin(), 0.0)
        })
        .collect();
    let at = |dir: &Vector3<Real>, z: Real| Point3::new(dir.x * radius, dir.y * radius, z);

    let mut polygons = Vec::with_capacity(sides + 2);

    let top = rim
        .iter()
        .map(|d| Vertex::new(at(d, half), Vector3::z()))
        .collect();
    polygons.push(Polygon::new(top)?);

    let bottom = rim
        .iter()
        .rev()
        .map(|d| Vertex::new(at(d, -half), -Vector3::z()))
        .collect();
    polygons.push(Polygon::new(bottom)?);

    for i in 0..sides {
        let (a, b) = (&rim[i], &rim[(i + 1) % sides]);
        polygons.push(Polygon::new(vec![
            Vertex::new(at(a, -half), *a),
            Vertex::new(at(b, -half), *b),
            Vertex::new(at(b, half), *b),
            Vertex::new(at(a, half), *a),
        ])?);
    }

    Ok(Csg::new(polygons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_outward(csg: &Csg) {
        for polygon in csg.polygons() {
            let outward = polygon.centroid().coords;
            assert!(
                polygon.plane().normal().dot(&outward) > 0.0,
                "face at {:?} points inward",
                polygon.centroid()
            );
        }
    }

    #[test]
    fn cube_matches_size_and_winding() {
        let cube = cube(&Vector3::new(2.0, 4.0, 6.0)).unwrap();

        assert_eq!(cube.len(), 6);
        assert_relative_eq!(cube.volume(), 48.0, epsilon = 1e-12);
        let bounds = cube.bounding_box().unwrap();
        assert_relative_eq!(bounds.min, Point3::new(-1.0, -2.0, -3.0));
        assert_relative_eq!(bounds.max, Point3::new(1.0, 2.0, 3.0));
        assert_outward(&cube);
        for polygon in cube.polygons() {
            let normal = polygon.vertices()[0].normal();
            assert_relative_eq!(polygon.plane().normal(), normal);
        }
    }

    #[test]
    fn cube_rejects_non_positive_sizes() {
        assert_eq!(
            cube(&Vector3::new(1.0, 0.0, 1.0)),
            Err(CsgError::InvalidDimension {
                name: "cube depth",
                value: 0.0
            })
        );
        assert!(cube(&Vector3::new(1.0, 1.0, Real::NAN)).is_err());
    }

    #[test]
    fn sphere_approaches_analytic_volume() {
        let context = FacetContext::new(64).unwrap();
        let sphere = sphere(2.0, &context).unwrap();

        assert_eq!(sphere.len(), 64 * 32);
        assert_outward(&sphere);
        let exact = 4.0 / 3.0 * PI * 8.0;
        assert!(sphere.volume() < exact);
        assert!(sphere.volume() > exact * 0.98);
    }

    #[test]
    fn coarse_sphere_is_still_closed() {
        let context = FacetContext::new(3).unwrap();
        let sphere = sphere(1.0, &context).unwrap();

        // 3 slices, 2 stacks: triangles only.
        assert_eq!(sphere.len(), 6);
        assert!(sphere.polygons().iter().all(|p| p.len() == 3));
        assert!(sphere.volume() > 0.0);
    }

    #[test]
    fn cylinder_volume_and_caps() {
        let context = FacetContext::new(6).unwrap();
        let cylinder = cylinder(1.0, 2.0, &context).unwrap();

        assert_eq!(cylinder.len(), 8);
        assert_outward(&cylinder);
        // Regular hexagon of circumradius 1 has area 3√3/2.
        let expected = 3.0 * 3.0_f64.sqrt() / 2.0 * 2.0;
        assert_relative_eq!(cylinder.volume(), expected, epsilon = 1e-12);
    }

    #[test]
    fn cylinder_rejects_bad_dimensions() {
        let context = FacetContext::default();
        assert!(cylinder(-1.0, 1.0, &context).is_err());
        assert!(cylinder(1.0, 0.0, &context).is_err());
    }
}
