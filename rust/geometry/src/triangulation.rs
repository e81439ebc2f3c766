// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr for planar polygons with holes. Roof facets are
//! rarely axis-aligned, so rings are projected onto their best-fit plane
//! before ear clipping.

use rustc_hash::FxHashSet;

use crate::{Error, Point2, Point3, Result, Vector3};

/// Below this Newell normal length a ring is treated as collinear
const DEGENERATE_NORMAL: f64 = 1e-12;

/// Check if a polygon is strictly convex (all cross products have the same
/// sign and none is zero). A ring with a collinear vertex is not fanned.
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() <= 1e-10 {
            return false;
        }

        let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
        if sign == 0 {
            sign = current_sign;
        } else if sign != current_sign {
            return false;
        }
    }

    true
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
    indices
}

#[inline]
fn earcut(vertices: &[f64], hole_indices: &[usize]) -> Result<Vec<usize>> {
    earcutr::earcut(vertices, hole_indices, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

/// Triangulate a simple polygon (no holes)
/// Returns triangle indices into the input points
#[inline]
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::DegenerateGeometry(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    // FAST PATH: Triangle - no triangulation needed
    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }

    // FAST PATH: small convex polygon - use fan triangulation
    if n <= 8 && is_convex(points) {
        return Ok(fan_triangulate(n));
    }

    let mut vertices = Vec::with_capacity(n * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    earcut(&vertices, &[])
}

/// Triangulate a polygon with holes
/// Returns triangle indices into the combined vertex array (outer + all holes)
#[inline]
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::DegenerateGeometry(
            "Need at least 3 points in outer boundary".to_string(),
        ));
    }
    if let Some(i) = holes.iter().position(|h| h.len() < 3) {
        return Err(Error::DegenerateGeometry(format!(
            "Hole {} has fewer than 3 points",
            i
        )));
    }

    if holes.is_empty() {
        return triangulate_polygon(outer);
    }

    let total_points: usize = outer.len() + holes.iter().map(|h| h.len()).sum::<usize>();
    let mut vertices = Vec::with_capacity(total_points * 2);

    for p in outer {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    // Holes are distinguished by their start offsets
    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(vertices.len() / 2);
        for p in hole {
            vertices.push(p.x);
            vertices.push(p.y);
        }
    }

    earcut(&vertices, &hole_indices)
}

/// Project 3D points onto a 2D plane defined by a normal
/// Returns 2D points and the coordinate system (u_axis, v_axis, origin)
#[inline]
pub fn project_to_2d(
    points_3d: &[Point3<f64>],
    normal: &Vector3<f64>,
) -> (Vec<Point2<f64>>, Vector3<f64>, Vector3<f64>, Point3<f64>) {
    if points_3d.is_empty() {
        return (
            Vec::new(),
            Vector3::zeros(),
            Vector3::zeros(),
            Point3::origin(),
        );
    }

    let origin = points_3d[0];

    // Find the axis least parallel to the normal for stable cross product
    let abs_x = normal.x.abs();
    let abs_y = normal.y.abs();
    let abs_z = normal.z.abs();

    let reference = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::new(1.0, 0.0, 0.0)
    } else if abs_y <= abs_z {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };

    let u_axis = normal.cross(&reference).normalize();
    let v_axis = normal.cross(&u_axis).normalize();

    let points_2d = project_to_2d_with_basis(points_3d, &u_axis, &v_axis, &origin);

    (points_2d, u_axis, v_axis, origin)
}

/// Project 3D points using an existing coordinate system
/// This ensures multiple rings of one surface use the same 2D space
#[inline]
pub fn project_to_2d_with_basis(
    points_3d: &[Point3<f64>],
    u_axis: &Vector3<f64>,
    v_axis: &Vector3<f64>,
    origin: &Point3<f64>,
) -> Vec<Point2<f64>> {
    points_3d
        .iter()
        .map(|p| {
            let v = p - origin;
            Point2::new(v.dot(u_axis), v.dot(v_axis))
        })
        .collect()
}

/// Best-fit plane normal of a ring using Newell's method.
///
/// Robust for concave and slightly warped rings. Returns `None` for collinear
/// or otherwise zero-area rings.
#[inline]
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    let len = normal.norm();
    if len > DEGENERATE_NORMAL {
        Some(normal / len)
    } else {
        None
    }
}

/// Drop consecutive duplicates, including a closing point equal to the first
pub fn open_ring(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let mut open: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if open.last() != Some(p) {
            open.push(*p);
        }
    }
    while open.len() > 1 && open.first() == open.last() {
        open.pop();
    }
    open
}

fn distinct_count(points: &[Point3<f64>]) -> usize {
    points
        .iter()
        .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
        .collect::<FxHashSet<_>>()
        .len()
}

/// Triangulated surface
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Flattened vertices: the outer ring followed by every hole
    pub positions: Vec<Point3<f64>>,
    /// Triangle indices into `positions`
    pub indices: Vec<usize>,
    /// Unit normal of the plane the rings were projected onto
    pub normal: Vector3<f64>,
}

impl Triangulation {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [self.positions[t[0]], self.positions[t[1]], self.positions[t[2]]])
    }

    /// Sum of the triangle areas
    pub fn area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() / 2.0)
            .sum()
    }
}

/// Triangulate a surface given as 3D rings: the first ring is the outer
/// boundary, the rest are holes.
///
/// Rings may be open or closed. All rings are projected onto the outer ring's
/// best-fit plane so the same 2D basis is used for the whole surface.
pub fn triangulate_rings(rings: &[Vec<Point3<f64>>]) -> Result<Triangulation> {
    let (outer, holes) = rings
        .split_first()
        .ok_or_else(|| Error::DegenerateGeometry("surface has no rings".to_string()))?;

    let outer = open_ring(outer);
    if distinct_count(&outer) < 3 {
        return Err(Error::DegenerateGeometry(format!(
            "outer ring has {} distinct points",
            distinct_count(&outer)
        )));
    }

    let holes: Vec<Vec<Point3<f64>>> = holes.iter().map(|h| open_ring(h)).collect();
    for (i, hole) in holes.iter().enumerate() {
        let distinct = distinct_count(hole);
        if distinct < 3 {
            return Err(Error::DegenerateGeometry(format!(
                "hole {} has {} distinct points",
                i, distinct
            )));
        }
    }

    let normal = calculate_polygon_normal(&outer).ok_or_else(|| {
        Error::DegenerateGeometry("outer ring is collinear".to_string())
    })?;

    let (outer_2d, u_axis, v_axis, origin) = project_to_2d(&outer, &normal);
    let holes_2d: Vec<Vec<Point2<f64>>> = holes
        .iter()
        .map(|h| project_to_2d_with_basis(h, &u_axis, &v_axis, &origin))
        .collect();

    let indices = triangulate_polygon_with_holes(&outer_2d, &holes_2d)?;

    let mut positions = outer;
    for hole in holes {
        positions.extend(hole);
    }

    if indices.is_empty() {
        return Err(Error::DegenerateGeometry(
            "triangulation produced no triangles".to_string(),
        ));
    }
    if let Some(&bad) = indices.iter().find(|&&i| i >= positions.len()) {
        return Err(Error::TriangulationError(format!(
            "index {} out of range for {} vertices",
            bad,
            positions.len()
        )));
    }

    Ok(Triangulation {
        positions,
        indices,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(min: f64, max: f64, z: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(min, min, z),
            Point3::new(max, min, z),
            Point3::new(max, max, z),
            Point3::new(min, max, z),
        ]
    }

    #[test]
    fn test_triangulate_square() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];

        let indices = triangulate_polygon(&points).unwrap();

        // Square should be split into 2 triangles = 6 indices
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn test_triangulate_insufficient_points() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(matches!(
            triangulate_polygon(&points),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_concave_quad_not_fanned() {
        // Dart with the reflex vertex at index 2; a fan from 0 would cover
        // area outside the polygon
        let dart = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.5, 0.5),
            Point2::new(1.0, 2.0),
        ];
        let indices = triangulate_polygon(&dart).unwrap();
        assert_eq!(indices.len(), 6);
        assert!(!is_convex(&dart));
    }

    #[test]
    fn test_split_eave_has_no_sliver_triangles() {
        // Bottom edge split at its midpoint, next to vertex 0
        let ring = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(!is_convex(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]));

        let tri = triangulate_rings(&[ring]).unwrap();
        assert!(tri.triangle_count() >= 2);
        for [a, b, c] in tri.triangles() {
            let area = (b - a).cross(&(c - a)).norm() / 2.0;
            assert!(area > 1e-9, "zero-area triangle {:?} {:?} {:?}", a, b, c);
        }
        assert_relative_eq!(tri.area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hole_with_two_points_rejected() {
        let outer = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ];
        let hole = vec![Point2::new(1.0, 1.0), Point2::new(2.0, 1.0)];
        assert!(matches!(
            triangulate_polygon_with_holes(&outer, &[hole]),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_polygon_normal() {
        let normal = calculate_polygon_normal(&square(0.0, 1.0, 5.0)).unwrap();
        assert_relative_eq!(normal.z.abs(), 1.0, epsilon = 1e-9);

        let collinear = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        assert!(calculate_polygon_normal(&collinear).is_none());
    }

    #[test]
    fn test_open_ring_drops_closing_point() {
        let mut ring = square(0.0, 1.0, 0.0);
        ring.push(ring[0]);
        ring.insert(1, ring[0]);
        assert_eq!(open_ring(&ring), square(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_k_gon_gives_k_minus_two_triangles() {
        // Concave, L-shaped hexagon in a tilted plane
        let flat = [
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
        ];
        let ring: Vec<Point3<f64>> = flat
            .iter()
            .map(|&(x, y)| Point3::new(x, y * 0.8, y * 0.6))
            .collect();

        let tri = triangulate_rings(&[ring]).unwrap();
        assert_eq!(tri.triangle_count(), flat.len() - 2);
        // L area is 6 in the plane; the tilt keeps lengths since 0.8^2 + 0.6^2 = 1
        assert_relative_eq!(tri.area(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_square_with_hole_excludes_hole() {
        let outer = square(0.0, 10.0, 2.0);
        let hole = square(3.0, 7.0, 2.0);

        let tri = triangulate_rings(&[outer, hole]).unwrap();
        assert_eq!(tri.triangle_count(), 8);
        assert_eq!(tri.positions.len(), 8);
        assert_relative_eq!(tri.area(), 100.0 - 16.0, epsilon = 1e-9);

        for [a, b, c] in tri.triangles() {
            let cx = (a.x + b.x + c.x) / 3.0;
            let cy = (a.y + b.y + c.y) / 3.0;
            let inside = cx > 3.0 && cx < 7.0 && cy > 3.0 && cy < 7.0;
            assert!(!inside, "triangle centroid ({}, {}) inside hole", cx, cy);
        }
    }

    #[test]
    fn test_vertical_wall_projects_correctly() {
        // Wall in the XZ plane would collapse under a fixed XY projection
        let wall = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 2.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        let tri = triangulate_rings(&[wall]).unwrap();
        assert_eq!(tri.triangle_count(), 2);
        assert_relative_eq!(tri.area(), 6.0, epsilon = 1e-9);
        assert_relative_eq!(tri.normal.y.abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_rings_rejected() {
        let two_points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            triangulate_rings(&[two_points]),
            Err(Error::DegenerateGeometry(_))
        ));

        let collinear = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(matches!(
            triangulate_rings(&[collinear]),
            Err(Error::DegenerateGeometry(_))
        ));

        assert!(matches!(
            triangulate_rings(&[]),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_indices_reference_flattened_rings() {
        let tri = triangulate_rings(&[square(0.0, 10.0, 0.0), square(2.0, 4.0, 0.0)]).unwrap();
        assert!(tri.indices.iter().all(|&i| i < tri.positions.len()));
    }
}
