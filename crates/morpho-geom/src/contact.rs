//! Triangle-triangle contact test.
//!
//! Contact between two cell surfaces means either real interpenetration
//! (segmentation meshes of touching cells typically overlap slightly) or
//! an exactly shared coplanar interface. Triangles that merely touch
//! along an edge or at a vertex are not in contact; counting them would
//! inflate interface areas with faces that only graze the neighbor.

use crate::Triangle;
use nalgebra::Vector3;

/// Default geometric tolerance for contact tests, in modeling units.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Test whether two triangles are in surface contact.
///
/// Returns `true` iff the triangles penetrate each other (each strictly
/// straddles the other's supporting plane and their intersection
/// intervals on the common line overlap by more than `tolerance`), or
/// are coplanar with interiors overlapping in more than `tolerance` of
/// area.
///
/// Degenerate (zero-area) triangles are never in contact.
///
/// # Example
///
/// ```
/// use morpho_geom::{triangles_contact, Triangle, Point3};
///
/// let a = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(0.0, 2.0, 0.0),
/// );
/// // Pierces a vertically
/// let b = Triangle::new(
///     Point3::new(0.5, 0.5, -1.0),
///     Point3::new(0.5, 0.5, 1.0),
///     Point3::new(1.5, 0.5, 1.0),
/// );
/// assert!(triangles_contact(&a, &b, 1e-9));
/// ```
#[must_use]
pub fn triangles_contact(a: &Triangle, b: &Triangle, tolerance: f64) -> bool {
    let Some(na) = a.normal() else { return false };
    let Some(nb) = b.normal() else { return false };

    // Signed distances of each triangle's vertices to the other's plane,
    // snapped to zero within tolerance.
    let db = plane_distances(a, b, &nb, tolerance);
    let da = plane_distances(b, a, &na, tolerance);

    if db.iter().all(|&d| d == 0.0) {
        return coplanar_overlap(a, b, &na, tolerance);
    }

    // Both triangles must strictly cross the other's plane; touching
    // from one side only is not contact.
    if !straddles(&db) || !straddles(&da) {
        return false;
    }

    // Möller interval test on the plane intersection line.
    let dir = na.cross(&nb);
    let norm = dir.norm();
    if norm < f64::EPSILON {
        return false;
    }
    let dir = dir / norm;

    let (a_min, a_max) = line_interval(a, &db, &dir);
    let (b_min, b_max) = line_interval(b, &da, &dir);

    a_max.min(b_max) - a_min.max(b_min) > tolerance
}

/// Signed distances of `tri`'s vertices to the supporting plane of
/// `plane_tri`, snapped to zero within tolerance.
fn plane_distances(tri: &Triangle, plane_tri: &Triangle, unit_normal: &Vector3<f64>, tolerance: f64) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (d, v) in out.iter_mut().zip(tri.vertices()) {
        let dist = unit_normal.dot(&(v - plane_tri.v0));
        *d = if dist.abs() <= tolerance { 0.0 } else { dist };
    }
    out
}

/// True if the snapped distances contain both a strictly positive and a
/// strictly negative value.
fn straddles(d: &[f64; 3]) -> bool {
    d.iter().any(|&x| x > 0.0) && d.iter().any(|&x| x < 0.0)
}

/// Interval covered by a plane-crossing triangle on the intersection
/// line, parameterized by projection onto `dir`.
fn line_interval(tri: &Triangle, d: &[f64; 3], dir: &Vector3<f64>) -> (f64, f64) {
    let v = tri.vertices();
    let p = [
        dir.dot(&v[0].coords),
        dir.dot(&v[1].coords),
        dir.dot(&v[2].coords),
    ];

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut push = |t: f64| {
        min = min.min(t);
        max = max.max(t);
    };

    for i in 0..3 {
        let j = (i + 1) % 3;
        if d[i] == 0.0 {
            // Vertex lies on the plane: it is itself a crossing point.
            push(p[i]);
        }
        if d[i] * d[j] < 0.0 {
            push(p[i] + (p[j] - p[i]) * d[i] / (d[i] - d[j]));
        }
    }

    (min, max)
}

/// 2D overlap test for coplanar triangles: clip `a` by `b` and require
/// positive intersection area. Triangles sharing only an edge clip to a
/// zero-area sliver and do not overlap.
fn coplanar_overlap(a: &Triangle, b: &Triangle, unit_normal: &Vector3<f64>, tolerance: f64) -> bool {
    // Project onto the plane's dominant axis pair.
    let drop = if unit_normal.x.abs() >= unit_normal.y.abs()
        && unit_normal.x.abs() >= unit_normal.z.abs()
    {
        0
    } else if unit_normal.y.abs() >= unit_normal.z.abs() {
        1
    } else {
        2
    };
    let flatten = |t: &Triangle| -> Vec<[f64; 2]> {
        t.vertices()
            .iter()
            .map(|v| match drop {
                0 => [v.y, v.z],
                1 => [v.z, v.x],
                _ => [v.x, v.y],
            })
            .collect()
    };

    let subject = flatten(a);
    let mut clip = flatten(b);
    if signed_area(&clip) < 0.0 {
        clip.reverse();
    }

    let mut poly = subject;
    for i in 0..clip.len() {
        if poly.is_empty() {
            return false;
        }
        poly = clip_by_edge(&poly, clip[i], clip[(i + 1) % clip.len()]);
    }

    signed_area(&poly).abs() > tolerance
}

/// Signed area of a 2D polygon (shoelace), positive for CCW winding.
fn signed_area(poly: &[[f64; 2]]) -> f64 {
    let mut area = 0.0;
    for i in 0..poly.len() {
        let [x0, y0] = poly[i];
        let [x1, y1] = poly[(i + 1) % poly.len()];
        area += x0 * y1 - x1 * y0;
    }
    area * 0.5
}

/// Sutherland-Hodgman clip of a polygon by one directed edge, keeping
/// the left half-plane (CCW clip polygon).
fn clip_by_edge(poly: &[[f64; 2]], c0: [f64; 2], c1: [f64; 2]) -> Vec<[f64; 2]> {
    let side = |p: [f64; 2]| -> f64 {
        (c1[0] - c0[0]) * (p[1] - c0[1]) - (c1[1] - c0[1]) * (p[0] - c0[0])
    };
    let cross = |p: [f64; 2], q: [f64; 2]| -> [f64; 2] {
        let sp = side(p);
        let sq = side(q);
        let t = sp / (sp - sq);
        [
            (q[0] - p[0]).mul_add(t, p[0]),
            (q[1] - p[1]).mul_add(t, p[1]),
        ]
    };

    let mut out = Vec::with_capacity(poly.len() + 1);
    for i in 0..poly.len() {
        let prev = poly[(i + poly.len() - 1) % poly.len()];
        let cur = poly[i];
        let cur_in = side(cur) >= 0.0;
        let prev_in = side(prev) >= 0.0;

        if cur_in {
            if !prev_in {
                out.push(cross(prev, cur));
            }
            out.push(cur);
        } else if prev_in {
            out.push(cross(prev, cur));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const TOL: f64 = 1e-9;

    fn xy_triangle(z: f64) -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, z),
            Point3::new(2.0, 0.0, z),
            Point3::new(0.0, 2.0, z),
        )
    }

    #[test]
    fn piercing_triangles_contact() {
        let a = xy_triangle(0.0);
        let b = Triangle::new(
            Point3::new(0.5, 0.5, -1.0),
            Point3::new(0.5, 0.5, 1.0),
            Point3::new(1.5, 0.5, 1.0),
        );
        assert!(triangles_contact(&a, &b, TOL));
        assert!(triangles_contact(&b, &a, TOL));
    }

    #[test]
    fn parallel_offset_triangles_no_contact() {
        assert!(!triangles_contact(&xy_triangle(0.0), &xy_triangle(0.5), TOL));
    }

    #[test]
    fn coplanar_overlapping_triangles_contact() {
        let a = xy_triangle(0.0);
        let b = Triangle::new(
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(2.5, 0.5, 0.0),
            Point3::new(0.5, 2.5, 0.0),
        );
        assert!(triangles_contact(&a, &b, TOL));
    }

    #[test]
    fn coplanar_identical_triangles_contact() {
        let a = xy_triangle(0.0);
        assert!(triangles_contact(&a, &a, TOL));
    }

    #[test]
    fn coplanar_edge_sharing_triangles_no_contact() {
        // The two halves of a quad: share the diagonal, interiors disjoint.
        let a = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        );
        let b = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(!triangles_contact(&a, &b, TOL));
    }

    #[test]
    fn perpendicular_edge_touching_triangles_no_contact() {
        // b stands on a's plane along the line x=1 without crossing it.
        let a = xy_triangle(0.0);
        let b = Triangle::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
        );
        assert!(!triangles_contact(&a, &b, TOL));
    }

    #[test]
    fn perpendicular_crossing_triangles_contact() {
        // b crosses a's plane through the interior of a.
        let a = xy_triangle(0.0);
        let b = Triangle::new(
            Point3::new(0.5, 0.5, -0.5),
            Point3::new(1.0, 0.5, 0.5),
            Point3::new(0.2, 0.5, 0.5),
        );
        assert!(triangles_contact(&a, &b, TOL));
    }

    #[test]
    fn vertex_touching_triangles_no_contact() {
        let a = xy_triangle(0.0);
        let b = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 1.0),
            Point3::new(0.0, -1.0, 1.0),
        );
        assert!(!triangles_contact(&a, &b, TOL));
    }

    #[test]
    fn degenerate_triangle_no_contact() {
        let a = xy_triangle(0.0);
        let degenerate = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(!triangles_contact(&a, &degenerate, TOL));
    }

    #[test]
    fn disjoint_coplanar_triangles_no_contact() {
        let a = xy_triangle(0.0);
        let b = Triangle::new(
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(6.0, 5.0, 0.0),
            Point3::new(5.0, 6.0, 0.0),
        );
        assert!(!triangles_contact(&a, &b, TOL));
    }
}
