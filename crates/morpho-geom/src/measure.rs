//! Scaled morphometric measurements.
//!
//! Meshes live in modeling units; analysis results are reported in real
//! units via a uniform `unit_scale` factor. Lengths scale linearly,
//! areas quadratically and volumes cubically.

use crate::TriMesh;
use nalgebra::Point3;
use std::collections::BTreeSet;

/// Volume and surface area of a mesh in scaled units.
///
/// Volume is always non-negative; mesh orientation is not trusted.
///
/// # Example
///
/// ```
/// use morpho_geom::{scaled_volume_and_area, unit_cube};
///
/// let (volume, area) = scaled_volume_and_area(&unit_cube(), 2.0);
/// assert!((volume - 8.0).abs() < 1e-10);
/// assert!((area - 24.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn scaled_volume_and_area(mesh: &TriMesh, unit_scale: f64) -> (f64, f64) {
    let volume = mesh.volume() * unit_scale.powi(3);
    let area = mesh.surface_area() * unit_scale.powi(2);
    (volume, area)
}

/// Total scaled area of a subset of mesh faces.
///
/// Face indices out of range contribute zero area.
#[must_use]
pub fn scaled_area_of_faces(mesh: &TriMesh, faces: &BTreeSet<u32>, unit_scale: f64) -> f64 {
    let area: f64 = faces.iter().map(|&f| mesh.face_area(f as usize)).sum();
    area * unit_scale.powi(2)
}

/// Euclidean distance between two points in scaled units.
#[inline]
#[must_use]
pub fn scaled_distance(a: &Point3<f64>, b: &Point3<f64>, unit_scale: f64) -> f64 {
    (b - a).norm() * unit_scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cube, unit_cube};
    use approx::assert_relative_eq;

    #[test]
    fn volume_and_area_scale_cubically_and_quadratically() {
        let mesh = cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        let (volume, area) = scaled_volume_and_area(&mesh, 0.5);
        assert_relative_eq!(volume, 1.0, epsilon = 1e-10);
        assert_relative_eq!(area, 6.0, epsilon = 1e-10);
    }

    #[test]
    fn unit_scale_one_is_identity() {
        let (volume, area) = scaled_volume_and_area(&unit_cube(), 1.0);
        assert_relative_eq!(volume, 1.0, epsilon = 1e-10);
        assert_relative_eq!(area, 6.0, epsilon = 1e-10);
    }

    #[test]
    fn face_subset_area() {
        let mesh = unit_cube();
        // Faces 0 and 1 form the bottom of the cube, area 1.
        let faces: BTreeSet<u32> = [0, 1].into_iter().collect();
        assert_relative_eq!(scaled_area_of_faces(&mesh, &faces, 1.0), 1.0, epsilon = 1e-10);
        assert_relative_eq!(scaled_area_of_faces(&mesh, &faces, 3.0), 9.0, epsilon = 1e-10);
    }

    #[test]
    fn out_of_range_faces_contribute_nothing() {
        let mesh = unit_cube();
        let faces: BTreeSet<u32> = [500].into_iter().collect();
        assert!(scaled_area_of_faces(&mesh, &faces, 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_scales_linearly() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert_relative_eq!(scaled_distance(&a, &b, 1.0), 5.0, epsilon = 1e-10);
        assert_relative_eq!(scaled_distance(&a, &b, 2.0), 10.0, epsilon = 1e-10);
    }
}
