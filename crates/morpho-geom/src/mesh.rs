//! World-space triangle mesh.

use crate::{Aabb, Triangle};
use nalgebra::{Point3, Vector3};

/// An indexed triangle mesh in world coordinates.
///
/// This is the measurement-ready representation produced by
/// [`CellGeometry::bake`](crate::CellGeometry::bake): positions and faces
/// referencing positions by index, all polygons already triangulated.
///
/// Faces use counter-clockwise winding when viewed from outside, so
/// normals point outward by the right-hand rule. Segmentation pipelines
/// do not always honor this, which is why volume queries take the
/// absolute value.
///
/// # Example
///
/// ```
/// use morpho_geom::{TriMesh, Point3};
///
/// let mut mesh = TriMesh::new();
/// mesh.positions.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.positions.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.positions.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.face_count(), 1);
/// assert!((mesh.surface_area() - 0.5).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    /// Vertex positions in world space.
    pub positions: Vec<Point3<f64>>,
    /// Triangle faces as indices into the position array.
    pub faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from positions and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(positions: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { positions, faces }
    }

    /// Check if the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangle faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the triangle for a face index, `None` if out of range.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let &[i0, i1, i2] = self.faces.get(face_index)?;
        Some(Triangle::new(
            *self.positions.get(i0 as usize)?,
            *self.positions.get(i1 as usize)?,
            *self.positions.get(i2 as usize)?,
        ))
    }

    /// Iterate over all faces as triangles.
    ///
    /// Faces with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }

    /// Area of one face, 0.0 if the index is out of range.
    #[must_use]
    pub fn face_area(&self, face_index: usize) -> f64 {
        self.triangle(face_index).map_or(0.0, |t| t.area())
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Uses the divergence theorem: the sum of signed tetrahedra volumes
    /// formed by each face and the origin. Positive for a closed mesh
    /// with outward-facing normals, negative for an inside-out mesh,
    /// meaningless for an open mesh.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;

        for tri in self.triangles() {
            let v0 = tri.v0.coords;
            let v1 = tri.v1.coords;
            let v2 = tri.v2.coords;
            // Signed volume of tetrahedron with origin = (v0 · (v1 × v2)) / 6
            volume += v0.dot(&v1.cross(&v2));
        }

        volume / 6.0
    }

    /// Compute the absolute volume of the mesh.
    ///
    /// Mesh orientation is not trusted: segmentation output can be
    /// inside-out, so the sign is discarded.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Compute the total surface area of the mesh.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Get the bounding box of the mesh, empty for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter())
    }

    /// Translate the mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for p in &mut self.positions {
            *p += offset;
        }
    }
}

/// Create an axis-aligned cube mesh with the given minimum corner and
/// edge length, CCW winding viewed from outside.
#[must_use]
pub fn cube(min: Point3<f64>, size: f64) -> TriMesh {
    let mut mesh = TriMesh::with_capacity(8, 12);

    for &(dx, dy, dz) in &[
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, 0.0, 1.0),
        (1.0, 0.0, 1.0),
        (1.0, 1.0, 1.0),
        (0.0, 1.0, 1.0),
    ] {
        mesh.positions.push(Point3::new(
            size.mul_add(dx, min.x),
            size.mul_add(dy, min.y),
            size.mul_add(dz, min.z),
        ));
    }

    // Two triangles per face
    mesh.faces.push([0, 2, 1]); // bottom (-Z)
    mesh.faces.push([0, 3, 2]);
    mesh.faces.push([4, 5, 6]); // top (+Z)
    mesh.faces.push([4, 6, 7]);
    mesh.faces.push([0, 1, 5]); // front (-Y)
    mesh.faces.push([0, 5, 4]);
    mesh.faces.push([3, 7, 6]); // back (+Y)
    mesh.faces.push([3, 6, 2]);
    mesh.faces.push([0, 4, 7]); // left (-X)
    mesh.faces.push([0, 7, 3]);
    mesh.faces.push([1, 2, 6]); // right (+X)
    mesh.faces.push([1, 6, 5]);

    mesh
}

/// Create a unit cube mesh from (0,0,0) to (1,1,1).
///
/// # Example
///
/// ```
/// use morpho_geom::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> TriMesh {
    cube(Point3::new(0.0, 0.0, 0.0), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mesh() {
        let mesh = TriMesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_empty());
        assert!(mesh.volume().abs() < f64::EPSILON);
        assert!(mesh.surface_area().abs() < f64::EPSILON);
    }

    #[test]
    fn unit_cube_volume_and_area() {
        let cube = unit_cube();
        assert!((cube.signed_volume() - 1.0).abs() < 1e-10);
        assert!((cube.surface_area() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn flipped_cube_volume_is_negative_but_abs() {
        let mut cube = unit_cube();
        for face in &mut cube.faces {
            face.swap(1, 2);
        }
        assert!(cube.signed_volume() < 0.0);
        assert!((cube.volume() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn scaled_cube_volume() {
        let c = cube(Point3::new(-1.0, -1.0, -1.0), 2.0);
        assert!((c.volume() - 8.0).abs() < 1e-10);
        assert!((c.surface_area() - 24.0).abs() < 1e-10);
    }

    #[test]
    fn face_area_out_of_range_is_zero() {
        let cube = unit_cube();
        assert!((cube.face_area(0) - 0.5).abs() < 1e-10);
        assert!(cube.face_area(99).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_face_index_skipped() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 200]); // dangling index
        assert_eq!(mesh.triangles().count(), 12);
        assert!((mesh.surface_area() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn mesh_translate() {
        let mut mesh = unit_cube();
        mesh.translate(Vector3::new(1.0, 2.0, 3.0));
        let bb = mesh.bounds();
        assert!((bb.min.x - 1.0).abs() < 1e-10);
        assert!((bb.min.y - 2.0).abs() < 1e-10);
        assert!((bb.min.z - 3.0).abs() < 1e-10);
        // Volume unchanged by translation
        assert!((mesh.volume() - 1.0).abs() < 1e-10);
    }
}
