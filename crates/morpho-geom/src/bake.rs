//! Baking raw cell geometry into a measurement-ready mesh.

use crate::TriMesh;
use nalgebra::{Matrix4, Point3, Vector3};

/// Raw geometry of one segmented cell, as supplied by the mesh provider.
///
/// Holds object-space polygon geometry (arbitrary n-gons), the
/// object-to-world transform, and any pending per-vertex deformation
/// offsets that a mesh editor has queued but not applied.
///
/// [`CellGeometry::bake`] produces the world-space [`TriMesh`] all
/// measurement and overlap queries operate on. Baking is deterministic
/// and idempotent for unchanged input; the triangulation order of a
/// polygon is not observable externally.
///
/// # Example
///
/// ```
/// use morpho_geom::{CellGeometry, Matrix4, Point3};
///
/// // A single quad, scaled 2x by the world transform
/// let geometry = CellGeometry::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![vec![0, 1, 2, 3]],
/// )
/// .with_transform(Matrix4::new_scaling(2.0));
///
/// let mesh = geometry.bake();
/// assert_eq!(mesh.face_count(), 2);
/// assert!((mesh.surface_area() - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CellGeometry {
    /// Vertex positions in object space.
    pub positions: Vec<Point3<f64>>,
    /// Polygons as index lists into `positions`. Triangles, quads and
    /// larger n-gons are all accepted.
    pub polygons: Vec<Vec<u32>>,
    /// Object-to-world transform.
    pub transform: Matrix4<f64>,
    /// Pending per-vertex deformation, applied in object space before
    /// the transform. Must have one entry per vertex to take effect.
    pub offsets: Option<Vec<Vector3<f64>>>,
}

impl CellGeometry {
    /// Create cell geometry with an identity transform and no pending
    /// deformation.
    #[must_use]
    pub fn new(positions: Vec<Point3<f64>>, polygons: Vec<Vec<u32>>) -> Self {
        Self {
            positions,
            polygons,
            transform: Matrix4::identity(),
            offsets: None,
        }
    }

    /// Wrap an already world-space triangle mesh.
    #[must_use]
    pub fn from_tri_mesh(mesh: TriMesh) -> Self {
        Self::new(
            mesh.positions,
            mesh.faces.iter().map(|f| f.to_vec()).collect(),
        )
    }

    /// Set the object-to-world transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// Set pending per-vertex deformation offsets.
    #[must_use]
    pub fn with_offsets(mut self, offsets: Vec<Vector3<f64>>) -> Self {
        self.offsets = Some(offsets);
        self
    }

    /// Check if the geometry has no polygons.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Bake into a world-space triangle mesh.
    ///
    /// Applies pending deformation offsets, then the world transform,
    /// then fan-triangulates every polygon. Polygons with fewer than
    /// three vertices or dangling indices are dropped (best effort, no
    /// error).
    #[must_use]
    pub fn bake(&self) -> TriMesh {
        let vertex_count = self.positions.len();
        let mut mesh = TriMesh::with_capacity(vertex_count, self.polygons.len() * 2);

        let offsets = self
            .offsets
            .as_ref()
            .filter(|o| o.len() == vertex_count)
            .map(Vec::as_slice);

        for (i, p) in self.positions.iter().enumerate() {
            let p = offsets.map_or(*p, |o| p + o[i]);
            mesh.positions.push(self.transform.transform_point(&p));
        }

        for polygon in &self.polygons {
            if polygon.len() < 3
                || polygon.iter().any(|&i| i as usize >= vertex_count)
            {
                continue;
            }
            for window in polygon[1..].windows(2) {
                mesh.faces.push([polygon[0], window[0], window[1]]);
            }
        }

        mesh
    }
}
