//! One segmented cell.

use crate::CellName;
use morpho_geom::{CellGeometry, Point3, TriMesh};

/// A segmented cell at one timepoint: identity, optional tissue tag and
/// raw geometry.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Identity of the cell, `t<T>_label<ID>`.
    pub name: CellName,
    /// Tissue or collection tag the cell belongs to, if known.
    pub tissue: Option<String>,
    /// Raw geometry as supplied by the mesh provider.
    pub geometry: CellGeometry,
}

impl Cell {
    /// Create a cell with no tissue tag.
    #[must_use]
    pub const fn new(name: CellName, geometry: CellGeometry) -> Self {
        Self {
            name,
            tissue: None,
            geometry,
        }
    }

    /// Set the tissue tag.
    #[must_use]
    pub fn with_tissue(mut self, tissue: impl Into<String>) -> Self {
        self.tissue = Some(tissue.into());
        self
    }

    /// Representative point of the cell in world space.
    ///
    /// By convention this is the world position of the first vertex, not
    /// a true center of mass. The tracking threshold is calibrated
    /// against this convention, so it is preserved as is. Returns `None`
    /// for a cell with no vertices.
    #[must_use]
    pub fn centroid(&self) -> Option<Point3<f64>> {
        let first = *self.geometry.positions.first()?;
        let first = match &self.geometry.offsets {
            Some(offsets) if offsets.len() == self.geometry.positions.len() => {
                first + offsets[0]
            }
            _ => first,
        };
        Some(self.geometry.transform.transform_point(&first))
    }

    /// Bake the cell's geometry into a world-space triangle mesh.
    #[inline]
    #[must_use]
    pub fn bake(&self) -> TriMesh {
        self.geometry.bake()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_geom::{unit_cube, Matrix4, Vector3};

    fn cell(label: u64) -> Cell {
        Cell::new(
            CellName::new(0, label),
            CellGeometry::from_tri_mesh(unit_cube()),
        )
    }

    #[test]
    fn centroid_is_first_vertex_in_world_space() {
        let mut c = cell(1);
        c.geometry.transform = Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0));
        let centroid = c.centroid().unwrap();
        // unit_cube's first vertex is the origin.
        assert!((centroid.x - 10.0).abs() < 1e-10);
        assert!(centroid.y.abs() < 1e-10);
    }

    #[test]
    fn centroid_applies_pending_offsets() {
        let mut c = cell(1);
        let n = c.geometry.positions.len();
        c.geometry.offsets = Some(vec![Vector3::new(0.0, 0.0, 2.0); n]);
        assert!((c.centroid().unwrap().z - 2.0).abs() < 1e-10);
    }

    #[test]
    fn centroid_of_empty_cell_is_none() {
        let c = Cell::new(CellName::new(0, 1), CellGeometry::new(Vec::new(), Vec::new()));
        assert!(c.centroid().is_none());
    }

    #[test]
    fn tissue_tag() {
        let c = cell(1).with_tissue("epidermis");
        assert_eq!(c.tissue.as_deref(), Some("epidermis"));
    }
}
