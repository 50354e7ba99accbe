//! Per-cell morphometric summaries.

use morpho_cells::{CellName, MeasurementCache, Timepoint};
use morpho_geom::Point3;

/// Morphometric record of one cell, all values in scaled units.
#[derive(Debug, Clone, PartialEq)]
pub struct Morphometry {
    /// Identity of the cell.
    pub name: CellName,
    /// Tissue tag, if any.
    pub tissue: Option<String>,
    /// Cell volume.
    pub volume: f64,
    /// Cell surface area.
    pub area: f64,
    /// Axis-aligned bounding box dimensions.
    pub dimensions: [f64; 3],
    /// Representative point (first-vertex convention), `None` for an
    /// empty cell.
    pub centroid: Option<Point3<f64>>,
}

/// Morphometric records for every cell of a timepoint, in cell order.
///
/// Volume and area go through the shared [`MeasurementCache`], so a
/// morphometry pass warms the cache for later analysis passes (and
/// vice versa).
#[must_use]
pub fn morphometry_table(
    timepoint: &Timepoint,
    cache: &MeasurementCache,
    unit_scale: f64,
) -> Vec<Morphometry> {
    timepoint
        .cells()
        .iter()
        .map(|cell| {
            let m = cache.get(cell, unit_scale);
            let mesh = cell.bake();
            let dimensions = if mesh.is_empty() {
                [0.0; 3]
            } else {
                let size = mesh.bounds().size() * unit_scale;
                [size.x, size.y, size.z]
            };
            Morphometry {
                name: cell.name,
                tissue: cell.tissue.clone(),
                volume: m.volume,
                area: m.area,
                dimensions,
                centroid: cell.centroid().map(|p| p * unit_scale),
            }
        })
        .collect()
}
