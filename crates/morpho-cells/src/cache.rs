//! Measurement cache.
//!
//! Baking and integrating a segmentation mesh is the expensive step of
//! every analysis pass, and the same cell is measured by tracking,
//! contact analysis and morphometry alike. The cache keys results by
//! cell identity so each mesh is measured once per session.

use crate::{Cell, CellName};
use hashbrown::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

/// Cached morphometric measurement of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Volume in scaled units cubed.
    pub volume: f64,
    /// Surface area in scaled units squared.
    pub area: f64,
}

/// Concurrent cache of per-cell measurements, keyed by cell identity.
///
/// Reads are lock-shared; a miss computes through the geometry kernel
/// and inserts under the write lock. Two threads missing on the same
/// cell both compute and the last writer wins, which is harmless since
/// identical geometry measures identically.
///
/// Entries are keyed by cell identity alone: one cache serves one
/// `unit_scale`, the way a session owns one dataset. A hit returns the
/// values computed under the scale of the first call; debug builds
/// assert the scale stays consistent until [`MeasurementCache::clear`].
///
/// # Example
///
/// ```
/// use morpho_cells::{Cell, CellName, MeasurementCache};
/// use morpho_geom::{unit_cube, CellGeometry};
///
/// let cache = MeasurementCache::new();
/// let cell = Cell::new(CellName::new(0, 1), CellGeometry::from_tri_mesh(unit_cube()));
///
/// let m = cache.get(&cell, 1.0);
/// assert!((m.volume - 1.0).abs() < 1e-10);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MeasurementCache {
    inner: RwLock<HashMap<CellName, Measurement>>,
    scale: Mutex<Option<f64>>,
}

impl MeasurementCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Measurement for a cell, computed on miss.
    ///
    /// An empty cell measures as zero volume and zero area.
    ///
    /// # Panics
    ///
    /// In debug builds, if called with a different `unit_scale` than
    /// earlier calls since the last [`MeasurementCache::clear`].
    #[must_use]
    pub fn get(&self, cell: &Cell, unit_scale: f64) -> Measurement {
        self.record_scale(unit_scale);
        if let Some(&m) = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cell.name)
        {
            return m;
        }

        let (volume, area) = morpho_geom::scaled_volume_and_area(&cell.bake(), unit_scale);
        let m = Measurement { volume, area };
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cell.name, m);
        m
    }

    /// Drop the cached measurement for one cell.
    pub fn invalidate(&self, name: &CellName) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }

    /// Drop all cached measurements and forget the unit scale.
    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.scale.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Pin the cache to the first unit scale it sees.
    fn record_scale(&self, unit_scale: f64) {
        let mut scale = self.scale.lock().unwrap_or_else(PoisonError::into_inner);
        match *scale {
            None => *scale = Some(unit_scale),
            Some(pinned) => debug_assert!(
                (pinned - unit_scale).abs() <= f64::EPSILON,
                "measurement cache reused with a different unit scale ({pinned} then {unit_scale})"
            ),
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
