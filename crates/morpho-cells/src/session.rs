//! Analysis session.

use crate::{ContactGraph, LineageForest, MeasurementCache, TimepointSequence};
use std::collections::BTreeMap;
use tracing::warn;

/// Explicit context for one analysis run over a loaded dataset.
///
/// Owns the timepoint sequence, the unit scale, the shared measurement
/// cache and the analysis results (lineage forest, per-timepoint
/// contact graphs). There is no global state; two sessions never
/// interfere.
#[derive(Debug)]
pub struct AnalysisSession {
    unit_scale: f64,
    timepoints: TimepointSequence,
    cache: MeasurementCache,
    forest: Option<LineageForest>,
    graphs: BTreeMap<u32, ContactGraph>,
}

impl AnalysisSession {
    /// Create a session over a timepoint sequence.
    ///
    /// `unit_scale` converts modeling units to real units; lengths scale
    /// linearly, areas quadratically, volumes cubically.
    #[must_use]
    pub fn new(timepoints: TimepointSequence, unit_scale: f64) -> Self {
        Self {
            unit_scale,
            timepoints,
            cache: MeasurementCache::new(),
            forest: None,
            graphs: BTreeMap::new(),
        }
    }

    /// Unit scale factor of the dataset.
    #[inline]
    #[must_use]
    pub const fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    /// Loaded timepoints.
    #[inline]
    #[must_use]
    pub const fn timepoints(&self) -> &TimepointSequence {
        &self.timepoints
    }

    /// Shared measurement cache.
    #[inline]
    #[must_use]
    pub const fn cache(&self) -> &MeasurementCache {
        &self.cache
    }

    /// The tracked lineage forest, if tracking has run or a forest was
    /// imported.
    #[inline]
    #[must_use]
    pub const fn forest(&self) -> Option<&LineageForest> {
        self.forest.as_ref()
    }

    /// Install a lineage forest, replacing any previous one.
    pub fn set_forest(&mut self, forest: LineageForest) {
        self.forest = Some(forest);
    }

    /// Contact graph of one timepoint, if built.
    #[must_use]
    pub fn graph(&self, timepoint: u32) -> Option<&ContactGraph> {
        self.graphs.get(&timepoint)
    }

    /// All built contact graphs, keyed by timepoint index.
    #[inline]
    #[must_use]
    pub const fn graphs(&self) -> &BTreeMap<u32, ContactGraph> {
        &self.graphs
    }

    /// Install a contact graph for its timepoint, replacing any
    /// previous one.
    pub fn insert_graph(&mut self, graph: ContactGraph) {
        self.graphs.insert(graph.timepoint(), graph);
    }

    /// Re-associate every lineage node with a live cell.
    ///
    /// Nodes naming cells absent from the loaded timepoints are counted
    /// and logged, not errors: an imported lineage may predate edits to
    /// the dataset. Returns `(resolved, missing)` node counts; `(0, 0)`
    /// when no forest is installed.
    pub fn resolve_forest(&self) -> (usize, usize) {
        let Some(forest) = &self.forest else {
            return (0, 0);
        };

        let mut resolved = 0;
        let mut missing = 0;
        for node in forest.preorder() {
            if self.timepoints.find(&node.name).is_some() {
                resolved += 1;
            } else {
                warn!(cell = %node.name, "lineage node refers to no live cell");
                missing += 1;
            }
        }
        (resolved, missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, CellName, LineageNode, Timepoint};
    use morpho_geom::{unit_cube, CellGeometry};

    fn cell(t: u32, label: u64) -> Cell {
        Cell::new(
            CellName::new(t, label),
            CellGeometry::from_tri_mesh(unit_cube()),
        )
    }

    fn session() -> AnalysisSession {
        let seq = TimepointSequence::new(vec![
            Timepoint::new(1, vec![cell(1, 1), cell(1, 2)]),
            Timepoint::new(2, vec![cell(2, 1)]),
        ]);
        AnalysisSession::new(seq, 0.25)
    }

    #[test]
    fn session_owns_results() {
        let mut s = session();
        assert!(s.forest().is_none());
        assert!(s.graph(1).is_none());

        s.set_forest(LineageForest::new(vec![LineageNode::new(CellName::new(1, 1))]));
        s.insert_graph(ContactGraph::new(1));
        assert!(s.forest().is_some());
        assert_eq!(s.graphs().len(), 1);
    }

    #[test]
    fn resolve_forest_counts_missing_nodes() {
        let mut s = session();
        let mut root = LineageNode::new(CellName::new(1, 1));
        root.children.push(LineageNode::new(CellName::new(2, 1)));
        root.children.push(LineageNode::new(CellName::new(2, 99))); // stale
        s.set_forest(LineageForest::new(vec![root]));

        assert_eq!(s.resolve_forest(), (2, 1));
    }

    #[test]
    fn resolve_without_forest_is_empty() {
        assert_eq!(session().resolve_forest(), (0, 0));
    }
}
