//! Lineage tracking across consecutive timepoints.

use crate::{AnalyzeError, AnalyzeResult};
use morpho_cells::{
    CancelToken, Cell, CellName, CellsError, LineageForest, LineageNode, ProgressFn,
    TimepointSequence,
};
use morpho_geom::scaled_distance;
use rayon::prelude::*;
use tracing::{debug, info};

/// Which cells start the lineage trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seeds {
    /// Every cell of the earliest timepoint becomes a root.
    FirstTimepoint,
    /// An explicit selection of cells, each becoming a root regardless
    /// of its timepoint. Linking starts at the earliest selected
    /// timepoint; roots from later timepoints join the pass when the
    /// sequence reaches them.
    Selection(Vec<CellName>),
}

/// Coverage statistics of one tracking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingReport {
    /// Number of lineage trees.
    pub lineages: usize,
    /// Trees whose deepest branch spans every tracked timepoint.
    pub complete: usize,
    /// Timepoints in the tracked window, earliest seed timepoint
    /// included.
    pub timepoints: usize,
}

/// Nearest-centroid lineage tracker.
///
/// Links each lineage leaf at timepoint `t` to its nearest-centroid
/// cell at `t + 1`, strictly closer than the distance threshold. A leaf
/// with no candidate inside the threshold becomes terminal. Several
/// leaves may link to the same cell; such shared children are kept,
/// matching the source data where over-segmentation merges lineages.
///
/// # Example
///
/// ```no_run
/// use morpho_analyze::Tracker;
/// use morpho_cells::TimepointSequence;
///
/// let sequence = TimepointSequence::default();
/// let (forest, report) = Tracker::new(5.0, 0.25).track(&sequence).unwrap();
/// assert_eq!(forest.roots.len(), report.lineages);
/// ```
pub struct Tracker<'a> {
    threshold: f64,
    unit_scale: f64,
    seeds: Seeds,
    progress: Option<ProgressFn<'a>>,
    cancel: Option<CancelToken>,
}

impl std::fmt::Debug for Tracker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("threshold", &self.threshold)
            .field("unit_scale", &self.unit_scale)
            .field("seeds", &self.seeds)
            .finish_non_exhaustive()
    }
}

impl<'a> Tracker<'a> {
    /// Create a tracker seeded from the first timepoint.
    ///
    /// `threshold` is the maximum link distance in real units;
    /// centroid distances are converted through `unit_scale` before
    /// comparison. A threshold of zero links nothing.
    #[must_use]
    pub const fn new(threshold: f64, unit_scale: f64) -> Self {
        Self {
            threshold,
            unit_scale,
            seeds: Seeds::FirstTimepoint,
            progress: None,
            cancel: None,
        }
    }

    /// Set the seeding mode.
    #[must_use]
    pub fn with_seeds(mut self, seeds: Seeds) -> Self {
        self.seeds = seeds;
        self
    }

    /// Report `(linking steps done, total)` through a callback.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Observe a cancellation token between linking steps.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Track lineages through the sequence.
    ///
    /// # Errors
    ///
    /// [`AnalyzeError::Cancelled`] if the token fires and
    /// [`AnalyzeError::Cells`] for a seed naming no live cell.
    pub fn track(&self, sequence: &TimepointSequence) -> AnalyzeResult<(LineageForest, TrackingReport)> {
        let (start, seed_names) = self.seed(sequence)?;
        let mut roots: Vec<LineageNode> = seed_names.into_iter().map(LineageNode::new).collect();

        let timepoints = sequence.timepoints();
        let steps = timepoints.len().saturating_sub(start + 1);

        for (done, pair) in timepoints[start..].windows(2).enumerate() {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(AnalyzeError::Cancelled);
            }

            let current = pair[0].index();
            let next = &pair[1];
            debug!(from = current, to = next.index(), "linking timepoints");

            for root in &mut roots {
                let mut leaves = root.leaves_mut();
                leaves.retain(|leaf| leaf.name.timepoint == current);

                // Search per leaf in parallel; collect() keeps leaf order
                // so the forest is deterministic.
                let matches: Vec<Option<CellName>> = leaves
                    .par_iter()
                    .map(|leaf| {
                        let cell = sequence.find(&leaf.name)?;
                        self.nearest(cell, next.cells())
                    })
                    .collect();

                for (leaf, matched) in leaves.into_iter().zip(matches) {
                    if let Some(name) = matched {
                        leaf.children.push(LineageNode::new(name));
                    }
                }
            }

            if let Some(progress) = self.progress {
                progress(done + 1, steps);
            }
        }

        let forest = LineageForest::new(roots);
        let span = timepoints.len() - start.min(timepoints.len());
        let coverage = forest.coverage(span);
        let report = TrackingReport {
            lineages: coverage.total,
            complete: coverage.complete,
            timepoints: span,
        };
        info!(
            lineages = report.lineages,
            complete = report.complete,
            timepoints = report.timepoints,
            "tracking finished"
        );
        Ok((forest, report))
    }

    /// Nearest cell of the next timepoint, strictly inside the
    /// threshold. Candidates are scanned in insertion order and only a
    /// strictly smaller distance replaces the best, so the first of
    /// equally distant candidates wins.
    fn nearest(&self, cell: &Cell, candidates: &[Cell]) -> Option<CellName> {
        let centroid = cell.centroid()?;
        let mut best: Option<(CellName, f64)> = None;

        for candidate in candidates {
            let Some(other) = candidate.centroid() else {
                continue;
            };
            let distance = scaled_distance(&centroid, &other, self.unit_scale);
            if distance >= self.threshold {
                continue;
            }
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((candidate.name, distance));
            }
        }

        best.map(|(name, _)| name)
    }

    /// Resolve the seeding mode into a starting position in the
    /// sequence and the seed names in order.
    fn seed(&self, sequence: &TimepointSequence) -> AnalyzeResult<(usize, Vec<CellName>)> {
        match &self.seeds {
            Seeds::FirstTimepoint => {
                let Some(first) = sequence.timepoints().first() else {
                    return Ok((0, Vec::new()));
                };
                Ok((0, first.cells().iter().map(|c| c.name).collect()))
            }
            Seeds::Selection(names) => {
                let mut earliest: Option<u32> = None;
                for name in names {
                    if sequence.find(name).is_none() {
                        return Err(CellsError::IdentityNotFound(*name).into());
                    }
                    earliest = Some(earliest.map_or(name.timepoint, |t| t.min(name.timepoint)));
                }
                let Some(earliest) = earliest else {
                    return Ok((0, Vec::new()));
                };
                let start = sequence
                    .timepoints()
                    .iter()
                    .position(|tp| tp.index() == earliest)
                    .unwrap_or(0);
                Ok((start, names.clone()))
            }
        }
    }
}
