//! Timepoints and ordered timepoint sequences.

use crate::{Cell, CellName, CellsError, CellsResult};
use hashbrown::HashMap;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static TIMEPOINT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, cannot fail
    Regex::new(r"^[Tt](\d+)$").unwrap()
});

/// Parse a timepoint container name (`t7`, `T07`) into its index.
///
/// # Errors
///
/// Returns [`CellsError::InvalidTimepointName`] for anything that is not
/// `[Tt]` followed by digits.
///
/// # Example
///
/// ```
/// use morpho_cells::parse_timepoint_name;
///
/// assert_eq!(parse_timepoint_name("t7").unwrap(), 7);
/// assert_eq!(parse_timepoint_name("T07").unwrap(), 7);
/// assert!(parse_timepoint_name("stage7").is_err());
/// ```
pub fn parse_timepoint_name(name: &str) -> CellsResult<u32> {
    let caps = TIMEPOINT_NAME_RE
        .captures(name)
        .ok_or_else(|| CellsError::InvalidTimepointName(name.to_owned()))?;
    caps[1]
        .parse()
        .map_err(|_| CellsError::InvalidTimepointName(name.to_owned()))
}

/// All cells observed at one timepoint.
///
/// Cells keep their insertion order; a name lookup table is built at
/// construction so identity resolution does not scan.
#[derive(Debug, Clone)]
pub struct Timepoint {
    index: u32,
    cells: Vec<Cell>,
    by_name: HashMap<CellName, usize>,
}

impl Timepoint {
    /// Create a timepoint from its index and cells.
    #[must_use]
    pub fn new(index: u32, cells: Vec<Cell>) -> Self {
        let by_name = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name, i))
            .collect();
        Self {
            index,
            cells,
            by_name,
        }
    }

    /// Timepoint index.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Cells in insertion order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Look up a cell by name.
    #[must_use]
    pub fn get(&self, name: &CellName) -> Option<&Cell> {
        self.by_name.get(name).map(|&i| &self.cells[i])
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the timepoint has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Timepoints ordered by index.
///
/// Built either directly from [`Timepoint`] values or by scanning named
/// containers, keeping only those whose name matches the timepoint
/// pattern, the way the original data was organized into `t<N>`
/// collections.
#[derive(Debug, Clone, Default)]
pub struct TimepointSequence {
    timepoints: Vec<Timepoint>,
}

impl TimepointSequence {
    /// Create a sequence, sorting the given timepoints by index.
    #[must_use]
    pub fn new(mut timepoints: Vec<Timepoint>) -> Self {
        timepoints.sort_by_key(Timepoint::index);
        Self { timepoints }
    }

    /// Build a sequence from named containers of cells.
    ///
    /// Containers whose name does not match `^[Tt]\d+$` are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use morpho_cells::TimepointSequence;
    ///
    /// let sequence = TimepointSequence::from_named(vec![
    ///     ("t2".to_owned(), vec![]),
    ///     ("Materials".to_owned(), vec![]),
    ///     ("t1".to_owned(), vec![]),
    /// ]);
    /// assert_eq!(sequence.len(), 2);
    /// assert_eq!(sequence.timepoints()[0].index(), 1);
    /// ```
    #[must_use]
    pub fn from_named(groups: impl IntoIterator<Item = (String, Vec<Cell>)>) -> Self {
        let mut timepoints = Vec::new();
        for (name, cells) in groups {
            match parse_timepoint_name(&name) {
                Ok(index) => timepoints.push(Timepoint::new(index, cells)),
                Err(_) => debug!(name = %name, "skipping non-timepoint container"),
            }
        }
        Self::new(timepoints)
    }

    /// Timepoints in ascending index order.
    #[inline]
    #[must_use]
    pub fn timepoints(&self) -> &[Timepoint] {
        &self.timepoints
    }

    /// Find the timepoint with the given index.
    #[must_use]
    pub fn timepoint(&self, index: u32) -> Option<&Timepoint> {
        self.timepoints
            .binary_search_by_key(&index, Timepoint::index)
            .ok()
            .map(|i| &self.timepoints[i])
    }

    /// Resolve a cell name to its live cell, if present.
    #[must_use]
    pub fn find(&self, name: &CellName) -> Option<&Cell> {
        self.timepoint(name.timepoint)?.get(name)
    }

    /// Number of timepoints.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.timepoints.len()
    }

    /// Check if the sequence has no timepoints.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timepoints.is_empty()
    }

    /// Total number of cells across all timepoints.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.timepoints.iter().map(Timepoint::len).sum()
    }
}
