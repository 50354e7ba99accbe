//! Cell naming convention.

use crate::{CellsError, CellsResult};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static CELL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, cannot fail
    Regex::new(r"^[Tt](\d+)_label(\d+)$").unwrap()
});

/// Portable identity of one segmented cell: timepoint index plus
/// segmentation label.
///
/// Renders as `t<T>_label<ID>` without zero padding; parsing accepts
/// padded digits and an uppercase `T`, so `T07_label003` and
/// `t7_label3` name the same cell.
///
/// # Example
///
/// ```
/// use morpho_cells::CellName;
///
/// let name: CellName = "T07_label003".parse().unwrap();
/// assert_eq!(name, CellName::new(7, 3));
/// assert_eq!(name.to_string(), "t7_label3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellName {
    /// Timepoint index the cell belongs to.
    pub timepoint: u32,
    /// Segmentation label, unique within its timepoint.
    pub label: u64,
}

impl CellName {
    /// Create a cell name from a timepoint index and label.
    #[inline]
    #[must_use]
    pub const fn new(timepoint: u32, label: u64) -> Self {
        Self { timepoint, label }
    }
}

impl fmt::Display for CellName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}_label{}", self.timepoint, self.label)
    }
}

impl FromStr for CellName {
    type Err = CellsError;

    fn from_str(s: &str) -> CellsResult<Self> {
        let caps = CELL_NAME_RE
            .captures(s)
            .ok_or_else(|| CellsError::InvalidCellName(s.to_owned()))?;
        let timepoint = caps[1]
            .parse()
            .map_err(|_| CellsError::InvalidCellName(s.to_owned()))?;
        let label = caps[2]
            .parse()
            .map_err(|_| CellsError::InvalidCellName(s.to_owned()))?;
        Ok(Self { timepoint, label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_render() {
        let name: CellName = "t3_label42".parse().unwrap();
        assert_eq!(name, CellName::new(3, 42));
        assert_eq!(name.to_string(), "t3_label42");
    }

    #[test]
    fn parse_accepts_padding_and_case() {
        let padded: CellName = "T07_label003".parse().unwrap();
        assert_eq!(padded, CellName::new(7, 3));
        // Renders canonically, not as written.
        assert_eq!(padded.to_string(), "t7_label3");
    }

    #[test]
    fn parse_rejects_malformed_names() {
        for bad in ["", "t3", "label7", "t3_label", "tx_label1", "t3-label7", "cell_t3_label7"] {
            assert!(bad.parse::<CellName>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn ordering_is_timepoint_major() {
        let a = CellName::new(1, 99);
        let b = CellName::new(2, 1);
        assert!(a < b);
        assert!(CellName::new(2, 1) < CellName::new(2, 2));
    }
}
