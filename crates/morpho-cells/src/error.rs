//! Error types for the cell data model.

use crate::CellName;
use thiserror::Error;

/// Errors that can occur in the cell data model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellsError {
    /// A cell name does not follow the `t<T>_label<ID>` convention.
    #[error("invalid cell name: {0:?} (expected t<T>_label<ID>)")]
    InvalidCellName(String),

    /// A timepoint name does not follow the `t<N>` convention.
    #[error("invalid timepoint name: {0:?} (expected t<N>)")]
    InvalidTimepointName(String),

    /// A cell identity refers to no live cell in the sequence.
    #[error("no cell named {0} in the loaded timepoints")]
    IdentityNotFound(CellName),
}

/// Result type for cell data model operations.
pub type CellsResult<T> = Result<T, CellsError>;
