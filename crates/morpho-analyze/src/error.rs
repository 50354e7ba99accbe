//! Error types for analysis passes.

use morpho_cells::CellsError;
use thiserror::Error;

/// Errors that can occur during an analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// The pass was cancelled through its [`CancelToken`](morpho_cells::CancelToken).
    #[error("analysis cancelled")]
    Cancelled,

    /// A data model error, such as a seed naming no live cell.
    #[error(transparent)]
    Cells(#[from] CellsError),
}

/// Result type for analysis passes.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;
