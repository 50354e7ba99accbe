//! Cell data model for time-lapse segmentation analysis.
//!
//! Cells are identified by the `t<T>_label<ID>` naming convention and
//! grouped into [`Timepoint`]s ordered in a [`TimepointSequence`]. An
//! [`AnalysisSession`] owns a loaded sequence, its unit scale, a shared
//! [`MeasurementCache`] and the analysis results: a [`LineageForest`]
//! from tracking and one [`ContactGraph`] per timepoint from contact
//! analysis.
//!
//! # Example
//!
//! ```
//! use morpho_cells::{AnalysisSession, Cell, CellName, Timepoint, TimepointSequence};
//! use morpho_geom::{unit_cube, CellGeometry};
//!
//! let cell = Cell::new(
//!     CellName::new(1, 4),
//!     CellGeometry::from_tri_mesh(unit_cube()),
//! );
//! let sequence = TimepointSequence::new(vec![Timepoint::new(1, vec![cell])]);
//!
//! let session = AnalysisSession::new(sequence, 0.25);
//! let cell = session.timepoints().find(&CellName::new(1, 4)).unwrap();
//! let m = session.cache().get(cell, session.unit_scale());
//! assert!(m.volume > 0.0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cache;
mod cell;
mod error;
mod graph;
mod lineage;
mod name;
mod progress;
mod session;
mod timepoint;

pub use cache::{Measurement, MeasurementCache};
pub use cell::Cell;
pub use error::{CellsError, CellsResult};
pub use graph::ContactGraph;
pub use lineage::{Coverage, LineageForest, LineageNode, Preorder};
pub use name::CellName;
pub use progress::{CancelToken, ProgressFn};
pub use session::AnalysisSession;
pub use timepoint::{parse_timepoint_name, Timepoint, TimepointSequence};
