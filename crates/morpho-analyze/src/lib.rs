//! Analysis passes over segmented time-lapse data: lineage tracking,
//! contact-graph construction and morphometric summaries.
//!
//! Tracking links each cell to its nearest-centroid successor at the
//! next timepoint ([`Tracker`]); contact analysis tests every cell pair
//! of a timepoint for surface contact and weights edges by interface
//! area ([`contact_graph`]). Both are deterministic for a given input
//! regardless of thread count, honor a
//! [`CancelToken`](morpho_cells::CancelToken) and report progress
//! through a callback.
//!
//! # Example
//!
//! ```
//! use morpho_analyze::{contact_graph, ContactOptions, Tracker};
//! use morpho_cells::{AnalysisSession, Cell, CellName, Timepoint, TimepointSequence};
//! use morpho_geom::{cube, CellGeometry, Point3};
//!
//! let cells = vec![
//!     Cell::new(
//!         CellName::new(1, 1),
//!         CellGeometry::from_tri_mesh(cube(Point3::new(0.0, 0.0, 0.0), 2.0)),
//!     ),
//!     Cell::new(
//!         CellName::new(1, 2),
//!         CellGeometry::from_tri_mesh(cube(Point3::new(2.0, 0.0, 0.0), 2.0)),
//!     ),
//! ];
//! let sequence = TimepointSequence::new(vec![Timepoint::new(1, cells)]);
//! let mut session = AnalysisSession::new(sequence, 1.0);
//!
//! let (forest, _report) = Tracker::new(5.0, session.unit_scale())
//!     .track(session.timepoints())
//!     .unwrap();
//! session.set_forest(forest);
//!
//! let graph = contact_graph(
//!     &session.timepoints().timepoints()[0],
//!     session.unit_scale(),
//!     &ContactOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(graph.edge_count(), 1);
//! session.insert_graph(graph);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod contact;
mod error;
mod morphometry;
mod track;

pub use contact::{contact_graph, contact_graphs, ContactOptions};
pub use error::{AnalyzeError, AnalyzeResult};
pub use morphometry::{morphometry_table, Morphometry};
pub use track::{Seeds, Tracker, TrackingReport};
