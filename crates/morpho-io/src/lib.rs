//! Persistence for analysis artifacts.
//!
//! Lineage forests and contact graphs serialize to JSON schemas that
//! round-trip losslessly; contact graphs additionally export to GEXF
//! for downstream graph tools, and morphometry tables export as TSV.
//! Serialized records are decoupled from the in-memory model, so schema
//! changes stay inside this crate.
//!
//! # Example
//!
//! ```
//! use morpho_cells::{CellName, LineageForest, LineageNode};
//! use morpho_io::{forest_from_json, forest_to_json};
//!
//! let forest = LineageForest::new(vec![LineageNode::new(CellName::new(1, 5))]);
//! let json = forest_to_json(&forest).unwrap();
//! assert_eq!(forest_from_json(&json).unwrap(), forest);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod gexf;
mod graph;
mod lineage;
mod table;

pub use error::{IoError, IoResult};
pub use gexf::{gexf_string, save_gexf};
pub use graph::{
    contact_graph_file_name, graph_from_json, graph_to_json, load_contact_graph,
    save_contact_graphs,
};
pub use lineage::{forest_from_json, forest_to_json, load_lineage, save_lineage};
pub use table::{morphometry_tsv, save_morphometry_tsv};
