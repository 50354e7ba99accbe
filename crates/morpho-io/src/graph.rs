//! Contact graph JSON in node-link form.
//!
//! ```json
//! {"directed": false,
//!  "nodes": [{"id": "t1_label1", "collection": "cortex"}],
//!  "links": [{"source": "t1_label1", "target": "t1_label2", "area": 4.0}]}
//! ```
//!
//! One file per timepoint, named `3dconnectivity_t<T>.json`.

use crate::{IoError, IoResult};
use morpho_cells::{CellName, ContactGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct GraphRecord {
    directed: bool,
    nodes: Vec<NodeRecord>,
    links: Vec<LinkRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkRecord {
    source: String,
    target: String,
    area: f64,
}

/// Render a contact graph as node-link JSON.
///
/// # Errors
///
/// Returns [`IoError::Json`] if serialization fails.
pub fn graph_to_json(graph: &ContactGraph) -> IoResult<String> {
    let record = GraphRecord {
        directed: false,
        nodes: graph
            .nodes()
            .map(|(name, tissue)| NodeRecord {
                id: name.to_string(),
                collection: tissue.map(str::to_owned),
            })
            .collect(),
        links: graph
            .edges()
            .map(|(a, b, weight)| LinkRecord {
                source: a.to_string(),
                target: b.to_string(),
                area: weight,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

/// Parse a contact graph from node-link JSON.
///
/// The graph's timepoint is taken from its node identities, which must
/// all agree.
///
/// # Errors
///
/// [`IoError::Json`] for malformed JSON, [`IoError::FormatMismatch`]
/// for a directed graph, an unparsable cell id, mixed timepoints, a
/// link to an absent node or a negative area.
pub fn graph_from_json(json: &str) -> IoResult<ContactGraph> {
    let record: GraphRecord = serde_json::from_str(json)?;
    if record.directed {
        return Err(IoError::format_mismatch("contact graphs are undirected"));
    }

    let mut timepoint = None;
    let mut names = Vec::with_capacity(record.nodes.len());
    for node in &record.nodes {
        let name: CellName = node
            .id
            .parse()
            .map_err(|_| IoError::format_mismatch(format!("bad cell id {:?}", node.id)))?;
        match timepoint {
            None => timepoint = Some(name.timepoint),
            Some(t) if t != name.timepoint => {
                return Err(IoError::format_mismatch(format!(
                    "graph mixes timepoints {t} and {}",
                    name.timepoint
                )));
            }
            Some(_) => {}
        }
        names.push(name);
    }

    let mut graph = ContactGraph::new(timepoint.unwrap_or(0));
    for (node, name) in record.nodes.iter().zip(names) {
        graph.add_node(name, node.collection.clone());
    }
    for link in &record.links {
        let source: CellName = link
            .source
            .parse()
            .map_err(|_| IoError::format_mismatch(format!("bad link source {:?}", link.source)))?;
        let target: CellName = link
            .target
            .parse()
            .map_err(|_| IoError::format_mismatch(format!("bad link target {:?}", link.target)))?;
        if !graph.contains_node(&source) || !graph.contains_node(&target) {
            return Err(IoError::format_mismatch(format!(
                "link {source} -- {target} references an absent node"
            )));
        }
        if !graph.add_edge(source, target, link.area) {
            return Err(IoError::format_mismatch(format!(
                "link {source} -- {target} has invalid area {}",
                link.area
            )));
        }
    }
    Ok(graph)
}

/// File name for one timepoint's contact graph.
#[must_use]
pub fn contact_graph_file_name(timepoint: u32) -> String {
    format!("3dconnectivity_t{timepoint}.json")
}

/// Save one contact graph per timepoint into a directory.
///
/// Files are named `3dconnectivity_t<T>.json`. Returns the written
/// paths in timepoint order.
///
/// # Errors
///
/// Returns an error if serialization or any write fails.
pub fn save_contact_graphs<P: AsRef<Path>>(
    graphs: &BTreeMap<u32, ContactGraph>,
    dir: P,
) -> IoResult<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(graphs.len());
    for (&timepoint, graph) in graphs {
        let path = dir.as_ref().join(contact_graph_file_name(timepoint));
        fs::write(&path, graph_to_json(graph)?)?;
        paths.push(path);
    }
    info!(
        dir = %dir.as_ref().display(),
        graphs = paths.len(),
        "contact graphs saved"
    );
    Ok(paths)
}

/// Load a contact graph from a node-link JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not follow the
/// node-link schema.
pub fn load_contact_graph<P: AsRef<Path>>(path: P) -> IoResult<ContactGraph> {
    let json = fs::read_to_string(path)?;
    graph_from_json(&json)
}
