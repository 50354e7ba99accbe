//! Lineage forest JSON.
//!
//! One schema is used in both directions: a synthetic root object whose
//! children are the lineage trees. Every tree node carries the numeric
//! segmentation label as `name`, the timepoint as `t` and the canonical
//! cell name as `obj_name`:
//!
//! ```json
//! {"name": "root", "children": [
//!   {"name": 5, "t": 1, "obj_name": "t1_label5", "children": [
//!     {"name": 9, "t": 2, "obj_name": "t2_label9"}
//!   ]}
//! ]}
//! ```
//!
//! `obj_name` is derived from `t` and `name` on import, so a stale or
//! missing `obj_name` cannot desynchronize identities.

use crate::{IoError, IoResult};
use morpho_cells::{CellName, LineageForest, LineageNode};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct RootRecord {
    name: &'static str,
    children: Vec<NodeRecord>,
}

#[derive(Debug, Serialize)]
struct NodeRecord {
    name: u64,
    t: u32,
    obj_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeRecord>,
}

impl NodeRecord {
    fn from_node(node: &LineageNode) -> Self {
        Self {
            name: node.name.label,
            t: node.name.timepoint,
            obj_name: node.name.to_string(),
            children: node.children.iter().map(Self::from_node).collect(),
        }
    }
}

/// Render a lineage forest as canonical JSON.
///
/// # Errors
///
/// Returns [`IoError::Json`] if serialization fails.
pub fn forest_to_json(forest: &LineageForest) -> IoResult<String> {
    let root = RootRecord {
        name: "root",
        children: forest.roots.iter().map(NodeRecord::from_node).collect(),
    };
    Ok(serde_json::to_string_pretty(&root)?)
}

/// Parse a lineage forest from canonical JSON.
///
/// # Errors
///
/// [`IoError::Json`] for malformed JSON, [`IoError::FormatMismatch`]
/// when a node lacks a numeric `name` or a `t` timepoint. Nothing is
/// partially imported on failure.
pub fn forest_from_json(json: &str) -> IoResult<LineageForest> {
    let value: Value = serde_json::from_str(json)?;
    let obj = value
        .as_object()
        .ok_or_else(|| IoError::format_mismatch("top level is not an object"))?;

    let children = match obj.get("children") {
        None => return Ok(LineageForest::default()),
        Some(children) => children
            .as_array()
            .ok_or_else(|| IoError::format_mismatch("root children is not an array"))?,
    };

    let roots = children
        .iter()
        .map(node_from_value)
        .collect::<IoResult<Vec<_>>>()?;
    Ok(LineageForest::new(roots))
}

fn node_from_value(value: &Value) -> IoResult<LineageNode> {
    let obj = value
        .as_object()
        .ok_or_else(|| IoError::format_mismatch("lineage node is not an object"))?;

    let label = obj
        .get("name")
        .and_then(Value::as_u64)
        .ok_or_else(|| IoError::format_mismatch("lineage node has no numeric name"))?;
    let timepoint = obj
        .get("t")
        .and_then(Value::as_u64)
        .and_then(|t| u32::try_from(t).ok())
        .ok_or_else(|| {
            IoError::format_mismatch(format!("lineage node {label} has no timepoint field t"))
        })?;

    let mut node = LineageNode::new(CellName::new(timepoint, label));
    if let Some(children) = obj.get("children") {
        let children = children
            .as_array()
            .ok_or_else(|| IoError::format_mismatch("node children is not an array"))?;
        node.children = children
            .iter()
            .map(node_from_value)
            .collect::<IoResult<Vec<_>>>()?;
    }
    Ok(node)
}

/// Save a lineage forest to a JSON file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_lineage<P: AsRef<Path>>(forest: &LineageForest, path: P) -> IoResult<()> {
    let json = forest_to_json(forest)?;
    fs::write(&path, json)?;
    info!(
        path = %path.as_ref().display(),
        lineages = forest.roots.len(),
        "lineage saved"
    );
    Ok(())
}

/// Load a lineage forest from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not follow the
/// lineage schema.
pub fn load_lineage<P: AsRef<Path>>(path: P) -> IoResult<LineageForest> {
    let json = fs::read_to_string(path)?;
    forest_from_json(&json)
}
