//! Legacy GEXF export.
//!
//! Mirrors the file layout downstream graph tools already ingest:
//! undirected static graph, node labels equal to node ids, the tissue
//! tag as a string attvalue and the interface area as the edge weight.
//! Export only; there is no GEXF import path.

use crate::{IoError, IoResult};
use morpho_cells::ContactGraph;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

const GEXF_XMLNS: &str = "http://www.gexf.net/1.2draft";

/// Render a contact graph as a GEXF document.
///
/// # Errors
///
/// Returns [`IoError::Xml`] if XML generation fails.
pub fn gexf_string(graph: &ContactGraph) -> IoResult<String> {
    let mut buffer = Vec::new();
    let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| IoError::xml(format!("failed to write XML declaration: {e}")))?;

    let mut gexf = BytesStart::new("gexf");
    gexf.push_attribute(("xmlns", GEXF_XMLNS));
    gexf.push_attribute(("version", "1.2"));
    writer
        .write_event(Event::Start(gexf))
        .map_err(|e| IoError::xml(format!("failed to write gexf element: {e}")))?;

    let mut graph_el = BytesStart::new("graph");
    graph_el.push_attribute(("defaultedgetype", "undirected"));
    graph_el.push_attribute(("mode", "static"));
    graph_el.push_attribute(("name", format!("t{}", graph.timepoint()).as_str()));
    writer
        .write_event(Event::Start(graph_el))
        .map_err(|e| IoError::xml(format!("failed to write graph element: {e}")))?;

    let mut attributes = BytesStart::new("attributes");
    attributes.push_attribute(("class", "node"));
    attributes.push_attribute(("mode", "static"));
    writer
        .write_event(Event::Start(attributes))
        .map_err(|e| IoError::xml(format!("failed to write attributes element: {e}")))?;
    let mut attribute = BytesStart::new("attribute");
    attribute.push_attribute(("id", "0"));
    attribute.push_attribute(("title", "collection"));
    attribute.push_attribute(("type", "string"));
    writer
        .write_event(Event::Empty(attribute))
        .map_err(|e| IoError::xml(format!("failed to write attribute element: {e}")))?;
    writer
        .write_event(Event::End(BytesEnd::new("attributes")))
        .map_err(|e| IoError::xml(format!("failed to close attributes: {e}")))?;

    writer
        .write_event(Event::Start(BytesStart::new("nodes")))
        .map_err(|e| IoError::xml(format!("failed to write nodes element: {e}")))?;
    for (name, tissue) in graph.nodes() {
        let id = name.to_string();
        let mut node = BytesStart::new("node");
        node.push_attribute(("id", id.as_str()));
        node.push_attribute(("label", id.as_str()));

        if let Some(tissue) = tissue {
            writer
                .write_event(Event::Start(node))
                .map_err(|e| IoError::xml(format!("failed to write node {id}: {e}")))?;
            writer
                .write_event(Event::Start(BytesStart::new("attvalues")))
                .map_err(|e| IoError::xml(format!("failed to write attvalues: {e}")))?;
            let mut attvalue = BytesStart::new("attvalue");
            attvalue.push_attribute(("for", "0"));
            attvalue.push_attribute(("value", tissue));
            writer
                .write_event(Event::Empty(attvalue))
                .map_err(|e| IoError::xml(format!("failed to write attvalue: {e}")))?;
            writer
                .write_event(Event::End(BytesEnd::new("attvalues")))
                .map_err(|e| IoError::xml(format!("failed to close attvalues: {e}")))?;
            writer
                .write_event(Event::End(BytesEnd::new("node")))
                .map_err(|e| IoError::xml(format!("failed to close node {id}: {e}")))?;
        } else {
            writer
                .write_event(Event::Empty(node))
                .map_err(|e| IoError::xml(format!("failed to write node {id}: {e}")))?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new("nodes")))
        .map_err(|e| IoError::xml(format!("failed to close nodes: {e}")))?;

    writer
        .write_event(Event::Start(BytesStart::new("edges")))
        .map_err(|e| IoError::xml(format!("failed to write edges element: {e}")))?;
    for (i, (a, b, weight)) in graph.edges().enumerate() {
        let mut edge = BytesStart::new("edge");
        edge.push_attribute(("id", i.to_string().as_str()));
        edge.push_attribute(("source", a.to_string().as_str()));
        edge.push_attribute(("target", b.to_string().as_str()));
        edge.push_attribute(("weight", weight.to_string().as_str()));
        writer
            .write_event(Event::Empty(edge))
            .map_err(|e| IoError::xml(format!("failed to write edge {a} -- {b}: {e}")))?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("edges")))
        .map_err(|e| IoError::xml(format!("failed to close edges: {e}")))?;

    writer
        .write_event(Event::End(BytesEnd::new("graph")))
        .map_err(|e| IoError::xml(format!("failed to close graph: {e}")))?;
    writer
        .write_event(Event::End(BytesEnd::new("gexf")))
        .map_err(|e| IoError::xml(format!("failed to close gexf: {e}")))?;

    String::from_utf8(buffer).map_err(|e| IoError::xml(format!("invalid UTF-8 in GEXF: {e}")))
}

/// Save a contact graph as a GEXF file.
///
/// # Errors
///
/// Returns an error if XML generation or the write fails.
pub fn save_gexf<P: AsRef<Path>>(graph: &ContactGraph, path: P) -> IoResult<()> {
    let xml = gexf_string(graph)?;
    fs::write(&path, xml)?;
    info!(
        path = %path.as_ref().display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "GEXF saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_cells::CellName;

    fn sample_graph() -> ContactGraph {
        let mut graph = ContactGraph::new(2);
        graph.add_node(CellName::new(2, 1), Some("cortex".to_owned()));
        graph.add_node(CellName::new(2, 5), None);
        graph.add_edge(CellName::new(2, 1), CellName::new(2, 5), 3.5);
        graph
    }

    #[test]
    fn gexf_structure() {
        let xml = gexf_string(&sample_graph()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<gexf xmlns="http://www.gexf.net/1.2draft" version="1.2">"#));
        assert!(xml.contains(r#"<graph defaultedgetype="undirected" mode="static" name="t2">"#));
        assert!(xml.contains(r#"<attribute id="0" title="collection" type="string"/>"#));
        assert!(xml.contains(r#"<node id="t2_label1" label="t2_label1">"#));
        assert!(xml.contains(r#"<attvalue for="0" value="cortex"/>"#));
        // Untagged node is self-closing, no attvalues.
        assert!(xml.contains(r#"<node id="t2_label5" label="t2_label5"/>"#));
        assert!(xml
            .contains(r#"<edge id="0" source="t2_label1" target="t2_label5" weight="3.5"/>"#));
        assert!(xml.ends_with("</gexf>"));
    }

    #[test]
    fn empty_graph_is_still_well_formed() {
        let xml = gexf_string(&ContactGraph::new(0)).unwrap();
        assert!(xml.contains("<nodes>"));
        assert!(xml.contains("</gexf>"));
    }

    #[test]
    fn save_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t2.gexf");
        save_gexf(&sample_graph(), &path).unwrap();
        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.contains("<gexf"));
    }
}
