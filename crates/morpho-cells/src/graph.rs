//! Undirected contact graph of one timepoint.

use crate::CellName;
use std::collections::{BTreeMap, BTreeSet};

/// Undirected weighted graph of cell-cell contacts at one timepoint.
///
/// Nodes are cell identities carrying an optional tissue tag; edges are
/// keyed by the normalized `(min, max)` name pair, so lookups are
/// symmetric. Edge weights are contact interface areas and therefore
/// non-negative; self-loops are rejected. Ordered maps keep iteration
/// and serialization deterministic.
///
/// # Example
///
/// ```
/// use morpho_cells::{CellName, ContactGraph};
///
/// let a = CellName::new(1, 1);
/// let b = CellName::new(1, 2);
///
/// let mut graph = ContactGraph::new(1);
/// graph.add_node(a, Some("epidermis".to_owned()));
/// graph.add_node(b, None);
/// assert!(graph.add_edge(a, b, 4.0));
///
/// assert_eq!(graph.weight(&b, &a), Some(4.0));
/// assert_eq!(graph.connected_components(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactGraph {
    timepoint: u32,
    nodes: BTreeMap<CellName, Option<String>>,
    edges: BTreeMap<(CellName, CellName), f64>,
}

impl ContactGraph {
    /// Create an empty graph for one timepoint.
    #[must_use]
    pub fn new(timepoint: u32) -> Self {
        Self {
            timepoint,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Timepoint index the graph describes.
    #[inline]
    #[must_use]
    pub const fn timepoint(&self) -> u32 {
        self.timepoint
    }

    /// Add a node with an optional tissue tag. An existing node keeps
    /// its tag unless the new one is `Some`.
    pub fn add_node(&mut self, name: CellName, tissue: Option<String>) {
        let entry = self.nodes.entry(name).or_insert(None);
        if tissue.is_some() {
            *entry = tissue;
        }
    }

    /// Add an undirected edge. Both endpoints are added as nodes if
    /// absent; an existing edge is overwritten.
    ///
    /// Returns `false` without mutating for self-loops and weights that
    /// are negative or not finite.
    pub fn add_edge(&mut self, a: CellName, b: CellName, weight: f64) -> bool {
        if a == b || !weight.is_finite() || weight < 0.0 {
            return false;
        }
        self.nodes.entry(a).or_insert(None);
        self.nodes.entry(b).or_insert(None);
        self.edges.insert(Self::key(a, b), weight);
        true
    }

    fn key(a: CellName, b: CellName) -> (CellName, CellName) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Weight of the edge between two cells, in either argument order.
    #[must_use]
    pub fn weight(&self, a: &CellName, b: &CellName) -> Option<f64> {
        self.edges.get(&Self::key(*a, *b)).copied()
    }

    /// Check if a node is present.
    #[must_use]
    pub fn contains_node(&self, name: &CellName) -> bool {
        self.nodes.contains_key(name)
    }

    /// Tissue tag of a node, if the node exists and is tagged.
    #[must_use]
    pub fn tissue(&self, name: &CellName) -> Option<&str> {
        self.nodes.get(name)?.as_deref()
    }

    /// Neighbors of a cell in ascending name order.
    #[must_use]
    pub fn neighbors(&self, name: &CellName) -> Vec<CellName> {
        self.edges
            .keys()
            .filter_map(|&(a, b)| {
                if a == *name {
                    Some(b)
                } else if b == *name {
                    Some(a)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Nodes in ascending name order, with tissue tags.
    pub fn nodes(&self) -> impl Iterator<Item = (&CellName, Option<&str>)> {
        self.nodes.iter().map(|(n, t)| (n, t.as_deref()))
    }

    /// Edges in normalized key order, with weights.
    pub fn edges(&self) -> impl Iterator<Item = (&CellName, &CellName, f64)> {
        self.edges.iter().map(|((a, b), &w)| (a, b, w))
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of connected components; isolated nodes count as their
    /// own component.
    #[must_use]
    pub fn connected_components(&self) -> usize {
        let mut unvisited: BTreeSet<CellName> = self.nodes.keys().copied().collect();
        let mut components = 0;

        while let Some(&start) = unvisited.iter().next() {
            components += 1;
            let mut frontier = vec![start];
            unvisited.remove(&start);
            while let Some(node) = frontier.pop() {
                for neighbor in self.neighbors(&node) {
                    if unvisited.remove(&neighbor) {
                        frontier.push(neighbor);
                    }
                }
            }
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(label: u64) -> CellName {
        CellName::new(1, label)
    }

    #[test]
    fn edge_lookup_is_symmetric() {
        let mut g = ContactGraph::new(1);
        assert!(g.add_edge(name(2), name(1), 3.5));
        assert_eq!(g.weight(&name(1), &name(2)), Some(3.5));
        assert_eq!(g.weight(&name(2), &name(1)), Some(3.5));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn reversed_insert_overwrites_same_edge() {
        let mut g = ContactGraph::new(1);
        g.add_edge(name(1), name(2), 1.0);
        g.add_edge(name(2), name(1), 2.0);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.weight(&name(1), &name(2)), Some(2.0));
    }

    #[test]
    fn rejects_self_loops_and_bad_weights() {
        let mut g = ContactGraph::new(1);
        assert!(!g.add_edge(name(1), name(1), 1.0));
        assert!(!g.add_edge(name(1), name(2), -1.0));
        assert!(!g.add_edge(name(1), name(2), f64::NAN));
        assert!(g.is_empty());
    }

    #[test]
    fn node_tissue_tags() {
        let mut g = ContactGraph::new(1);
        g.add_node(name(1), None);
        g.add_node(name(1), Some("cortex".to_owned()));
        g.add_node(name(1), None); // does not erase the tag
        assert_eq!(g.tissue(&name(1)), Some("cortex"));
        assert_eq!(g.tissue(&name(2)), None);
    }

    #[test]
    fn neighbors_sorted() {
        let mut g = ContactGraph::new(1);
        g.add_edge(name(2), name(3), 1.0);
        g.add_edge(name(2), name(1), 1.0);
        assert_eq!(g.neighbors(&name(2)), [name(1), name(3)]);
    }

    #[test]
    fn connected_components_counts_isolated_nodes() {
        let mut g = ContactGraph::new(1);
        g.add_edge(name(1), name(2), 1.0);
        g.add_edge(name(2), name(3), 1.0);
        g.add_node(name(9), None);
        assert_eq!(g.connected_components(), 2);
    }
}
