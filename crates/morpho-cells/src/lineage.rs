//! Lineage trees.

use crate::CellName;

/// One node of a lineage tree: a cell identity plus the cells it was
/// linked to at the next timepoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageNode {
    /// Identity of the cell this node stands for.
    pub name: CellName,
    /// Child nodes in the order the links were made.
    pub children: Vec<LineageNode>,
}

impl LineageNode {
    /// Create a leaf node.
    #[must_use]
    pub const fn new(name: CellName) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    /// Check if the node has no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Height of the subtree in edges; 0 for a leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Preorder traversal of the subtree, parents before children.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Mutable references to the leaves of the subtree, left to right.
    ///
    /// Tracking grows trees level by level by appending children to the
    /// current leaves.
    #[must_use]
    pub fn leaves_mut(&mut self) -> Vec<&mut Self> {
        let mut out = Vec::new();
        self.collect_leaves_mut(&mut out);
        out
    }

    fn collect_leaves_mut<'a>(&'a mut self, out: &mut Vec<&'a mut Self>) {
        if self.children.is_empty() {
            out.push(self);
        } else {
            for child in &mut self.children {
                child.collect_leaves_mut(out);
            }
        }
    }
}

/// Preorder iterator over a lineage subtree.
#[derive(Debug)]
pub struct Preorder<'a> {
    stack: Vec<&'a LineageNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a LineageNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A forest of lineage trees, one tree per tracked seed cell.
///
/// # Example
///
/// ```
/// use morpho_cells::{CellName, LineageForest, LineageNode};
///
/// let mut root = LineageNode::new(CellName::new(1, 5));
/// root.children.push(LineageNode::new(CellName::new(2, 9)));
///
/// let forest = LineageForest::new(vec![root]);
/// assert_eq!(forest.node_count(), 2);
/// assert_eq!(forest.coverage(2).complete, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageForest {
    /// Root nodes, one per seed, in seeding order.
    pub roots: Vec<LineageNode>,
}

/// How many lineages span the full observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    /// Number of lineage trees in the forest.
    pub total: usize,
    /// Trees whose deepest branch reaches through all timepoints.
    pub complete: usize,
}

impl LineageForest {
    /// Create a forest from its root nodes.
    #[must_use]
    pub const fn new(roots: Vec<LineageNode>) -> Self {
        Self { roots }
    }

    /// Check if the forest has no trees.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Preorder traversal over every tree, in root order.
    pub fn preorder(&self) -> impl Iterator<Item = &LineageNode> {
        self.roots.iter().flat_map(LineageNode::preorder)
    }

    /// Total number of nodes in the forest.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }

    /// Coverage statistics: a tree is complete when its deepest branch
    /// spans `total_timepoints` timepoints.
    #[must_use]
    pub fn coverage(&self, total_timepoints: usize) -> Coverage {
        let complete = self
            .roots
            .iter()
            .filter(|r| r.height() + 1 >= total_timepoints.max(1))
            .count();
        Coverage {
            total: self.roots.len(),
            complete,
        }
    }
}
