//! The local tree of a region.
//!
//! Nodes live in an arena and refer to their children by index. The tree is
//! only alive while a region is laid out; engines write local top-left
//! coordinates into it and [`LayoutTree::positions`] hands them back keyed by
//! node id.

use std::collections::HashMap;

use mosaic_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use super::region::Region;

/// A node of the local tree.
#[derive(Debug, Clone)]
pub(super) struct LayoutNode {
    pub id: Id,
    /// Arena indices of the children, in document order.
    pub children: Vec<usize>,
    pub size: Size,
    /// Top-left corner in region-local coordinates.
    pub position: Point,
    /// Vertical extent reserved for this node and all of its descendants.
    pub subtree_height: f64,
}

impl LayoutNode {
    fn new(id: Id, size: Size) -> Self {
        Self {
            id,
            children: Vec::new(),
            size,
            position: Point::default(),
            subtree_height: size.height(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }
}

/// Arena-backed forest of one region.
#[derive(Debug, Default)]
pub(super) struct LayoutTree {
    nodes: Vec<LayoutNode>,
    roots: Vec<usize>,
}

impl LayoutTree {
    /// Builds the forest of a validated region.
    ///
    /// A node whose `from` is missing or names a node outside the region is a
    /// root. Children keep the document order of the region.
    pub fn build(region: &Region) -> Self {
        let index: HashMap<Id, usize> = region
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id, idx))
            .collect();

        let mut nodes: Vec<LayoutNode> = region
            .nodes
            .iter()
            .map(|node| LayoutNode::new(node.id, node.size))
            .collect();
        let mut roots = Vec::new();

        for (idx, node) in region.nodes.iter().enumerate() {
            match node.from.and_then(|from| index.get(&from)) {
                Some(&parent) => nodes[parent].children.push(idx),
                None => roots.push(idx),
            }
        }

        Self { nodes, roots }
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn node(&self, idx: usize) -> &LayoutNode {
        &self.nodes[idx]
    }

    pub fn set_position(&mut self, idx: usize, position: Point) {
        self.nodes[idx].position = position;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Computes `subtree_height` for every node, bottom-up.
    pub fn compute_subtree_heights(&mut self, spacing: f64) {
        for root in self.roots.clone() {
            self.compute_subtree_height(root, spacing);
        }
    }

    fn compute_subtree_height(&mut self, idx: usize, spacing: f64) -> f64 {
        let children = self.nodes[idx].children.clone();
        for &child in &children {
            self.compute_subtree_height(child, spacing);
        }
        let span = self.span(&children, spacing);
        let node = &mut self.nodes[idx];
        node.subtree_height = node.size.height().max(span);
        node.subtree_height
    }

    /// Total height of `nodes` stacked with `spacing` between their subtrees.
    pub fn span(&self, nodes: &[usize], spacing: f64) -> f64 {
        if nodes.is_empty() {
            return 0.0;
        }
        let heights: f64 = nodes
            .iter()
            .map(|&idx| self.nodes[idx].subtree_height)
            .sum();
        heights + spacing * (nodes.len() - 1) as f64
    }

    /// Indices of `root` and all of its descendants.
    fn subtree(&self, root: usize) -> Vec<usize> {
        let mut stack = vec![root];
        let mut result = Vec::new();
        while let Some(idx) = stack.pop() {
            result.push(idx);
            stack.extend(self.nodes[idx].children.iter().copied());
        }
        result
    }

    /// Bounding box of the subtree rooted at `root`.
    pub fn subtree_bounds(&self, root: usize) -> Bounds {
        self.subtree(root)
            .into_iter()
            .map(|idx| self.nodes[idx].bounds())
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default()
    }

    /// Moves the subtree rooted at `root` by `offset`.
    pub fn translate_subtree(&mut self, root: usize, offset: Point) {
        for idx in self.subtree(root) {
            let node = &mut self.nodes[idx];
            node.position = node.position.add_point(offset);
        }
    }

    /// Bounding box of the whole forest, `None` when it has no nodes.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(LayoutNode::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Local position of the first root, the reference point of the region.
    pub fn first_root_position(&self) -> Option<Point> {
        self.roots.first().map(|&idx| self.nodes[idx].position)
    }

    /// Final positions after moving the whole forest by `offset`.
    pub fn positions(&self, offset: Point) -> HashMap<Id, Point> {
        self.nodes
            .iter()
            .map(|node| (node.id, node.position.add_point(offset).snapped()))
            .collect()
    }
}
