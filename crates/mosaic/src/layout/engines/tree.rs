//! Left-to-right tree layout.
//!
//! Depth maps to x. Every node owns a horizontal band as tall as its subtree;
//! children stack inside their parent's band and the parent is centered on
//! the span of its children.

use mosaic_core::geometry::Point;

use super::{MindMapEngine, Spacing};
use crate::layout::hierarchy::LayoutTree;

/// Horizontal growth of a subtree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Direction {
    Right,
    Left,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }
}

impl MindMapEngine for Engine {
    fn place(&self, tree: &mut LayoutTree, root: usize, spacing: Spacing) {
        place_subtree(tree, root, 0, 0.0, Direction::Right, spacing);
    }
}

/// Lays out the subtree of `idx` inside the band starting at `top`.
pub(super) fn place_subtree(
    tree: &mut LayoutTree,
    idx: usize,
    depth: usize,
    top: f64,
    direction: Direction,
    spacing: Spacing,
) {
    let x = direction.sign() * depth as f64 * spacing.layer;
    let children = tree.node(idx).children.clone();
    let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
        tree.set_position(idx, Point::new(x, top));
        return;
    };

    let span = tree.span(&children, spacing.sibling);
    let mut cursor = top + (tree.node(idx).subtree_height - span) / 2.0;
    for &child in &children {
        place_subtree(tree, child, depth + 1, cursor, direction, spacing);
        cursor += tree.node(child).subtree_height + spacing.sibling;
    }

    let first_top = tree.node(first).position.y();
    let last_bottom = tree.node(last).bounds().max_y();
    let y = (first_top + last_bottom) / 2.0 - tree.node(idx).size.height() / 2.0;
    tree.set_position(idx, Point::new(x, y));
}
