//! Two-sided tree layout.
//!
//! The root sits at the origin. Its first half of children (rounded up) grows
//! to the left, the rest to the right, each side vertically centered on the
//! root. Roots with fewer than two children use the plain tree layout.

use mosaic_core::geometry::Point;

use super::{
    MindMapEngine, Spacing,
    tree::{self, Direction},
};
use crate::layout::hierarchy::LayoutTree;

#[derive(Debug, Default)]
pub struct Engine {
    fallback: tree::Engine,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MindMapEngine for Engine {
    fn place(&self, tree: &mut LayoutTree, root: usize, spacing: Spacing) {
        let children = tree.node(root).children.clone();
        if children.len() < 2 {
            self.fallback.place(tree, root, spacing);
            return;
        }

        tree.set_position(root, Point::default());
        let center = tree.node(root).size.height() / 2.0;
        let (left, right) = children.split_at(children.len().div_ceil(2));

        for (side, direction) in [(left, Direction::Left), (right, Direction::Right)] {
            let mut cursor = center - tree.span(side, spacing.sibling) / 2.0;
            for &child in side {
                tree::place_subtree(tree, child, 1, cursor, direction, spacing);
                cursor += tree.node(child).subtree_height + spacing.sibling;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::hierarchy::tests::region;

    const SPACING: Spacing = Spacing {
        sibling: 60.0,
        layer: 200.0,
    };

    fn laid_out(nodes: &[(&str, Option<&str>)]) -> LayoutTree {
        let mut tree = LayoutTree::build(&region(nodes));
        tree.compute_subtree_heights(SPACING.sibling);
        Engine::new().place(&mut tree, 0, SPACING);
        tree
    }

    #[test]
    fn test_five_children_split_three_two() {
        let tree = laid_out(&[
            ("r", None),
            ("a", Some("r")),
            ("b", Some("r")),
            ("c", Some("r")),
            ("d", Some("r")),
            ("e", Some("r")),
        ]);

        assert_eq!(tree.node(0).position, Point::new(0.0, 0.0));
        for idx in 1..=3 {
            assert_eq!(tree.node(idx).position.x(), -200.0);
        }
        for idx in 4..=5 {
            assert_eq!(tree.node(idx).position.x(), 200.0);
        }
    }

    #[test]
    fn test_sides_centered_on_root() {
        let tree = laid_out(&[("r", None), ("a", Some("r")), ("b", Some("r"))]);

        assert_eq!(tree.node(1).position, Point::new(-200.0, 0.0));
        assert_eq!(tree.node(2).position, Point::new(200.0, 0.0));
    }

    #[test]
    fn test_grandchildren_grow_outward() {
        let tree = laid_out(&[
            ("r", None),
            ("a", Some("r")),
            ("b", Some("r")),
            ("a1", Some("a")),
            ("b1", Some("b")),
        ]);

        assert_eq!(tree.node(3).position.x(), -400.0);
        assert_eq!(tree.node(4).position.x(), 400.0);
    }

    #[test]
    fn test_single_child_falls_back_to_tree() {
        let tree = laid_out(&[("r", None), ("a", Some("r"))]);
        assert_eq!(tree.node(1).position, Point::new(200.0, 0.0));
    }
}
