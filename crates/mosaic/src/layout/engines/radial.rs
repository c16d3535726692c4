//! Radial layout.
//!
//! The root's top-left corner sits at the origin. Children are spread at
//! equal angles around their parent's center starting at 12 o'clock, on a
//! ring whose radius shrinks with depth.

use std::f64::consts::{FRAC_PI_2, TAU};

use mosaic_core::geometry::Point;

use super::{MindMapEngine, Spacing};
use crate::layout::hierarchy::LayoutTree;

#[derive(Debug)]
pub struct Engine {
    radius: f64,
    decay: f64,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            radius: 240.0,
            decay: 0.6,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ring radius around the root
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    /// Set the factor the radius is multiplied by per depth level
    pub fn set_decay(&mut self, decay: f64) {
        self.decay = decay;
    }

    fn place_children(&self, tree: &mut LayoutTree, parent: usize, depth: i32) {
        let children = tree.node(parent).children.clone();
        if children.is_empty() {
            return;
        }

        let radius = self.radius * self.decay.powi(depth);
        let step = TAU / children.len() as f64;
        let center = tree.node(parent).bounds().center();

        for (i, &child) in children.iter().enumerate() {
            let angle = -FRAC_PI_2 + step * i as f64;
            let child_center = center.polar_offset(radius, angle);
            let size = tree.node(child).size;
            tree.set_position(
                child,
                Point::new(
                    child_center.x() - size.width() / 2.0,
                    child_center.y() - size.height() / 2.0,
                ),
            );
            self.place_children(tree, child, depth + 1);
        }
    }
}

impl MindMapEngine for Engine {
    fn place(&self, tree: &mut LayoutTree, root: usize, _spacing: Spacing) {
        tree.set_position(root, Point::default());
        self.place_children(tree, root, 0);
    }
}
