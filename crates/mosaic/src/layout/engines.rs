//! Layout engine factory module
//!
//! Each mind-map region names the algorithm that positions its nodes. This
//! module maps those algorithms to engines, caches configured engines for
//! reuse across regions and drives the full layout of a container.
//!
//! The module uses a builder pattern for creating and configuring layout engines.

mod bidirectional;
mod radial;
mod tree;

use std::collections::HashMap;

use log::{debug, info, trace};

use mosaic_compiler::error::Diagnostic;
use mosaic_core::{
    element::LayoutAlgorithm,
    geometry::{Bounds, Point},
    identifier::Id,
    tree::Container,
};

use super::{compose, hierarchy::LayoutTree, region};
use crate::config::LayoutConfig;

/// Spacing a region is laid out with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Spacing {
    /// Gap between sibling subtrees.
    pub sibling: f64,
    /// Distance between depth levels.
    pub layer: f64,
}

/// Trait defining the interface for mind-map layout engines
pub(super) trait MindMapEngine {
    /// Assign local top-left positions to the subtree rooted at `root`.
    ///
    /// The tree carries precomputed subtree heights. Where the root itself
    /// lands is up to the engine; multiple roots are stacked by the caller.
    fn place(&self, tree: &mut LayoutTree, root: usize, spacing: Spacing);
}

/// Builder for creating and configuring layout engines.
/// Builder is not reuseable after build() is called.
pub struct EngineBuilder {
    // Cache for reusing engines with the same configuration
    engines: HashMap<LayoutAlgorithm, Box<dyn MindMapEngine>>,

    config: LayoutConfig,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl EngineBuilder {
    /// Create a new engine builder using `config` for every value a region
    /// or node leaves unset
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            engines: HashMap::new(),
            config,
        }
    }

    /// Set the default algorithm for regions without a `layout` prop
    pub fn with_algorithm(mut self, algorithm: LayoutAlgorithm) -> Self {
        self.config = self.config.with_algorithm(algorithm);
        self
    }

    /// Set the default sibling spacing
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.config = self.config.with_spacing(spacing);
        self
    }

    /// Set the default layer spacing
    pub fn with_layer_spacing(mut self, layer_spacing: f64) -> Self {
        self.config = self.config.with_layer_spacing(layer_spacing);
        self
    }

    /// Get an engine of the specified type with configured options
    fn engine(&mut self, algorithm: LayoutAlgorithm) -> &dyn MindMapEngine {
        let engine = self.engines.entry(algorithm).or_insert_with(|| {
            let engine: Box<dyn MindMapEngine> = match algorithm {
                LayoutAlgorithm::Tree => Box::new(tree::Engine::new()),
                LayoutAlgorithm::Bidirectional => Box::new(bidirectional::Engine::new()),
                LayoutAlgorithm::Radial => {
                    let mut e = radial::Engine::new();
                    e.set_radius(self.config.radial_radius());
                    e.set_decay(self.config.radial_decay());
                    Box::new(e)
                }
            };
            engine
        });
        // Dereference to avoid returning reference to temporary
        &**engine
    }

    /// Position every mind-map node of `container`.
    ///
    /// Runs in three phases:
    /// 1. Collect the regions and validate all of them
    /// 2. Lay out each region in local coordinates
    /// 3. Compose the regions and write the positions back
    ///
    /// Nothing is written unless every phase succeeds.
    ///
    /// # Errors
    /// Returns a structural [`Diagnostic`] when a region hierarchy has a cycle
    /// or a duplicate node, or when region anchors form a cycle.
    pub fn build(mut self, container: &mut Container) -> Result<(), Diagnostic> {
        let regions = region::collect_regions(container, &self.config)?;
        if regions.is_empty() {
            debug!("No mind-map regions to lay out");
            return Ok(());
        }

        for region in &regions {
            region.validate()?;
        }

        let mut layouts = Vec::with_capacity(regions.len());
        for region in &regions {
            let spacing = Spacing {
                sibling: region.spacing,
                layer: region.layer_spacing,
            };
            let mut tree = LayoutTree::build(region);
            tree.compute_subtree_heights(spacing.sibling);

            let engine = self.engine(region.algorithm);
            let mut previous: Option<Bounds> = None;
            for root in tree.roots().to_vec() {
                engine.place(&mut tree, root, spacing);
                if let Some(above) = previous {
                    let bounds = tree.subtree_bounds(root);
                    let shift = above.max_y() + spacing.sibling - bounds.min_y();
                    tree.translate_subtree(root, Point::new(0.0, shift));
                }
                previous = Some(tree.subtree_bounds(root));
            }

            debug!(
                region = region.id.to_string(),
                algorithm = region.algorithm.as_str(),
                nodes = tree.len(),
                roots = tree.roots().len();
                "Region laid out"
            );
            layouts.push(tree);
        }

        let offsets = compose::compose(&regions, &layouts, &self.config)?;
        let positions: Vec<HashMap<Id, Point>> = layouts
            .iter()
            .zip(&offsets)
            .map(|(tree, &offset)| tree.positions(offset))
            .collect();
        trace!(positions:?; "Final mind-map positions");

        region::write_back(container, &positions);
        info!(regions = regions.len(); "Mind-map layout complete");
        Ok(())
    }
}
