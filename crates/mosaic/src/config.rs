//! Configuration types for Mosaic compilation.
//!
//! This module provides configuration structures that control how mind-map
//! regions are laid out. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`LayoutConfig`] - Default algorithm, spacing and node sizes used by the
//!   layout engine when a region or node does not declare its own.
//!
//! # Example
//!
//! ```
//! # use mosaic::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.layout().layer_spacing(), 200.0);
//! ```

use serde::Deserialize;
use thiserror::Error;

use mosaic_core::{element::LayoutAlgorithm, geometry::Size};

/// A configuration value outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("`layout.{field}` is {value}, expected {expected}")]
pub struct InvalidConfig {
    field: &'static str,
    value: f64,
    expected: &'static str,
}

impl InvalidConfig {
    /// Name of the offending field within the `layout` section.
    pub fn field(&self) -> &'static str {
        self.field
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout configuration.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Checks every section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first value outside its allowed range.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        self.layout.validate()
    }
}

/// Layout engine defaults.
///
/// Every field can be omitted from a configuration file; missing fields
/// keep their default value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Algorithm for regions without a `layout` prop.
    algorithm: LayoutAlgorithm,
    /// Vertical gap between sibling subtrees (and between stacked roots).
    spacing: f64,
    /// Horizontal distance between depth levels of the tree algorithms.
    layer_spacing: f64,
    /// Width of mind-map nodes without a `width` prop.
    node_width: f64,
    /// Height of mind-map nodes without a `height` prop.
    node_height: f64,
    /// Radius of the first ring of the radial algorithm.
    radial_radius: f64,
    /// Factor the radial ring radius shrinks by per depth level.
    radial_decay: f64,
    /// Default gap between an anchored region and its target.
    region_gap: f64,
    /// Horizontal gap between unanchored regions.
    region_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::Tree,
            spacing: 60.0,
            layer_spacing: 200.0,
            node_width: 150.0,
            node_height: 50.0,
            radial_radius: 240.0,
            radial_decay: 0.6,
            region_gap: 100.0,
            region_spacing: 200.0,
        }
    }
}

impl LayoutConfig {
    /// Sets the default algorithm.
    pub fn with_algorithm(mut self, algorithm: LayoutAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the sibling spacing.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the layer spacing.
    pub fn with_layer_spacing(mut self, layer_spacing: f64) -> Self {
        self.layer_spacing = layer_spacing;
        self
    }

    /// Checks that distances and sizes are finite and non-negative and that
    /// the radial decay lies in `(0, 1]`.
    ///
    /// `region_gap` may be negative, the same as a region's `gap` prop.
    ///
    /// # Errors
    ///
    /// Returns the first value outside its allowed range.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let non_negative = [
            ("spacing", self.spacing),
            ("layer_spacing", self.layer_spacing),
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("radial_radius", self.radial_radius),
            ("region_spacing", self.region_spacing),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidConfig {
                    field,
                    value,
                    expected: "a non-negative number",
                });
            }
        }
        if !self.region_gap.is_finite() {
            return Err(InvalidConfig {
                field: "region_gap",
                value: self.region_gap,
                expected: "a finite number",
            });
        }
        if !(self.radial_decay > 0.0 && self.radial_decay <= 1.0) {
            return Err(InvalidConfig {
                field: "radial_decay",
                value: self.radial_decay,
                expected: "a number in (0, 1]",
            });
        }
        Ok(())
    }

    pub fn algorithm(&self) -> LayoutAlgorithm {
        self.algorithm
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn layer_spacing(&self) -> f64 {
        self.layer_spacing
    }

    /// Returns the default mind-map node size.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    pub fn radial_radius(&self) -> f64 {
        self.radial_radius
    }

    pub fn radial_decay(&self) -> f64 {
        self.radial_decay
    }

    pub fn region_gap(&self) -> f64 {
        self.region_gap
    }

    pub fn region_spacing(&self) -> f64 {
        self.region_spacing
    }
}
