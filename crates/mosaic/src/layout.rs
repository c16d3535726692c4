//! Layout engine for mind-map regions.
//!
//! This module computes `(x, y)` positions for every mind-map node of the
//! host tree. All other instances keep the placement their author gave them.
//!
//! # Pipeline Position
//!
//! ```text
//! Source document
//!     ↓ mosaic_compiler::compile
//! Container (identifiers resolved)
//!     ↓ layout (this module)
//! Container (mind-map nodes positioned)
//! ```
//!
//! # Stages
//!
//! Per region: collect nodes, validate the hierarchy (no cycles, no duplicate
//! ids), build the local tree and assign local coordinates with the region's
//! algorithm. Once every region is laid out the regions are composed into one
//! coordinate space and the positions are written back onto the instances.
//!
//! # Submodules
//!
//! - [`region`] - Region collection, validation and write-back
//! - [`hierarchy`] - The transient local tree of layout nodes
//! - [`compose`] - Global composition of regions
//!
//! # Re-exports
//!
//! - [`EngineBuilder`] - Builder for configuring and running the layout engines

mod compose;
mod engines;
mod hierarchy;
mod region;

pub use engines::EngineBuilder;
