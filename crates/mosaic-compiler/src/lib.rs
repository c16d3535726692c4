//! # Mosaic Compiler
//!
//! Front half of the Mosaic pipeline: turns a declarative source document
//! into a host tree with resolved identifiers and document metadata. Layout
//! is left to the `mosaic` crate.
//!
//! ## Usage
//!
//! ```
//! # use mosaic_compiler::{compile, error::Diagnostic, source::SourceDocument};
//!
//! fn main() -> Result<(), Diagnostic> {
//!     let document: SourceDocument = serde_json::from_str(r#"
//!         { "children": [
//!             { "kind": "embed", "props": { "scope": "auth" }, "children": [
//!                 { "kind": "note", "props": { "id": "jwt", "x": 0, "y": 0 } }
//!             ] }
//!         ] }
//!     "#).unwrap();
//!
//!     let container = compile(&document)?;
//!     assert_eq!(container.children()[0].id().unwrap(), "auth.jwt");
//!     Ok(())
//! }
//! ```

pub mod anchor;
pub mod builder;
pub mod canvas;
pub mod error;
mod props;
pub mod scope;
pub mod source;


use log::info;
use mosaic_core::tree::Container;

use error::Diagnostic;
use source::SourceDocument;

/// Compile a source document into a host tree.
///
/// Runs the pipeline stages in order:
///
/// 1. **Build** - Materialize one instance per source node
/// 2. **Scope** - Qualify identifiers and splice embed wrappers
/// 3. **Anchor** - Resolve scope-local anchor targets
/// 4. **Canvas** - Lift the canvas background into the container metadata
///
/// The first failing stage aborts the compile; no partial tree is returned.
pub fn compile(document: &SourceDocument) -> Result<Container, Diagnostic> {
    info!(nodes = document.node_count(); "Building host tree");
    let mut container = builder::build(document)?;

    scope::resolve_scopes(&mut container)?;
    anchor::resolve_anchors(&mut container);
    canvas::extract_canvas_meta(&mut container)?;

    info!(top_level = container.children().len(); "Host tree compiled");
    Ok(container)
}
