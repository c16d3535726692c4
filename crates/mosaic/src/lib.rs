//! Mosaic - Compiles declarative canvas documents into laid-out node graphs.
//!
//! A source document is a JSON tree of typed drawing primitives. Compiling it
//! resolves identifiers across embed scopes, resolves anchors, lifts canvas
//! metadata and computes positions for every mind-map node.

pub mod config;

mod error;
mod layout;

pub use mosaic_compiler::{
    error::{Diagnostic, ErrorCode, ErrorKind, Label},
    source::{NodePath, SourceDocument, SourceNode},
};
pub use mosaic_core::{element, geometry, identifier, kind, tree};

pub use error::MosaicError;
pub use layout::EngineBuilder;

use log::{debug, info, trace};

use config::AppConfig;
use tree::Container;

/// Compiler for Mosaic documents.
///
/// This provides an API for processing documents through decoding,
/// compilation and layout.
///
/// # Examples
///
/// ```rust
/// use mosaic::{Compiler, config::AppConfig};
///
/// let source = r#"{ "children": [
///     { "kind": "mind-map", "props": { "id": "ideas" }, "children": [
///         { "kind": "mind-map-node", "props": { "id": "root" } }
///     ] }
/// ] }"#;
///
/// let compiler = Compiler::new(AppConfig::default());
/// let container = compiler.compile_str(source).expect("Failed to compile");
/// let json = compiler.render_json(&container, false).expect("Failed to render");
/// assert!(json.contains(r#""id":"root""#));
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    config: AppConfig,
}

impl Compiler {
    /// Create a new compiler with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this compiler was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Decode a JSON source document.
    ///
    /// # Errors
    ///
    /// Returns `MosaicError::Json` when `source` is not a valid document.
    pub fn parse(&self, source: &str) -> Result<SourceDocument, MosaicError> {
        info!("Decoding source document");
        let document: SourceDocument = serde_json::from_str(source)?;
        debug!(nodes = document.node_count(); "Source document decoded");
        Ok(document)
    }

    /// Compile a source document and lay out its mind-map regions.
    ///
    /// # Errors
    ///
    /// Returns `MosaicError::Compile` carrying the first validation or
    /// structural diagnostic. No partial result is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mosaic::{Compiler, SourceDocument, SourceNode};
    ///
    /// let document = SourceDocument::new(vec![
    ///     SourceNode::new("note").with_prop("id", "a").with_prop("x", 1).with_prop("y", 2),
    /// ]);
    /// let container = Compiler::default().compile(&document).expect("Failed to compile");
    /// assert_eq!(container.children().len(), 1);
    /// ```
    pub fn compile(&self, document: &SourceDocument) -> Result<Container, MosaicError> {
        let mut container = mosaic_compiler::compile(document)?;

        info!("Laying out mind-map regions");
        EngineBuilder::new(self.config.layout().clone()).build(&mut container)?;
        trace!(container:?; "Compiled container");

        Ok(container)
    }

    /// Decode and compile a JSON source document.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Compiler::parse`] and [`Compiler::compile`].
    pub fn compile_str(&self, source: &str) -> Result<Container, MosaicError> {
        let document = self.parse(source)?;
        self.compile(&document)
    }

    /// Serialize a compiled container to JSON.
    ///
    /// # Errors
    ///
    /// Returns `MosaicError::Json` if serialization fails.
    pub fn render_json(&self, container: &Container, pretty: bool) -> Result<String, MosaicError> {
        let json = if pretty {
            serde_json::to_string_pretty(container)?
        } else {
            serde_json::to_string(container)?
        };
        debug!(bytes = json.len(), pretty; "Container serialized");
        Ok(json)
    }
}
