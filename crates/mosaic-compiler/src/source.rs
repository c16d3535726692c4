//! The source document model.
//!
//! A source document is the declarative JSON tree the compiler consumes.
//! Every node carries its kind name, an ordered map of props and its
//! ordered children:
//!
//! ```json
//! { "children": [ { "kind": "note", "props": { "id": "a", "x": 0, "y": 0 } } ] }
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root of a source document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub children: Vec<SourceNode>,
}

impl SourceDocument {
    pub fn new(children: Vec<SourceNode>) -> Self {
        Self { children }
    }

    /// Total number of nodes in the document, at every depth.
    pub fn node_count(&self) -> usize {
        self.children.iter().map(SourceNode::node_count).sum()
    }
}

/// One declarative node of the source document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceNode {
    pub kind: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub props: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    /// Creates a childless node without props.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            props: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Adds a prop, replacing any previous value under the same key.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    fn node_count(&self) -> usize {
        1 + self.children.iter().map(SourceNode::node_count).sum::<usize>()
    }
}

/// Position of a node in the source document, as child indices from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// JSON pointer to a prop of this node.
    pub fn prop_pointer(&self, key: &str) -> String {
        // RFC 6901 escaping: `~` first, then `/`.
        let key = key.replace('~', "~0").replace('/', "~1");
        format!("{self}/props/{key}")
    }
}

impl fmt::Display for NodePath {
    /// Formats the path as a JSON pointer, e.g. `/children/0/children/2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/children/{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let doc: SourceDocument = serde_json::from_value(json!({
            "children": [
                { "kind": "note", "props": { "id": "a", "x": 0, "y": 0 } },
                { "kind": "group", "props": { "id": "g" }, "children": [ { "kind": "text" } ] }
            ]
        }))
        .unwrap();

        assert_eq!(doc.children.len(), 2);
        assert!(doc.children[0].children.is_empty());
        assert!(doc.children[1].children[0].props.is_empty());
        assert_eq!(doc.node_count(), 3);
    }

    #[test]
    fn test_props_keep_source_order() {
        let node: SourceNode =
            serde_json::from_str(r#"{ "kind": "note", "props": { "z": 1, "a": 2, "m": 3 } }"#)
                .unwrap();
        let keys: Vec<&str> = node.props.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_missing_children_is_empty_document() {
        let doc: SourceDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, SourceDocument::default());
    }

    #[test]
    fn test_node_path_pointer() {
        let path = NodePath::root().child(0).child(2);
        assert_eq!(path.to_string(), "/children/0/children/2");
        assert_eq!(path.prop_pointer("x"), "/children/0/children/2/props/x");
        assert_eq!(NodePath::root().to_string(), "/");
        assert_eq!(
            NodePath::root().child(1).prop_pointer("a/b"),
            "/children/1/props/a~1b"
        );
    }
}
