//! Typed payloads carried by host tree instances.
//!
//! Every [`Instance`](crate::tree::Instance) stores the fields that the
//! compiler stages inspect (positioning, endpoints, layout settings) in the
//! types below. Styling props the stages never look at stay in an open
//! extension map on the instance.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeStruct};
use thiserror::Error;

use crate::{geometry::Point, identifier::Id};

/// Error returned when a prop value is outside its closed set of choices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {what} `{value}`, expected one of: {expected}")]
pub struct InvalidChoice {
    what: &'static str,
    value: String,
    expected: String,
}

impl InvalidChoice {
    fn new(what: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            what,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

/// Declares a closed string enumeration with `as_str`, `FromStr`, `Display`,
/// `Serialize` and `Deserialize`, all using the source-document spelling.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])* $name:ident, $what:literal {
            $($(#[$variant_meta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Returns the source-document spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(InvalidChoice::new(
                        $what,
                        s,
                        &[$($text),+],
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            }
        }
    };
}

choice_enum!(
    /// Edge of the anchor target a relatively positioned node is placed against.
    Edge, "position" {
        Top => "top",
        Bottom => "bottom",
        Left => "left",
        Right => "right",
    }
);

choice_enum!(
    /// Alignment along the anchor edge.
    Align, "align" {
        Start => "start",
        Center => "center",
        End => "end",
    }
);

choice_enum!(
    /// Named canvas background presets.
    BackgroundPreset, "background preset" {
        None => "none",
        Dots => "dots",
        Lines => "lines",
        Grid => "grid",
    }
);

choice_enum!(
    /// Automatic layout algorithm of a mind-map region.
    #[derive(Default)]
    LayoutAlgorithm, "layout" {
        /// Depth-first layered tree growing to the right.
        #[default]
        Tree => "tree",
        /// Root in the middle, children split between a left and a right tree.
        Bidirectional => "bidirectional",
        /// Children on concentric circles around their parent.
        Radial => "radial",
    }
);

/// Relative placement against another node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    target: Id,
    position: Edge,
    gap: Option<f64>,
    align: Option<Align>,
}

impl Anchor {
    pub fn new(target: Id, position: Edge) -> Self {
        Self {
            target,
            position,
            gap: None,
            align: None,
        }
    }

    pub fn with_gap(mut self, gap: Option<f64>) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_align(mut self, align: Option<Align>) -> Self {
        self.align = align;
        self
    }

    /// The node this one is placed against.
    pub fn target(&self) -> Id {
        self.target
    }

    pub fn set_target(&mut self, target: Id) {
        self.target = target;
    }

    pub fn position(&self) -> Edge {
        self.position
    }

    pub fn gap(&self) -> Option<f64> {
        self.gap
    }

    pub fn align(&self) -> Option<Align> {
        self.align
    }
}

/// Placement of a positioned instance: exactly one of the two modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Absolute `{x, y}` coordinates.
    Absolute(Point),
    /// Relative `{anchor, position, gap?, align?}` placement.
    Relative(Anchor),
}

impl Placement {
    /// Returns the anchor of a relative placement.
    pub fn anchor(&self) -> Option<&Anchor> {
        match self {
            Placement::Relative(anchor) => Some(anchor),
            Placement::Absolute(_) => None,
        }
    }
}

/// Whether a reference was written in the source or filled in by the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Explicit,
    /// Defaulted from the nearest enclosing node at attach time.
    Inherited,
}

/// Error returned for malformed `"nodeId"` / `"nodeId:portId"` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid endpoint `{0}`, expected `node` or `node:port`")]
pub struct InvalidEndpoint(pub String);

/// One end of a connector: a node identifier with an optional port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    node: Id,
    port: Option<Id>,
    origin: Origin,
}

impl Endpoint {
    /// An explicit endpoint referencing a whole node.
    pub fn new(node: Id) -> Self {
        Self {
            node,
            port: None,
            origin: Origin::Explicit,
        }
    }

    /// An endpoint defaulted from the enclosing node.
    pub fn inherited(node: Id) -> Self {
        Self {
            node,
            port: None,
            origin: Origin::Inherited,
        }
    }

    /// Parses `"nodeId"` or `"nodeId:portId"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_core::element::Endpoint;
    ///
    /// let endpoint = Endpoint::parse("db:in").unwrap();
    /// assert_eq!(endpoint.node(), "db");
    /// assert_eq!(endpoint.port().unwrap(), "in");
    /// assert_eq!(endpoint.to_string(), "db:in");
    /// ```
    pub fn parse(value: &str) -> Result<Self, InvalidEndpoint> {
        let (node, port) = match value.split_once(':') {
            Some((node, port)) => (node, Some(port)),
            None => (value, None),
        };
        if node.is_empty() || port.is_some_and(|port| port.is_empty() || port.contains(':')) {
            return Err(InvalidEndpoint(value.to_string()));
        }
        Ok(Self {
            node: Id::new(node),
            port: port.map(Id::new),
            origin: Origin::Explicit,
        })
    }

    pub fn node(&self) -> Id {
        self.node
    }

    pub fn port(&self) -> Option<Id> {
        self.port
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_inherited(&self) -> bool {
        self.origin == Origin::Inherited
    }

    /// Replaces the node identifier, keeping port and origin.
    pub fn set_node(&mut self, node: Id) {
        self.node = node;
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.node, port),
            None => write!(f, "{}", self.node),
        }
    }
}

/// A directed edge between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Endpoint,
    pub to: Endpoint,
}

/// Ownership marker for a node attached under a grouped region.
///
/// Consumers clip the node to its owner and move it along with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    parent: Id,
}

impl Owner {
    pub fn new(parent: Id) -> Self {
        Self { parent }
    }

    pub fn parent(&self) -> Id {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Id) {
        self.parent = parent;
    }

    /// The extent marker written next to `parentId`.
    pub fn extent(&self) -> &'static str {
        "owned"
    }
}

/// Image payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    pub src: String,
    pub alt: Option<String>,
}

/// Layout settings declared on a mind-map region.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MindMapSettings {
    pub algorithm: Option<LayoutAlgorithm>,
    pub spacing: Option<f64>,
    pub layer_spacing: Option<f64>,
}

/// Hierarchy and sizing data of a mind-map node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MindMapNodeData {
    /// The predecessor in the region hierarchy.
    pub from: Option<Endpoint>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Default gap between tiles of a custom background pattern.
pub const DEFAULT_PATTERN_GAP: f64 = 24.0;

/// Document background configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Preset(BackgroundPreset),
    /// A computed pattern descriptor.
    Custom { pattern: String, gap: f64 },
}

impl Serialize for Background {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Background::Preset(preset) => preset.serialize(serializer),
            Background::Custom { pattern, gap } => {
                let mut state = serializer.serialize_struct("Background", 3)?;
                state.serialize_field("kind", "custom")?;
                state.serialize_field("pattern", pattern)?;
                state.serialize_field("gap", gap)?;
                state.end()
            }
        }
    }
}

/// Document-level metadata lifted out of the canvas wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
}

/// Kind-specific payload of an instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    None,
    Image(ImageSource),
    /// Connector and sequence message endpoints.
    Link(Link),
    MindMap(MindMapSettings),
    MindMapNode(MindMapNodeData),
    /// Canvas wrapper background, if declared.
    Canvas(Option<Background>),
    /// Embed scope name.
    Embed(Id),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parsing() {
        assert_eq!("left".parse::<Edge>(), Ok(Edge::Left));
        assert_eq!("end".parse::<Align>(), Ok(Align::End));
        assert_eq!("dots".parse::<BackgroundPreset>(), Ok(BackgroundPreset::Dots));
        assert_eq!(
            "radial".parse::<LayoutAlgorithm>(),
            Ok(LayoutAlgorithm::Radial)
        );
    }

    #[test]
    fn test_choice_error_lists_expected_values() {
        let err = "middle".parse::<Edge>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid position `middle`, expected one of: top, bottom, left, right"
        );
    }

    #[test]
    fn test_choice_serde_uses_source_spelling() {
        assert_eq!(LayoutAlgorithm::default(), LayoutAlgorithm::Tree);
        assert_eq!(
            serde_json::to_value(LayoutAlgorithm::Bidirectional).unwrap(),
            serde_json::json!("bidirectional")
        );
        assert_eq!(
            serde_json::from_str::<LayoutAlgorithm>(r#""radial""#).unwrap(),
            LayoutAlgorithm::Radial
        );

        let err = serde_json::from_str::<LayoutAlgorithm>(r#""spiral""#).unwrap_err();
        assert!(err.to_string().contains("expected one of: tree, bidirectional, radial"));
    }

    #[test]
    fn test_endpoint_parse() {
        let plain = Endpoint::parse("api").unwrap();
        assert_eq!(plain.node(), "api");
        assert!(plain.port().is_none());
        assert!(!plain.is_inherited());

        let ported = Endpoint::parse("auth.db:write").unwrap();
        assert_eq!(ported.node(), "auth.db");
        assert_eq!(ported.port().unwrap(), "write");
    }

    #[test]
    fn test_endpoint_parse_rejects_malformed() {
        assert!(Endpoint::parse("").is_err());
        assert!(Endpoint::parse(":port").is_err());
        assert!(Endpoint::parse("node:").is_err());
        assert!(Endpoint::parse("a:b:c").is_err());
    }

    #[test]
    fn test_background_serialization() {
        let preset = serde_json::to_value(Background::Preset(BackgroundPreset::Grid)).unwrap();
        assert_eq!(preset, serde_json::json!("grid"));

        let custom = serde_json::to_value(Background::Custom {
            pattern: "hatch".to_string(),
            gap: DEFAULT_PATTERN_GAP,
        })
        .unwrap();
        assert_eq!(
            custom,
            serde_json::json!({ "kind": "custom", "pattern": "hatch", "gap": 24.0 })
        );
    }
}
