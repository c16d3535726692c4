//! The closed vocabulary of host tree node kinds.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error returned when a kind name is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node kind `{0}`")]
pub struct UnknownKind(pub String);

/// Kind of a node in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Note,
    Shape,
    Text,
    Image,
    Sticker,
    Markdown,
    Connector,
    Port,
    /// A grouped region; children are owned by and clipped to it.
    Group,
    /// A hierarchical mind-map region subject to automatic layout.
    MindMap,
    MindMapNode,
    SequenceActor,
    SequenceMessage,
    /// The document-level canvas wrapper carrying background configuration.
    Canvas,
    /// An embed-scope wrapper. Removed by scope resolution.
    Embed,
}

/// How a kind is positioned on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    /// Exactly one of absolute or relative positioning must be present.
    Required,
    /// At most one positioning mode may be present.
    Optional,
    /// The kind carries no position of its own, or the layout engine owns it.
    None,
}

impl Kind {
    /// All kinds in the vocabulary.
    pub const ALL: [Kind; 15] = [
        Kind::Note,
        Kind::Shape,
        Kind::Text,
        Kind::Image,
        Kind::Sticker,
        Kind::Markdown,
        Kind::Connector,
        Kind::Port,
        Kind::Group,
        Kind::MindMap,
        Kind::MindMapNode,
        Kind::SequenceActor,
        Kind::SequenceMessage,
        Kind::Canvas,
        Kind::Embed,
    ];

    /// Returns the source-document name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Note => "note",
            Kind::Shape => "shape",
            Kind::Text => "text",
            Kind::Image => "image",
            Kind::Sticker => "sticker",
            Kind::Markdown => "markdown",
            Kind::Connector => "connector",
            Kind::Port => "port",
            Kind::Group => "group",
            Kind::MindMap => "mind-map",
            Kind::MindMapNode => "mind-map-node",
            Kind::SequenceActor => "sequence-actor",
            Kind::SequenceMessage => "sequence-message",
            Kind::Canvas => "canvas",
            Kind::Embed => "embed",
        }
    }

    /// Returns `true` for kinds that must carry a scope-qualified `id` and can
    /// be targeted by connectors and anchors.
    pub fn is_addressable(&self) -> bool {
        matches!(
            self,
            Kind::Note
                | Kind::Shape
                | Kind::Text
                | Kind::Image
                | Kind::Sticker
                | Kind::Markdown
                | Kind::Group
                | Kind::MindMap
                | Kind::MindMapNode
                | Kind::SequenceActor
        )
    }

    /// Returns `true` for kinds describing a directed edge between two endpoints.
    pub fn is_link(&self) -> bool {
        matches!(self, Kind::Connector | Kind::SequenceMessage)
    }

    /// Returns `true` for wrappers that are transparent to attach context.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, Kind::Canvas | Kind::Embed)
    }

    /// Returns the positioning rule for this kind.
    pub fn positioning(&self) -> Positioning {
        match self {
            Kind::Note
            | Kind::Shape
            | Kind::Text
            | Kind::Image
            | Kind::Sticker
            | Kind::Markdown
            | Kind::Group => Positioning::Required,
            Kind::MindMap | Kind::SequenceActor | Kind::Port => Positioning::Optional,
            Kind::MindMapNode
            | Kind::Connector
            | Kind::SequenceMessage
            | Kind::Canvas
            | Kind::Embed => Positioning::None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
