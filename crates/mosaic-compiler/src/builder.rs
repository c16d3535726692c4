//! Tree builder: source document to host tree.
//!
//! Walks the source document once, depth-first, and materializes one
//! [`Instance`] per source node. The host tree mirrors the source shape; no
//! identifier is resolved here. While attaching a node the builder applies
//! the defaulting rules that depend on its host parent:
//!
//! - a connector or sequence message without `from` starts at its nearest
//!   enclosing addressable node,
//! - a node hosted by a group is owned by (and clipped to) that group,
//! - a mind-map node nested in another mind-map node without `from` hangs
//!   off that node.
//!
//! Canvas and embed wrappers are transparent: their children attach to
//! whatever hosts the wrapper.

use log::{debug, trace};
use mosaic_core::{
    element::{
        Anchor, Background, BackgroundPreset, DEFAULT_PATTERN_GAP, Edge, Endpoint, ImageSource,
        InvalidChoice, Link, MindMapNodeData, MindMapSettings, Owner, Payload, Placement,
    },
    geometry::Point,
    identifier::{Id, SEPARATOR},
    kind::{Kind, Positioning, UnknownKind},
    tree::{Container, Instance},
};
use serde_json::Value;

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    props::PropReader,
    source::{NodePath, SourceDocument, SourceNode},
};

/// What a node being attached knows about its host ancestors.
#[derive(Debug, Clone, Copy, Default)]
struct AttachContext {
    /// Nearest enclosing addressable node.
    enclosing: Option<Id>,
    /// The group directly hosting the node.
    group: Option<Id>,
    /// The mind-map node directly hosting the node.
    mind_map_parent: Option<Id>,
    /// Set below a mind-map region.
    in_region: bool,
}

impl AttachContext {
    /// Context handed to the children of a node.
    fn for_children_of(self, kind: Kind, id: Option<Id>) -> Self {
        if kind.is_wrapper() {
            return self;
        }
        Self {
            enclosing: if kind.is_addressable() {
                id
            } else {
                self.enclosing
            },
            group: if kind == Kind::Group { id } else { None },
            mind_map_parent: if kind == Kind::MindMapNode { id } else { None },
            in_region: self.in_region || kind == Kind::MindMap,
        }
    }
}

/// Builds the host tree of a source document.
///
/// Fails on the first malformed node with a validation diagnostic labeled
/// with the JSON pointer of that node.
pub fn build(document: &SourceDocument) -> Result<Container> {
    let children = build_children(
        &document.children,
        &NodePath::root(),
        AttachContext::default(),
    )?;
    Ok(Container::new(children))
}

fn build_children(
    nodes: &[SourceNode],
    parent: &NodePath,
    context: AttachContext,
) -> Result<Vec<Instance>> {
    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| build_node(node, &parent.child(index), context))
        .collect()
}

fn build_node(node: &SourceNode, path: &NodePath, context: AttachContext) -> Result<Instance> {
    let kind: Kind = node.kind.parse().map_err(|err: UnknownKind| {
        let supported: Vec<&str> = Kind::ALL.iter().map(Kind::as_str).collect();
        Diagnostic::error(err.to_string())
            .with_code(ErrorCode::E100)
            .with_label(path.to_string(), "declared here")
            .with_help(format!("supported kinds: {}", supported.join(", ")))
    })?;

    if kind == Kind::MindMapNode && !context.in_region {
        return Err(Diagnostic::error("`mind-map-node` outside of a mind-map region")
            .with_code(ErrorCode::E105)
            .with_label(path.to_string(), "declared here")
            .with_help("move the node into a `mind-map` region"));
    }

    let mut reader = PropReader::new(kind, path, node.props.clone());

    let id = if kind.is_addressable() || kind == Kind::Port {
        Some(reader.require_id("id")?)
    } else if kind.is_link() {
        reader.take_id("id")?
    } else {
        None
    };

    let placement = read_placement(&mut reader)?;
    let payload = read_payload(&mut reader, context)?;

    let owner = context.group.map(|group| {
        debug!(kind = kind.as_str(), group = group.to_string(); "Attaching node to group");
        Owner::new(group)
    });

    let children = build_children(
        &node.children,
        path,
        context.for_children_of(kind, id),
    )?;

    trace!(kind = kind.as_str(), location = path.to_string(); "Built instance");

    Ok(Instance::new(kind, payload)
        .with_id(id)
        .with_placement(placement)
        .with_owner(owner)
        .with_props(reader.into_rest())
        .with_children(children))
}

fn read_placement(reader: &mut PropReader<'_>) -> Result<Option<Placement>> {
    let kind = reader.kind();
    let rule = kind.positioning();

    if rule == Positioning::None {
        if kind == Kind::MindMapNode {
            reader.ignore("x", "mind-map node positions are computed by layout");
            reader.ignore("y", "mind-map node positions are computed by layout");
        }
        return Ok(None);
    }

    let absolute = reader.has("x") || reader.has("y");
    let relative = reader.has("anchor") || reader.has("position");
    if !relative {
        reader.ignore("gap", "`gap` only applies to anchored placement");
        reader.ignore("align", "`align` only applies to anchored placement");
    }

    match (absolute, relative) {
        (true, true) => Err(Diagnostic::error(format!(
            "ambiguous positioning on `{kind}`: both `x`/`y` and `anchor` given"
        ))
        .with_code(ErrorCode::E103)
        .with_label(reader.path().to_string(), "declared here")
        .with_help("use either `x`/`y` or `anchor`/`position`, not both")),
        (true, false) => {
            let x = reader.take_number("x")?.ok_or_else(|| reader.missing("x"))?;
            let y = reader.take_number("y")?.ok_or_else(|| reader.missing("y"))?;
            Ok(Some(Placement::Absolute(Point::new(x, y))))
        }
        (false, true) => {
            let target = reader.require_id("anchor")?;
            let position = reader
                .take_choice::<Edge>("position")?
                .ok_or_else(|| reader.missing("position"))?;
            let gap = reader.take_number("gap")?;
            let align = reader.take_choice("align")?;
            Ok(Some(Placement::Relative(
                Anchor::new(target, position)
                    .with_gap(gap)
                    .with_align(align),
            )))
        }
        (false, false) if rule == Positioning::Required => Err(Diagnostic::error(format!(
            "missing positioning on `{kind}`"
        ))
        .with_code(ErrorCode::E104)
        .with_label(reader.path().to_string(), "declared here")
        .with_help("add `x`/`y` or `anchor`/`position`")),
        (false, false) => Ok(None),
    }
}

fn read_payload(reader: &mut PropReader<'_>, context: AttachContext) -> Result<Payload> {
    let payload = match reader.kind() {
        Kind::Image => Payload::Image(ImageSource {
            src: reader.require_str("src")?,
            alt: reader.take_str("alt")?,
        }),
        Kind::Connector | Kind::SequenceMessage => {
            let from = match reader.take_name("from")? {
                Some(text) => parse_endpoint(reader, "from", &text)?,
                None => {
                    let enclosing = context.enclosing.ok_or_else(|| {
                        Diagnostic::error(format!(
                            "`{}` has no `from` and no enclosing node",
                            reader.kind()
                        ))
                        .with_code(ErrorCode::E106)
                        .with_label(reader.path().to_string(), "declared here")
                        .with_help("add `from`, or nest the connector inside its source node")
                    })?;
                    debug!(source = enclosing.to_string(); "Defaulting connector source");
                    Endpoint::inherited(enclosing)
                }
            };
            let to = reader.require_name("to")?;
            let to = parse_endpoint(reader, "to", &to)?;
            Payload::Link(Link { from, to })
        }
        Kind::MindMap => Payload::MindMap(MindMapSettings {
            algorithm: reader.take_choice("layout")?,
            spacing: reader.take_non_negative("spacing")?,
            layer_spacing: reader.take_non_negative("layerSpacing")?,
        }),
        Kind::MindMapNode => {
            let from = match reader.take_id("from")? {
                Some(from) => Some(Endpoint::new(from)),
                None => context.mind_map_parent.map(Endpoint::inherited),
            };
            Payload::MindMapNode(MindMapNodeData {
                from,
                width: reader.take_non_negative("width")?,
                height: reader.take_non_negative("height")?,
            })
        }
        Kind::Canvas => Payload::Canvas(read_background(reader)?),
        Kind::Embed => Payload::Embed(read_scope_name(reader)?),
        Kind::Note
        | Kind::Shape
        | Kind::Text
        | Kind::Sticker
        | Kind::Markdown
        | Kind::Port
        | Kind::Group
        | Kind::SequenceActor => Payload::None,
    };
    Ok(payload)
}

fn parse_endpoint(reader: &PropReader<'_>, key: &str, text: &str) -> Result<Endpoint> {
    Endpoint::parse(text).map_err(|err| {
        Diagnostic::error(err.to_string())
            .with_code(ErrorCode::E108)
            .with_label(reader.path().prop_pointer(key), "malformed endpoint")
    })
}

fn read_background(reader: &mut PropReader<'_>) -> Result<Option<Background>> {
    let Some(value) = reader.take("background") else {
        return Ok(None);
    };
    let pointer = reader.path().prop_pointer("background");

    match value {
        Value::String(name) => name
            .parse::<BackgroundPreset>()
            .map(|preset| Some(Background::Preset(preset)))
            .map_err(|err: InvalidChoice| {
                Diagnostic::error(err.to_string())
                    .with_code(ErrorCode::E102)
                    .with_label(pointer, "invalid value")
            }),
        Value::Object(fields) => {
            let pattern = match fields.get("pattern") {
                Some(Value::String(pattern)) => pattern.clone(),
                None | Some(Value::Null) => {
                    return Err(Diagnostic::error("custom background has no `pattern`")
                        .with_code(ErrorCode::E101)
                        .with_label(pointer, "declared here"));
                }
                // Non-string descriptors are carried as compact JSON.
                Some(other) => other.to_string(),
            };
            let gap = match fields.get("gap") {
                None => DEFAULT_PATTERN_GAP,
                Some(gap) => gap
                    .as_f64()
                    .filter(|gap| gap.is_finite() && *gap >= 0.0)
                    .ok_or_else(|| {
                        Diagnostic::error(format!("invalid background gap `{gap}`"))
                            .with_code(ErrorCode::E102)
                            .with_label(pointer.clone(), "expected a non-negative number")
                    })?,
            };
            Ok(Some(Background::Custom { pattern, gap }))
        }
        other => Err(reader.invalid(
            "background",
            &other,
            "expected a preset name or a `{ pattern, gap }` object",
        )),
    }
}

fn read_scope_name(reader: &mut PropReader<'_>) -> Result<Id> {
    let name = reader.require_str("scope")?;
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(Diagnostic::error(format!("invalid scope name `{name}`"))
            .with_code(ErrorCode::E107)
            .with_label(reader.path().prop_pointer("scope"), "declared here")
            .with_help(format!(
                "scope names must be non-empty and cannot contain `{SEPARATOR}`"
            )));
    }
    Ok(Id::new(&name))
}

#[cfg(test)]
mod tests {
    use mosaic_core::element::{Align, Origin};
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    fn document(value: Value) -> SourceDocument {
        serde_json::from_value(value).unwrap()
    }

    fn build_json(value: Value) -> Result<Container> {
        build(&document(value))
    }

    fn link(instance: &Instance) -> &Link {
        match instance.payload() {
            Payload::Link(link) => link,
            other => panic!("expected a link payload, got {other:?}"),
        }
    }

    #[test]
    fn test_build_mirrors_source_shape() {
        let container = build_json(json!({ "children": [
            { "kind": "note", "props": { "id": "a", "x": 1, "y": 2, "color": "yellow" } },
            { "kind": "group", "props": { "id": "g", "x": 0, "y": 0 }, "children": [
                { "kind": "text", "props": { "id": "t", "x": 5, "y": 5 } }
            ] }
        ] }))
        .unwrap();

        assert_eq!(container.children().len(), 2);
        let note = &container.children()[0];
        assert_eq!(note.kind(), Kind::Note);
        assert_eq!(
            note.placement(),
            Some(&Placement::Absolute(Point::new(1.0, 2.0)))
        );
        assert_eq!(note.props().get("color"), Some(&json!("yellow")));
        assert!(!note.props().contains_key("x"));
    }

    #[test]
    fn test_group_children_are_owned() {
        let container = build_json(json!({ "children": [
            { "kind": "group", "props": { "id": "g", "x": 0, "y": 0 }, "children": [
                { "kind": "text", "props": { "id": "t", "x": 5, "y": 5 } },
                { "kind": "canvas", "children": [
                    { "kind": "note", "props": { "id": "n", "x": 0, "y": 0 } }
                ] }
            ] }
        ] }))
        .unwrap();

        let group = &container.children()[0];
        assert!(group.owner().is_none());
        assert_eq!(group.children()[0].owner().unwrap().parent(), "g");
        // Wrappers are transparent for ownership.
        let wrapped = &group.children()[1].children()[0];
        assert_eq!(wrapped.owner().unwrap().parent(), "g");
    }

    #[test]
    fn test_connector_inherits_enclosing_node() {
        let container = build_json(json!({ "children": [
            { "kind": "shape", "props": { "id": "s", "x": 0, "y": 0 }, "children": [
                { "kind": "connector", "props": { "to": "t:in" } }
            ] }
        ] }))
        .unwrap();

        let connector = &container.children()[0].children()[0];
        let link = link(connector);
        assert_eq!(link.from.node(), "s");
        assert_eq!(link.from.origin(), Origin::Inherited);
        assert_eq!(link.to.to_string(), "t:in");
    }

    #[test]
    fn test_explicit_connector_source_wins() {
        let container = build_json(json!({ "children": [
            { "kind": "shape", "props": { "id": "s", "x": 0, "y": 0 }, "children": [
                { "kind": "sequence-message", "props": { "from": "a", "to": "b" } }
            ] }
        ] }))
        .unwrap();

        let link = link(&container.children()[0].children()[0]);
        assert_eq!(link.from.node(), "a");
        assert_eq!(link.from.origin(), Origin::Explicit);
    }

    #[test]
    fn test_top_level_connector_without_source_fails() {
        let err = build_json(json!({ "children": [
            { "kind": "connector", "props": { "to": "b" } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E106));
        assert_eq!(err.label().unwrap().pointer(), "/children/0");
    }

    #[test]
    fn test_malformed_endpoint() {
        let err = build_json(json!({ "children": [
            { "kind": "connector", "props": { "from": "a:", "to": "b" } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E108));
        assert_eq!(err.label().unwrap().pointer(), "/children/0/props/from");
    }

    #[test]
    fn test_unknown_kind() {
        let err = build_json(json!({ "children": [
            { "kind": "note", "props": { "id": "a", "x": 0, "y": 0 } },
            { "kind": "hexagon" }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.label().unwrap().pointer(), "/children/1");
        assert!(err.help().unwrap().contains("mind-map-node"));
    }

    #[test]
    fn test_missing_id_points_at_nested_node() {
        let err = build_json(json!({ "children": [
            { "kind": "group", "props": { "id": "g", "x": 0, "y": 0 }, "children": [
                { "kind": "note", "props": { "id": "a", "x": 0, "y": 0 } },
                { "kind": "note", "props": { "x": 0, "y": 0 } }
            ] }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert_eq!(err.label().unwrap().pointer(), "/children/0/children/1");
    }

    #[test]
    fn test_ambiguous_positioning() {
        let err = build_json(json!({ "children": [
            { "kind": "note", "props": { "id": "a", "x": 0, "y": 0, "anchor": "b", "position": "top" } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E103));
    }

    #[test]
    fn test_missing_positioning() {
        let err = build_json(json!({ "children": [
            { "kind": "sticker", "props": { "id": "a" } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E104));

        // Optional for actors.
        assert!(
            build_json(json!({ "children": [
                { "kind": "sequence-actor", "props": { "id": "alice" } }
            ] }))
            .is_ok()
        );
    }

    #[test]
    fn test_relative_placement() {
        let container = build_json(json!({ "children": [
            { "kind": "text", "props": { "id": "t", "anchor": "a", "position": "right", "gap": 12, "align": "start" } }
        ] }))
        .unwrap();

        let anchor = container.children()[0].placement().unwrap().anchor().unwrap();
        assert_eq!(anchor.target(), "a");
        assert_eq!(anchor.position(), Edge::Right);
        assert_eq!(anchor.gap(), Some(12.0));
        assert_eq!(anchor.align(), Some(Align::Start));
    }

    #[test]
    fn test_gap_and_align_dropped_without_anchor() {
        let container = build_json(json!({ "children": [
            { "kind": "note", "props": { "id": "n", "x": 1, "y": 2, "gap": 5, "align": "start" } }
        ] }))
        .unwrap();

        let note = &container.children()[0];
        assert_eq!(
            note.placement(),
            Some(&Placement::Absolute(Point::new(1.0, 2.0)))
        );
        assert!(!note.props().contains_key("gap"));
        assert!(!note.props().contains_key("align"));
    }

    #[test]
    fn test_anchor_without_position() {
        let err = build_json(json!({ "children": [
            { "kind": "text", "props": { "id": "t", "anchor": "a" } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert!(err.message().contains("position"));
    }

    #[test]
    fn test_image_requires_src() {
        let err = build_json(json!({ "children": [
            { "kind": "image", "props": { "id": "i", "x": 0, "y": 0 } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert!(err.message().contains("src"));
    }

    #[test]
    fn test_mind_map_node_outside_region() {
        let err = build_json(json!({ "children": [
            { "kind": "mind-map-node", "props": { "id": "a" } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E105));
    }

    #[test]
    fn test_mind_map_nodes_inherit_nested_parent() {
        let container = build_json(json!({ "children": [
            { "kind": "mind-map", "props": { "id": "m", "layout": "radial", "spacing": 40 }, "children": [
                { "kind": "mind-map-node", "props": { "id": "root", "x": 10, "y": 10 }, "children": [
                    { "kind": "mind-map-node", "props": { "id": "child" } }
                ] },
                { "kind": "mind-map-node", "props": { "id": "other", "from": "root" } }
            ] }
        ] }))
        .unwrap();

        let region = &container.children()[0];
        match region.payload() {
            Payload::MindMap(settings) => {
                assert_eq!(settings.spacing, Some(40.0));
                assert!(settings.layer_spacing.is_none());
            }
            other => panic!("unexpected payload {other:?}"),
        }

        let root = &region.children()[0];
        assert!(root.placement().is_none());
        assert!(!root.props().contains_key("x"));

        let from_of = |instance: &Instance| match instance.payload() {
            Payload::MindMapNode(data) => data.from,
            other => panic!("unexpected payload {other:?}"),
        };
        assert!(from_of(root).is_none());
        assert_eq!(from_of(&root.children()[0]).unwrap().node(), "root");
        assert!(from_of(&root.children()[0]).unwrap().is_inherited());
        assert_eq!(from_of(&region.children()[1]).unwrap().node(), "root");
    }

    #[test]
    fn test_invalid_layout_algorithm() {
        let err = build_json(json!({ "children": [
            { "kind": "mind-map", "props": { "id": "m", "layout": "spiral" } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E102));
        assert_eq!(err.label().unwrap().pointer(), "/children/0/props/layout");
    }

    #[test]
    fn test_canvas_backgrounds() {
        let container = build_json(json!({ "children": [
            { "kind": "canvas", "props": { "background": "grid" } },
            { "kind": "canvas", "props": { "background": { "pattern": "hatch" } } },
            { "kind": "canvas", "props": { "background": { "pattern": { "shape": "star" }, "gap": 10 } } }
        ] }))
        .unwrap();

        let backgrounds: Vec<Option<Background>> = container
            .children()
            .iter()
            .map(|canvas| match canvas.payload() {
                Payload::Canvas(background) => background.clone(),
                other => panic!("unexpected payload {other:?}"),
            })
            .collect();
        assert_eq!(
            backgrounds,
            [
                Some(Background::Preset(BackgroundPreset::Grid)),
                Some(Background::Custom {
                    pattern: "hatch".to_string(),
                    gap: DEFAULT_PATTERN_GAP
                }),
                Some(Background::Custom {
                    pattern: r#"{"shape":"star"}"#.to_string(),
                    gap: 10.0
                }),
            ]
        );
    }

    #[test]
    fn test_invalid_background() {
        let err = build_json(json!({ "children": [
            { "kind": "canvas", "props": { "background": "stripes" } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E102));

        let err = build_json(json!({ "children": [
            { "kind": "canvas", "props": { "background": { "gap": 4 } } }
        ] }))
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_embed_scope_name_validation() {
        let ok = build_json(json!({ "children": [
            { "kind": "embed", "props": { "scope": "auth" } }
        ] }))
        .unwrap();
        assert_eq!(ok.children()[0].payload(), &Payload::Embed(Id::new("auth")));

        for bad in ["", "a.b"] {
            let err = build_json(json!({ "children": [
                { "kind": "embed", "props": { "scope": bad } }
            ] }))
            .unwrap_err();
            assert_eq!(err.code(), Some(ErrorCode::E107));
        }
    }
}
