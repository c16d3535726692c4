//! The host tree: [`Container`] and [`Instance`].
//!
//! The tree builder materializes one [`Instance`] per drawing primitive of the
//! source document. Later stages mutate instances in place (identifier
//! qualification, anchor resolution, layout coordinates); once the pipeline
//! finishes, the container is handed to consumers read-only.
//!
//! # Output format
//!
//! Both types serialize to the document format consumed by renderers:
//!
//! ```json
//! { "children": [ { "kind": "note", "props": { "id": "a", "x": 0.0, "y": 0.0 } } ],
//!   "meta": { "background": "dots" } }
//! ```

use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeStruct};
use serde_json::{Map, Value};

use crate::{
    element::{Meta, Owner, Payload, Placement},
    identifier::Id,
    kind::Kind,
};

/// Open map of pass-through props, in source order.
pub type Props = IndexMap<String, Value>;

/// A node of the host tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    kind: Kind,
    id: Option<Id>,
    placement: Option<Placement>,
    owner: Option<Owner>,
    payload: Payload,
    props: Props,
    children: Vec<Instance>,
}

impl Instance {
    /// Creates a childless instance of the given kind.
    pub fn new(kind: Kind, payload: Payload) -> Self {
        Self {
            kind,
            id: None,
            placement: None,
            owner: None,
            payload,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: Option<Id>) -> Self {
        self.id = id;
        self
    }

    pub fn with_placement(mut self, placement: Option<Placement>) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_owner(mut self, owner: Option<Owner>) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_children(mut self, children: Vec<Instance>) -> Self {
        self.children = children;
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn set_id(&mut self, id: Id) {
        self.id = Some(id);
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn placement_mut(&mut self) -> Option<&mut Placement> {
        self.placement.as_mut()
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }

    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    pub fn owner_mut(&mut self) -> Option<&mut Owner> {
        self.owner.as_mut()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    /// Pass-through props no compiler stage inspects.
    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[Instance] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Instance> {
        &mut self.children
    }

    /// Takes the children out of this instance, leaving it childless.
    pub fn take_children(&mut self) -> Vec<Instance> {
        std::mem::take(&mut self.children)
    }

    /// Returns a depth-first, pre-order iterator over this instance and all its descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &Instance> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Calls `f` on this instance and then on every descendant, depth-first.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Instance)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// Builds the flat `props` object of the output format.
    ///
    /// Typed fields come first in a fixed order, followed by pass-through
    /// props in source order.
    pub fn output_props(&self) -> Map<String, Value> {
        let mut out = Map::new();

        if let Some(id) = self.id {
            out.insert("id".into(), Value::from(id.to_string()));
        }

        match &self.placement {
            Some(Placement::Absolute(point)) => {
                out.insert("x".into(), Value::from(point.x()));
                out.insert("y".into(), Value::from(point.y()));
            }
            Some(Placement::Relative(anchor)) => {
                out.insert("anchor".into(), Value::from(anchor.target().to_string()));
                out.insert("position".into(), Value::from(anchor.position().as_str()));
                if let Some(gap) = anchor.gap() {
                    out.insert("gap".into(), Value::from(gap));
                }
                if let Some(align) = anchor.align() {
                    out.insert("align".into(), Value::from(align.as_str()));
                }
            }
            None => {}
        }

        if let Some(owner) = &self.owner {
            out.insert("parentId".into(), Value::from(owner.parent().to_string()));
            out.insert("extent".into(), Value::from(owner.extent()));
        }

        match &self.payload {
            Payload::None => {}
            Payload::Image(image) => {
                out.insert("src".into(), Value::from(image.src.clone()));
                if let Some(alt) = &image.alt {
                    out.insert("alt".into(), Value::from(alt.clone()));
                }
            }
            Payload::Link(link) => {
                out.insert("from".into(), Value::from(link.from.to_string()));
                out.insert("to".into(), Value::from(link.to.to_string()));
            }
            Payload::MindMap(settings) => {
                if let Some(algorithm) = settings.algorithm {
                    out.insert("layout".into(), Value::from(algorithm.as_str()));
                }
                if let Some(spacing) = settings.spacing {
                    out.insert("spacing".into(), Value::from(spacing));
                }
                if let Some(layer_spacing) = settings.layer_spacing {
                    out.insert("layerSpacing".into(), Value::from(layer_spacing));
                }
            }
            Payload::MindMapNode(node) => {
                if let Some(from) = node.from {
                    out.insert("from".into(), Value::from(from.to_string()));
                }
                if let Some(width) = node.width {
                    out.insert("width".into(), Value::from(width));
                }
                if let Some(height) = node.height {
                    out.insert("height".into(), Value::from(height));
                }
            }
            Payload::Canvas(background) => {
                if let Some(background) = background {
                    // Serializing a Background into a Value cannot fail.
                    if let Ok(value) = serde_json::to_value(background) {
                        out.insert("background".into(), value);
                    }
                }
            }
            Payload::Embed(scope) => {
                out.insert("scope".into(), Value::from(scope.to_string()));
            }
        }

        for (key, value) in &self.props {
            out.entry(key.clone()).or_insert_with(|| value.clone());
        }

        out
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.children.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("Instance", fields)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("props", &self.output_props())?;
        if !self.children.is_empty() {
            state.serialize_field("children", &self.children)?;
        }
        state.end()
    }
}

/// The compilation root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Container {
    children: Vec<Instance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Meta>,
}

impl Container {
    pub fn new(children: Vec<Instance>) -> Self {
        Self {
            children,
            meta: None,
        }
    }

    pub fn children(&self) -> &[Instance] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Instance> {
        &mut self.children
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    pub fn set_meta(&mut self, meta: Meta) {
        self.meta = Some(meta);
    }

    /// Calls `f` on every instance of the tree in document order.
    pub fn walk_mut(&mut self, mut f: impl FnMut(&mut Instance)) {
        for child in &mut self.children {
            child.walk_mut(&mut f);
        }
    }

    /// Iterates over every instance of the tree in document order.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.children.iter().flat_map(Instance::descendants)
    }
}
