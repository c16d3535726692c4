//! Mind-map region collection and structural validation.
//!
//! A region is a `mind-map` instance together with every `mind-map-node`
//! below it. Nested regions are regions of their own; their nodes do not
//! belong to the enclosing region.

use std::collections::{HashMap, HashSet};

use mosaic_compiler::error::{Diagnostic, ErrorCode};
use mosaic_core::{
    element::{LayoutAlgorithm, Payload, Placement},
    geometry::{Point, Size},
    identifier::Id,
    kind::Kind,
    tree::{Container, Instance},
};

use crate::config::LayoutConfig;

/// A node of a region, as the layout engine sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct RegionNode {
    pub id: Id,
    /// The predecessor, when it is declared.
    pub from: Option<Id>,
    pub size: Size,
}

/// One mind-map region with its settings resolved against the configuration.
#[derive(Debug, Clone)]
pub(super) struct Region {
    pub id: Id,
    pub algorithm: LayoutAlgorithm,
    pub spacing: f64,
    pub layer_spacing: f64,
    pub placement: Option<Placement>,
    pub nodes: Vec<RegionNode>,
}

impl Region {
    fn new(instance: &Instance, config: &LayoutConfig) -> Result<Self, Diagnostic> {
        let id = instance
            .id()
            .ok_or_else(|| Diagnostic::internal("mind-map region without an id"))?;
        let settings = match instance.payload() {
            Payload::MindMap(settings) => *settings,
            _ => return Err(Diagnostic::internal(format!("mind-map `{id}` without settings"))),
        };

        Ok(Self {
            id,
            algorithm: settings.algorithm.unwrap_or(config.algorithm()),
            spacing: settings.spacing.unwrap_or(config.spacing()),
            layer_spacing: settings.layer_spacing.unwrap_or(config.layer_spacing()),
            placement: instance.placement().copied(),
            nodes: Vec::new(),
        })
    }

    fn push_node(&mut self, instance: &Instance, config: &LayoutConfig) -> Result<(), Diagnostic> {
        let id = instance
            .id()
            .ok_or_else(|| Diagnostic::internal("mind-map node without an id"))?;
        let Payload::MindMapNode(data) = instance.payload() else {
            return Err(Diagnostic::internal(format!("mind-map node `{id}` without data")));
        };

        let default_size = config.node_size();
        self.nodes.push(RegionNode {
            id,
            from: data.from.map(|from| from.node()),
            size: Size::new(
                data.width.unwrap_or(default_size.width()),
                data.height.unwrap_or(default_size.height()),
            ),
        });
        Ok(())
    }

    /// Checks the region can be laid out as a forest.
    ///
    /// # Errors
    ///
    /// Returns a structural diagnostic when two nodes share an id or when the
    /// `from` links form a cycle.
    pub fn validate(&self) -> Result<(), Diagnostic> {
        self.check_duplicates()?;
        self.check_acyclic()
    }

    fn check_duplicates(&self) -> Result<(), Diagnostic> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(Diagnostic::error(format!(
                    "mind-map `{}` declares node `{}` more than once",
                    self.id, node.id
                ))
                .with_code(ErrorCode::E301)
                .with_help("give every node of a region a unique `id`"));
            }
        }
        Ok(())
    }

    fn check_acyclic(&self) -> Result<(), Diagnostic> {
        let ids: HashSet<Id> = self.nodes.iter().map(|node| node.id).collect();
        let predecessors: HashMap<Id, Id> = self
            .nodes
            .iter()
            .filter_map(|node| {
                node.from
                    .filter(|from| ids.contains(from))
                    .map(|from| (node.id, from))
            })
            .collect();

        for node in &self.nodes {
            let mut visited = HashSet::new();
            let mut current = node.id;
            loop {
                if !visited.insert(current) {
                    return Err(Diagnostic::error(format!(
                        "mind-map `{}` contains a cycle through `{current}`",
                        self.id
                    ))
                    .with_code(ErrorCode::E300)
                    .with_help("acyclic hierarchy required; remove one of the `from` links"));
                }
                match predecessors.get(&current) {
                    Some(&predecessor) => current = predecessor,
                    None => break,
                }
            }
        }
        Ok(())
    }
}

/// Collects every mind-map region of the container, in document order.
pub(super) fn collect_regions(
    container: &Container,
    config: &LayoutConfig,
) -> Result<Vec<Region>, Diagnostic> {
    let mut regions = Vec::new();
    collect(container.children(), None, config, &mut regions)?;
    Ok(regions)
}

fn collect(
    instances: &[Instance],
    current: Option<usize>,
    config: &LayoutConfig,
    regions: &mut Vec<Region>,
) -> Result<(), Diagnostic> {
    for instance in instances {
        let mut region = current;
        match instance.kind() {
            Kind::MindMap => {
                regions.push(Region::new(instance, config)?);
                region = Some(regions.len() - 1);
            }
            Kind::MindMapNode => {
                if let Some(index) = current {
                    regions[index].push_node(instance, config)?;
                }
            }
            _ => {}
        }
        collect(instance.children(), region, config, regions)?;
    }
    Ok(())
}

/// Writes final positions onto the mind-map nodes.
///
/// `positions` is indexed like the output of [`collect_regions`].
pub(super) fn write_back(container: &mut Container, positions: &[HashMap<Id, Point>]) {
    let mut next_region = 0;
    place(container.children_mut(), None, positions, &mut next_region);
}

fn place(
    instances: &mut [Instance],
    current: Option<usize>,
    positions: &[HashMap<Id, Point>],
    next_region: &mut usize,
) {
    for instance in instances {
        let mut region = current;
        match instance.kind() {
            Kind::MindMap => {
                region = Some(*next_region);
                *next_region += 1;
            }
            Kind::MindMapNode => {
                let position = current
                    .zip(instance.id())
                    .and_then(|(index, id)| positions.get(index)?.get(&id).copied());
                if let Some(position) = position {
                    instance.set_placement(Placement::Absolute(position));
                }
            }
            _ => {}
        }
        place(instance.children_mut(), region, positions, next_region);
    }
}

#[cfg(test)]
mod tests {
    use mosaic_compiler::{error::ErrorKind, source::SourceDocument};
    use serde_json::json;

    use super::*;

    fn regions_of(value: serde_json::Value) -> Vec<Region> {
        let document: SourceDocument = serde_json::from_value(value).unwrap();
        let container = mosaic_compiler::compile(&document).unwrap();
        collect_regions(&container, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_collect_regions_in_document_order() {
        let regions = regions_of(json!({ "children": [
            { "kind": "mind-map", "props": { "id": "a", "layout": "radial" }, "children": [
                { "kind": "mind-map-node", "props": { "id": "r", "width": 80 }, "children": [
                    { "kind": "mind-map-node", "props": { "id": "c" } }
                ] }
            ] },
            { "kind": "note", "props": { "id": "n", "x": 0, "y": 0 } },
            { "kind": "mind-map", "props": { "id": "b", "spacing": 10 } }
        ] }));

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].id, "a");
        assert_eq!(regions[0].algorithm, LayoutAlgorithm::Radial);
        assert_eq!(regions[0].nodes.len(), 2);
        assert_eq!(regions[0].nodes[0].size, Size::new(80.0, 50.0));
        assert_eq!(regions[0].nodes[1].from.unwrap(), "r");
        assert_eq!(regions[1].algorithm, LayoutAlgorithm::Tree);
        assert_eq!(regions[1].spacing, 10.0);
        assert!(regions[1].nodes.is_empty());
    }

    #[test]
    fn test_nested_region_owns_its_nodes() {
        let regions = regions_of(json!({ "children": [
            { "kind": "mind-map", "props": { "id": "outer" }, "children": [
                { "kind": "mind-map-node", "props": { "id": "a" }, "children": [
                    { "kind": "mind-map", "props": { "id": "inner" }, "children": [
                        { "kind": "mind-map-node", "props": { "id": "b" } }
                    ] }
                ] }
            ] }
        ] }));

        assert_eq!(regions[0].nodes.len(), 1);
        assert_eq!(regions[1].nodes.len(), 1);
        assert_eq!(regions[1].nodes[0].id, "b");
    }

    #[test]
    fn test_cycle_is_structural_error() {
        let regions = regions_of(json!({ "children": [
            { "kind": "mind-map", "props": { "id": "m" }, "children": [
                { "kind": "mind-map-node", "props": { "id": "A", "from": "C" } },
                { "kind": "mind-map-node", "props": { "id": "B", "from": "A" } },
                { "kind": "mind-map-node", "props": { "id": "C", "from": "B" } }
            ] }
        ] }));

        let err = regions[0].validate().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E300));
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(err.help().unwrap().contains("acyclic hierarchy required"));
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let regions = regions_of(json!({ "children": [
            { "kind": "mind-map", "props": { "id": "m" }, "children": [
                { "kind": "mind-map-node", "props": { "id": "A", "from": "A" } }
            ] }
        ] }));
        assert_eq!(
            regions[0].validate().unwrap_err().code(),
            Some(ErrorCode::E300)
        );
    }

    #[test]
    fn test_outside_predecessor_makes_root() {
        let regions = regions_of(json!({ "children": [
            { "kind": "mind-map", "props": { "id": "m" }, "children": [
                { "kind": "mind-map-node", "props": { "id": "A", "from": "elsewhere" } },
                { "kind": "mind-map-node", "props": { "id": "B", "from": "A" } }
            ] }
        ] }));
        assert!(regions[0].validate().is_ok());
    }

    #[test]
    fn test_duplicate_node_is_structural_error() {
        let regions = regions_of(json!({ "children": [
            { "kind": "mind-map", "props": { "id": "m" }, "children": [
                { "kind": "mind-map-node", "props": { "id": "A" } },
                { "kind": "mind-map-node", "props": { "id": "A" } }
            ] }
        ] }));
        assert_eq!(
            regions[0].validate().unwrap_err().code(),
            Some(ErrorCode::E301)
        );
    }
}
