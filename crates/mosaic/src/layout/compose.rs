//! Composition of laid-out regions into one coordinate space.
//!
//! Each region is reduced to a meta-node: the bounds of its local layout and
//! the local position of its first root. The result is one offset per region
//! that is added to every local position of that region.
//!
//! A lone region keeps its local coordinates unless it declares absolute
//! `x`/`y`. With several regions, absolute regions move to their `x`/`y`,
//! anchored regions are placed next to their target region in dependency
//! order, and every other region joins a left-to-right row whose roots share
//! `y = 0`.

use std::collections::HashMap;

use log::{debug, warn};
use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};

use mosaic_compiler::error::{Diagnostic, ErrorCode};
use mosaic_core::{
    element::{Align, Anchor, Edge, Placement},
    geometry::{Bounds, Point},
    identifier::Id,
};

use super::{hierarchy::LayoutTree, region::Region};
use crate::config::LayoutConfig;

/// A region seen from the outside.
#[derive(Debug, Clone, Copy)]
struct MetaNode {
    id: Id,
    bounds: Bounds,
    root: Point,
    placement: Option<Placement>,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Absolute(Point),
    Anchored { target: usize, anchor: Anchor },
    Row,
}

/// Computes the offset of every region, indexed like `regions`.
///
/// # Errors
///
/// Returns a structural [`Diagnostic`] when region anchors form a cycle.
pub(super) fn compose(
    regions: &[Region],
    layouts: &[LayoutTree],
    config: &LayoutConfig,
) -> Result<Vec<Point>, Diagnostic> {
    let metas: Vec<MetaNode> = regions
        .iter()
        .zip(layouts)
        .map(|(region, tree)| MetaNode {
            id: region.id,
            bounds: tree.bounds().unwrap_or_default(),
            root: tree.first_root_position().unwrap_or_default(),
            placement: region.placement,
        })
        .collect();

    if let [meta] = metas.as_slice() {
        return Ok(vec![single_offset(meta)]);
    }

    let modes = classify(&metas);
    let mut graph = DiGraph::<usize, ()>::new();
    let indices: Vec<NodeIndex> = (0..metas.len()).map(|idx| graph.add_node(idx)).collect();
    for (idx, mode) in modes.iter().enumerate() {
        if let Mode::Anchored { target, .. } = mode {
            graph.add_edge(indices[*target], indices[idx], ());
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| {
        let region = metas[graph[cycle.node_id()]].id;
        Diagnostic::error(format!(
            "mind-map regions anchor each other in a cycle through `{region}`"
        ))
        .with_code(ErrorCode::E302)
        .with_help("break the cycle by giving one of the regions absolute `x`/`y`")
    })?;

    let mut offsets = vec![Point::default(); metas.len()];
    let mut cursor = 0.0;
    for (idx, (meta, mode)) in metas.iter().zip(&modes).enumerate() {
        match mode {
            Mode::Absolute(point) => offsets[idx] = *point,
            Mode::Row => {
                offsets[idx] = Point::new(cursor - meta.bounds.min_x(), -meta.root.y());
                cursor += meta.bounds.width() + config.region_spacing();
            }
            Mode::Anchored { .. } => {}
        }
    }

    for node in order {
        let idx = graph[node];
        if let Mode::Anchored { target, anchor } = &modes[idx] {
            let target_bounds = metas[*target].bounds.translate(offsets[*target]);
            offsets[idx] = anchored_offset(
                metas[idx].bounds,
                target_bounds,
                anchor,
                config.region_gap(),
            );
        }
    }

    debug!(regions = metas.len(); "Regions composed");
    Ok(offsets)
}

fn single_offset(meta: &MetaNode) -> Point {
    match meta.placement {
        Some(Placement::Absolute(point)) => point,
        Some(Placement::Relative(anchor)) => {
            warn!(
                region = meta.id.to_string(),
                anchor = anchor.target().to_string();
                "Only one mind-map region, ignoring its anchor"
            );
            Point::default()
        }
        None => Point::default(),
    }
}

fn classify(metas: &[MetaNode]) -> Vec<Mode> {
    let mut index: HashMap<Id, usize> = HashMap::with_capacity(metas.len());
    for (idx, meta) in metas.iter().enumerate() {
        index.entry(meta.id).or_insert(idx);
    }

    metas
        .iter()
        .enumerate()
        .map(|(idx, meta)| match meta.placement {
            Some(Placement::Absolute(point)) => Mode::Absolute(point),
            Some(Placement::Relative(anchor)) => match index.get(&anchor.target()) {
                Some(&target) if target != idx => Mode::Anchored { target, anchor },
                _ => {
                    warn!(
                        region = meta.id.to_string(),
                        anchor = anchor.target().to_string();
                        "Region anchor does not name another mind-map region, placing in row"
                    );
                    Mode::Row
                }
            },
            None => Mode::Row,
        })
        .collect()
}

/// Offset that puts `bounds` next to `target` as `anchor` describes.
fn anchored_offset(bounds: Bounds, target: Bounds, anchor: &Anchor, default_gap: f64) -> Point {
    let gap = anchor.gap().unwrap_or(default_gap);
    let align = anchor.align().unwrap_or(Align::Center);
    let (width, height) = (bounds.width(), bounds.height());
    let cross_x = aligned(align, target.min_x(), target.max_x(), width);
    let cross_y = aligned(align, target.min_y(), target.max_y(), height);

    let top_left = match anchor.position() {
        Edge::Right => Point::new(target.max_x() + gap, cross_y),
        Edge::Left => Point::new(target.min_x() - gap - width, cross_y),
        Edge::Bottom => Point::new(cross_x, target.max_y() + gap),
        Edge::Top => Point::new(cross_x, target.min_y() - gap - height),
    };
    top_left.sub_point(bounds.min_point())
}

fn aligned(align: Align, start: f64, end: f64, extent: f64) -> f64 {
    match align {
        Align::Start => start,
        Align::Center => (start + end) / 2.0 - extent / 2.0,
        Align::End => end - extent,
    }
}
