//! Anchor resolution.
//!
//! After scope resolution node ids are qualified but anchor targets are still
//! written the way the author saw them: local names inside the embed scope
//! the node came from. This stage rewrites a local anchor target to the
//! sibling of the same scope when such a node exists, and otherwise keeps the
//! literal target.

use std::collections::HashSet;

use log::{debug, info, warn};
use mosaic_core::{
    element::Placement,
    identifier::Id,
    kind::Kind,
    tree::{Container, Instance},
};

/// Rewrites scope-local anchor targets to qualified ids. Never fails.
pub fn resolve_anchors(container: &mut Container) {
    let known = collect_ids(container);
    let mut rewritten = 0usize;

    container.walk_mut(|instance| {
        if resolve_instance(instance, &known) {
            rewritten += 1;
        }
    });

    info!(nodes = known.len(), rewritten; "Anchors resolved");
}

/// Collects every qualified node id of the tree. Ports are node-local and excluded.
fn collect_ids(container: &Container) -> HashSet<Id> {
    let mut known = HashSet::new();
    for instance in container.instances() {
        if instance.kind() == Kind::Port {
            continue;
        }
        let Some(id) = instance.id() else {
            continue;
        };
        if !known.insert(id) {
            warn!(id = id.to_string(); "Duplicate node id");
        }
    }
    known
}

fn resolve_instance(instance: &mut Instance, known: &HashSet<Id>) -> bool {
    let Some(scope) = instance.id().and_then(|id| id.scope_prefix()) else {
        return false;
    };
    let Some(Placement::Relative(anchor)) = instance.placement_mut() else {
        return false;
    };
    if anchor.target().is_qualified() {
        return false;
    }

    let candidate = scope.create_nested(anchor.target());
    if !known.contains(&candidate) {
        debug!(
            anchor = anchor.target().to_string(),
            candidate = candidate.to_string();
            "Anchor target not found in scope, keeping literal"
        );
        return false;
    }

    anchor.set_target(candidate);
    true
}
