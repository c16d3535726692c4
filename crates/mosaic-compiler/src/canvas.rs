//! Canvas metadata extraction.
//!
//! A top-level canvas wrapper configures the document background. The
//! background is lifted into [`Container::meta`] and the wrapper is replaced
//! by its children. When several top-level canvases are present the first one
//! supplies the background; the others are spliced the same way.

use log::{info, warn};
use mosaic_core::{
    element::{Background, Meta, Payload},
    kind::Kind,
    tree::{Container, Instance},
};

use crate::error::{Diagnostic, Result};

/// Lifts the canvas background into the container metadata and removes
/// every canvas wrapper from the tree.
pub fn extract_canvas_meta(container: &mut Container) -> Result<()> {
    let children = std::mem::take(container.children_mut());
    let mut background: Option<Background> = None;
    let mut canvases = 0usize;
    let mut spliced = Vec::with_capacity(children.len());

    for mut instance in children {
        if instance.kind() != Kind::Canvas {
            splice_nested(&mut instance);
            spliced.push(instance);
            continue;
        }

        let Payload::Canvas(declared) = instance.payload() else {
            return Err(Diagnostic::internal("canvas wrapper without a background payload"));
        };
        canvases += 1;
        if canvases == 1 {
            background = declared.clone();
        } else if declared.is_some() {
            warn!(index = canvases; "Ignoring background of additional canvas wrapper");
        }

        let mut inner = instance.take_children();
        splice_canvases(&mut inner);
        spliced.extend(inner);
    }

    *container.children_mut() = spliced;
    if background.is_some() {
        container.set_meta(Meta { background });
    }

    info!(canvases, has_background = container.meta().is_some(); "Canvas metadata extracted");
    Ok(())
}

/// Removes canvas wrappers below the top level of `instance`.
fn splice_nested(instance: &mut Instance) {
    splice_canvases(instance.children_mut());
}

fn splice_canvases(children: &mut Vec<Instance>) {
    if !children.iter().any(|child| child.kind() == Kind::Canvas) {
        for child in children.iter_mut() {
            splice_nested(child);
        }
        return;
    }

    let mut spliced = Vec::with_capacity(children.len());
    for mut child in std::mem::take(children) {
        if child.kind() == Kind::Canvas {
            warn!("Splicing nested canvas wrapper; its background is ignored");
            let mut inner = child.take_children();
            splice_canvases(&mut inner);
            spliced.extend(inner);
        } else {
            splice_nested(&mut child);
            spliced.push(child);
        }
    }
    *children = spliced;
}
