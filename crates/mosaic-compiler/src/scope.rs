//! Scope resolution.
//!
//! Qualifies identifiers declared inside embed scopes with the chain of
//! enclosing scope names and splices the embed wrappers out of the tree.
//!
//! An identifier that already contains the separator is a fully qualified
//! reference and passes through untouched. Anchor targets are left to the
//! anchor resolver, which needs the qualified ids of the whole tree first.

use log::{debug, info};
use mosaic_core::{
    element::{Endpoint, Payload},
    identifier::{Id, Scope},
    kind::Kind,
    tree::{Container, Instance},
};

use crate::error::{Diagnostic, Result};

/// Ids a node inherits from its host ancestors, already qualified.
#[derive(Debug, Clone, Copy, Default)]
struct Hosts {
    enclosing: Option<Id>,
    group: Option<Id>,
    mind_map_parent: Option<Id>,
}

/// Walks the host tree with an explicit stack of embed scopes.
#[derive(Debug, Default)]
struct ScopeResolver {
    scope: Scope,
    spliced: usize,
}

/// Qualifies every identifier of the container and removes embed wrappers.
///
/// Running the resolver on its own output is a no-op.
pub fn resolve_scopes(container: &mut Container) -> Result<()> {
    let mut resolver = ScopeResolver::default();
    let children = std::mem::take(container.children_mut());
    *container.children_mut() = resolver.resolve_children(children, Hosts::default())?;

    info!(spliced = resolver.spliced; "Scopes resolved");
    Ok(())
}

impl ScopeResolver {
    fn resolve_children(&mut self, children: Vec<Instance>, hosts: Hosts) -> Result<Vec<Instance>> {
        let mut resolved = Vec::with_capacity(children.len());

        for mut instance in children {
            if instance.kind() == Kind::Embed {
                let Payload::Embed(name) = *instance.payload() else {
                    return Err(Diagnostic::internal("embed wrapper without a scope name"));
                };

                self.scope.push(name);
                debug!(scope = self.scope.to_string(); "Entering embed scope");
                let inner = self.resolve_children(instance.take_children(), hosts)?;
                self.scope.pop();

                self.spliced += 1;
                resolved.extend(inner);
                continue;
            }

            self.qualify_instance(&mut instance, hosts);

            let child_hosts = hosts.for_children_of(&instance);
            let children = instance.take_children();
            *instance.children_mut() = self.resolve_children(children, child_hosts)?;

            resolved.push(instance);
        }

        Ok(resolved)
    }

    fn qualify_instance(&self, instance: &mut Instance, hosts: Hosts) {
        // Port ids are local to their node.
        let local = instance.kind() == Kind::Port;
        if let Some(id) = instance.id().filter(|_| !local) {
            instance.set_id(id.qualify(&self.scope));
        }

        if let Some(owner) = instance.owner_mut() {
            let parent = hosts
                .group
                .unwrap_or_else(|| owner.parent().qualify(&self.scope));
            owner.set_parent(parent);
        }

        match instance.payload_mut() {
            Payload::Link(link) => {
                self.qualify_endpoint(&mut link.from, hosts.enclosing);
                self.qualify_endpoint(&mut link.to, hosts.enclosing);
            }
            Payload::MindMapNode(node) => {
                if let Some(from) = &mut node.from {
                    self.qualify_endpoint(from, hosts.mind_map_parent);
                }
            }
            _ => {}
        }
    }

    fn qualify_endpoint(&self, endpoint: &mut Endpoint, inherited_from: Option<Id>) {
        let node = match inherited_from {
            Some(host) if endpoint.is_inherited() => host,
            _ => endpoint.node().qualify(&self.scope),
        };
        endpoint.set_node(node);
    }
}

impl Hosts {
    fn for_children_of(self, instance: &Instance) -> Self {
        let kind = instance.kind();
        if kind.is_wrapper() {
            return self;
        }
        let id = instance.id();
        Self {
            enclosing: if kind.is_addressable() {
                id
            } else {
                self.enclosing
            },
            group: if kind == Kind::Group { id } else { None },
            mind_map_parent: if kind == Kind::MindMapNode { id } else { None },
        }
    }
}
