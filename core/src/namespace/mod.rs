//! Flat table of every declaration reachable by a dotted path.
//!
//! The builder walks the program once. Functions, records, enumerations and
//! namespaces push their name onto a path stack, so `namespace Geometry {
//! record Point { x } }` registers the type `Geometry.Point` and the values
//! `Geometry.Point` (constructor) and `Geometry.Point.x` (field). Parameters
//! and top-level locals of a function sit under its name, as `f.a`. Locals
//! inside branches and loops are only reachable lexically.

use core::fmt;

use hashbrown::HashMap;
use thiserror::Error;

use crate::syntax::{Node, NodeId, NodeKind, Traversal, Visitor, walk};

/// Type names whose records are provided by the runtime and therefore never
/// get a constructor value.
pub const BUILTIN_TYPE_NAMES: [&str; 5] = ["Boolean", "Number", "String", "Array", "Color"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Value,
    Type,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Value => f.write_str("value"),
            NameKind::Type => f.write_str("type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    #[error("{kind} `{path}` is declared twice ({first} and {second})")]
    Collision {
        kind: NameKind,
        path: String,
        first: NodeId,
        second: NodeId,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    pub values: HashMap<String, NodeId>,
    pub types: HashMap<String, NodeId>,
}

impl Namespace {
    pub fn value(&self, path: &str) -> Option<NodeId> {
        self.values.get(path).copied()
    }

    pub fn type_(&self, path: &str) -> Option<NodeId> {
        self.types.get(path).copied()
    }

    fn register(
        &mut self,
        kind: NameKind,
        path: String,
        id: NodeId,
    ) -> Result<(), NamespaceError> {
        let table = match kind {
            NameKind::Value => &mut self.values,
            NameKind::Type => &mut self.types,
        };
        if let Some(first) = table.get(&path) {
            return Err(NamespaceError::Collision {
                kind,
                path,
                first: *first,
                second: id,
            });
        }
        tracing::trace!(%kind, %path, "registered");
        table.insert(path, id);
        Ok(())
    }
}

struct NamespaceBuilder {
    namespace: Namespace,
    path: Vec<String>,
}

impl NamespaceBuilder {
    fn qualified(&self, name: &str) -> String {
        let mut path = self.path.join(".");
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(name);
        path
    }

    fn register(&mut self, kind: NameKind, name: &str, id: NodeId) -> Result<(), NamespaceError> {
        let path = self.qualified(name);
        self.namespace.register(kind, path, id)
    }
}

impl<'a> Visitor<'a> for NamespaceBuilder {
    type Error = NamespaceError;

    fn enter(&mut self, node: &'a Node<'a>) -> Result<Traversal, NamespaceError> {
        match node.kind {
            NodeKind::Program { .. } => Ok(Traversal::Continue),
            NodeKind::Namespace { name, .. } => {
                self.path.push(name.to_string());
                Ok(Traversal::Continue)
            }
            NodeKind::Function { name, .. } => {
                self.register(NameKind::Value, name, node.id)?;
                self.path.push(name.to_string());
                Ok(Traversal::Continue)
            }
            NodeKind::Parameter { name, .. } => {
                self.register(NameKind::Value, name, node.id)?;
                Ok(Traversal::SkipChildren)
            }
            NodeKind::Record { name, .. } => {
                self.register(NameKind::Type, name, node.id)?;
                if !BUILTIN_TYPE_NAMES.contains(&name) {
                    self.register(NameKind::Value, name, node.id)?;
                }
                self.path.push(name.to_string());
                Ok(Traversal::Continue)
            }
            NodeKind::Enumeration { name, .. } => {
                self.register(NameKind::Type, name, node.id)?;
                self.path.push(name.to_string());
                Ok(Traversal::SkipChildren)
            }
            NodeKind::Variable { name, .. } => {
                self.register(NameKind::Value, name, node.id)?;
                Ok(Traversal::SkipChildren)
            }
            // Generic parameters and block locals are lexical.
            _ => Ok(Traversal::SkipChildren),
        }
    }

    fn leave(&mut self, node: &'a Node<'a>) -> Result<(), NamespaceError> {
        match node.kind {
            NodeKind::Enumeration { cases, .. } => {
                for case in cases {
                    if let NodeKind::EnumerationCase { name, .. } = case.kind {
                        self.register(NameKind::Value, name, case.id)?;
                    }
                }
                self.path.pop();
            }
            NodeKind::Namespace { .. } | NodeKind::Function { .. } | NodeKind::Record { .. } => {
                self.path.pop();
            }
            _ => {}
        }
        Ok(())
    }
}

pub fn build_namespace<'a>(root: &'a Node<'a>) -> Result<Namespace, NamespaceError> {
    let mut builder = NamespaceBuilder {
        namespace: Namespace::default(),
        path: Vec::new(),
    };
    walk(&mut builder, root)?;
    tracing::debug!(
        values = builder.namespace.values.len(),
        types = builder.namespace.types.len(),
        "namespace built"
    );
    Ok(builder.namespace)
}
