//! Lexical scope resolution.
//!
//! Resolves every identifier, member expression and type identifier in a
//! program to the node that declares it. Resolution never aborts: a name
//! that cannot be found is recorded as undefined, reported as a warning, and
//! later passes treat it as an unknown.

use ecow::EcoString;
use hashbrown::{HashMap, HashSet};

use crate::diagnostics::Reporter;
use crate::namespace::Namespace;
use crate::scope_stack::{BindError, PopError, ScopeStack};
use crate::syntax::{Node, NodeId, NodeKind, Traversal, Visitor, walk};

/// Reference tables produced by [`build_scope`].
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub identifier_to_pattern: HashMap<NodeId, NodeId>,
    pub member_to_pattern: HashMap<NodeId, NodeId>,
    pub type_identifier_to_pattern: HashMap<NodeId, NodeId>,
    pub undefined_identifiers: HashSet<NodeId>,
    pub undefined_members: HashSet<NodeId>,
    pub undefined_types: HashSet<NodeId>,
    values: ScopeStack<NodeId>,
    types: ScopeStack<NodeId>,
}

impl Scope {
    /// Declaration referenced by an identifier or member expression.
    pub fn resolve(&self, reference: NodeId) -> Option<NodeId> {
        self.identifier_to_pattern
            .get(&reference)
            .or_else(|| self.member_to_pattern.get(&reference))
            .copied()
    }

    /// Declaration referenced by a type identifier.
    pub fn resolve_type(&self, reference: NodeId) -> Option<NodeId> {
        self.type_identifier_to_pattern.get(&reference).copied()
    }

    /// Value names visible where the walk ended.
    ///
    /// After a full walk that is the program's top level. When the scope was
    /// built with a focus node, it is the names visible at that node.
    pub fn value_names(&self) -> HashMap<EcoString, NodeId> {
        self.values.flatten()
    }

    /// Type names visible where the walk ended.
    pub fn type_names(&self) -> HashMap<EcoString, NodeId> {
        self.types.flatten()
    }

    pub fn is_undefined(&self, reference: NodeId) -> bool {
        self.undefined_identifiers.contains(&reference)
            || self.undefined_members.contains(&reference)
            || self.undefined_types.contains(&reference)
    }
}

struct ScopeBuilder<'r> {
    namespace: &'r Namespace,
    reporter: &'r dyn Reporter,
    focus: Option<NodeId>,
    scope: Scope,
    /// Names of the enclosing declarations, outermost first.
    path: Vec<String>,
    record_depth: usize,
    /// Fields of the record being walked, bound once the record is left so
    /// initializers cannot see their siblings.
    fields: Vec<(EcoString, NodeId)>,
}

fn frame_error(error: BindError) -> PopError {
    match error {
        BindError::NoScope => PopError::EmptyStack,
    }
}

impl ScopeBuilder<'_> {
    /// Direct members of the namespace at `prefix`, keyed by short name.
    fn members<'n>(
        table: &'n HashMap<String, NodeId>,
        prefix: &'n str,
    ) -> impl Iterator<Item = (&'n str, NodeId)> + 'n {
        table.iter().filter_map(move |(path, id)| {
            let rest = path.strip_prefix(prefix)?.strip_prefix('.')?;
            (!rest.contains('.')).then_some((rest, *id))
        })
    }

    /// Tries `path` relative to every enclosing declaration, innermost first,
    /// then as an absolute path.
    fn lookup_qualified(&self, table: &HashMap<String, NodeId>, path: &str) -> Option<NodeId> {
        (0..=self.path.len()).rev().find_map(|depth| {
            let mut candidate = self.path[..depth].join(".");
            if !candidate.is_empty() {
                candidate.push('.');
            }
            candidate.push_str(path);
            table.get(&candidate).copied()
        })
    }

    fn push_generics(&mut self, generic_parameters: &[&Node<'_>]) {
        self.scope.types.push_frame(
            generic_parameters
                .iter()
                .filter_map(|generic| Some((generic.declared_name()?, generic.id))),
        );
    }

    fn bind_value(&mut self, name: &str, id: NodeId) -> Result<(), PopError> {
        tracing::trace!(binding = name, %id, "bind");
        self.scope
            .values
            .bind_in_current(name, id)
            .map_err(frame_error)?;
        Ok(())
    }

    fn undefined(&self, what: &str, node: &Node<'_>, name: &str) {
        tracing::debug!(kind = what, reference = name, "unresolved");
        self.reporter
            .warn(&format!("{}: undefined {what} `{name}`", node.id));
    }
}

impl<'a> Visitor<'a> for ScopeBuilder<'_> {
    type Error = PopError;

    fn enter(&mut self, node: &'a Node<'a>) -> Result<Traversal, PopError> {
        if self.focus == Some(node.id) {
            return Ok(Traversal::Stop);
        }

        match node.kind {
            NodeKind::Namespace { name, .. } => {
                self.path.push(name.to_string());
                let prefix = self.path.join(".");
                let values: Vec<_> = Self::members(&self.namespace.values, &prefix).collect();
                let types: Vec<_> = Self::members(&self.namespace.types, &prefix).collect();
                self.scope.values.push_frame(values);
                self.scope.types.push_frame(types);
            }
            NodeKind::Function {
                name,
                generic_parameters,
                ..
            } => {
                self.bind_value(name, node.id)?;
                self.path.push(name.to_string());
                self.scope.values.push();
                self.push_generics(generic_parameters);
            }
            NodeKind::Record {
                name,
                generic_parameters,
                ..
            } => {
                self.path.push(name.to_string());
                self.push_generics(generic_parameters);
                self.record_depth += 1;
            }
            NodeKind::Enumeration {
                name,
                generic_parameters,
                ..
            } => {
                self.path.push(name.to_string());
                self.push_generics(generic_parameters);
            }
            NodeKind::Branch { .. } | NodeKind::Loop { .. } => self.scope.values.push(),
            NodeKind::Identifier { name } => match self.scope.values.lookup(name) {
                Some(declaration) => {
                    self.scope.identifier_to_pattern.insert(node.id, *declaration);
                }
                None => {
                    self.scope.undefined_identifiers.insert(node.id);
                    self.undefined("identifier", node, name);
                }
            },
            NodeKind::Member { member, .. } => {
                let declaration = node
                    .dotted_path()
                    .and_then(|path| self.lookup_qualified(&self.namespace.values, &path));
                match declaration {
                    Some(declaration) => {
                        self.scope.member_to_pattern.insert(node.id, declaration);
                    }
                    None => {
                        self.scope.undefined_members.insert(node.id);
                        let path = node.dotted_path();
                        self.undefined("member", node, path.as_deref().unwrap_or(member));
                    }
                }
                return Ok(Traversal::SkipChildren);
            }
            NodeKind::TypeIdentifier { name, .. } => {
                let declaration = self
                    .scope
                    .types
                    .lookup(name)
                    .copied()
                    .or_else(|| self.lookup_qualified(&self.namespace.types, name));
                match declaration {
                    Some(declaration) => {
                        self.scope
                            .type_identifier_to_pattern
                            .insert(node.id, declaration);
                    }
                    None => {
                        self.scope.undefined_types.insert(node.id);
                        self.undefined("type", node, name);
                    }
                }
            }
            _ => {}
        }
        Ok(Traversal::Continue)
    }

    fn leave(&mut self, node: &'a Node<'a>) -> Result<(), PopError> {
        match node.kind {
            NodeKind::Namespace { .. } => {
                self.scope.values.pop()?;
                self.scope.types.pop()?;
                self.path.pop();
            }
            NodeKind::Function { .. } => {
                self.scope.types.pop()?;
                self.scope.values.pop()?;
                self.path.pop();
            }
            NodeKind::Record { .. } => {
                self.scope.types.pop()?;
                self.path.pop();
                self.record_depth -= 1;
                // Fields land in the enclosing scope once every initializer
                // is resolved.
                for (name, id) in std::mem::take(&mut self.fields) {
                    self.bind_value(&name, id)?;
                }
            }
            NodeKind::Enumeration { .. } => {
                self.scope.types.pop()?;
                self.path.pop();
            }
            NodeKind::Branch { .. } | NodeKind::Loop { .. } => {
                self.scope.values.pop()?;
            }
            NodeKind::Parameter { name, .. } => self.bind_value(name, node.id)?,
            NodeKind::Variable { name, .. } if self.record_depth > 0 => {
                self.fields.push((name.into(), node.id));
            }
            NodeKind::Variable { name, .. } => self.bind_value(name, node.id)?,
            _ => {}
        }
        Ok(())
    }
}

/// Resolves every reference under `root`.
///
/// When `focus` is given, the walk stops on entering that node and the
/// returned scope's name tables describe what is visible there.
pub fn build_scope<'a>(
    root: &'a Node<'a>,
    namespace: &Namespace,
    focus: Option<NodeId>,
    reporter: &dyn Reporter,
) -> Result<Scope, PopError> {
    let mut builder = ScopeBuilder {
        namespace,
        reporter,
        focus,
        scope: Scope::default(),
        path: Vec::new(),
        record_depth: 0,
        fields: Vec::new(),
    };
    builder.scope.values.push_frame(
        namespace
            .values
            .iter()
            .map(|(path, id)| (path.as_str(), *id)),
    );
    builder.scope.types.push_frame(
        namespace
            .types
            .iter()
            .map(|(path, id)| (path.as_str(), *id)),
    );

    walk(&mut builder, root)?;

    let scope = builder.scope;
    tracing::debug!(
        resolved = scope.identifier_to_pattern.len() + scope.member_to_pattern.len(),
        undefined = scope.undefined_identifiers.len() + scope.undefined_members.len(),
        "scope built"
    );
    Ok(scope)
}
