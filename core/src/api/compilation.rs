//! Result of running the front-end over a set of programs.

use crate::api::CompilationOptions;
use crate::evaluator::EvaluationContext;
use crate::namespace::Namespace;
use crate::scope::Scope;
use crate::syntax::{Node, NodeId, NodeIndex};
use crate::types::{StaticType, Substitution, UnificationContext, UnificationError};
use crate::values::Value;

/// Everything the passes produced for one joined program.
///
/// Values are computed lazily: nothing is evaluated until [`evaluate`] asks
/// for a node, and each node is computed at most once.
///
/// [`evaluate`]: Compilation::evaluate
pub struct Compilation<'a> {
    pub(super) root: &'a Node<'a>,
    pub(super) index: NodeIndex<'a>,
    pub(super) namespace: Namespace,
    pub(super) scope: Scope,
    pub(super) unification: UnificationContext,
    pub(super) substitution: Substitution,
    pub(super) unification_errors: Vec<(NodeId, UnificationError)>,
    pub(super) context: EvaluationContext<'a>,
    pub(super) options: CompilationOptions,
}

impl<'a> Compilation<'a> {
    /// The joined program.
    pub fn root(&self) -> &'a Node<'a> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&'a Node<'a>> {
        self.index.get(id)
    }

    pub fn index(&self) -> &NodeIndex<'a> {
        &self.index
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn unification(&self) -> &UnificationContext {
        &self.unification
    }

    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    /// Constraints that failed to unify, with the node that produced them.
    pub fn unification_errors(&self) -> &[(NodeId, UnificationError)] {
        &self.unification_errors
    }

    pub fn context(&self) -> &EvaluationContext<'a> {
        &self.context
    }

    /// Inferred type of a node, with every solved variable substituted.
    pub fn resolved_type(&self, id: NodeId) -> Option<StaticType> {
        let ty = self
            .unification
            .node_type(id)
            .or_else(|| self.unification.pattern_type(id))?;
        Some(
            self.substitution
                .resolve_with_limit(ty, self.options.max_substitution_passes),
        )
    }

    /// Value of a node. Failures are reported and yield `None`.
    pub fn evaluate(&self, id: NodeId) -> Option<Value<'a>> {
        self.context.evaluate(id)
    }

    /// Value of the declaration registered under a qualified path.
    pub fn evaluate_path(&self, path: &str) -> Option<Value<'a>> {
        self.evaluate(self.namespace.value(path)?)
    }
}
