//! Lazy evaluator for Logic programs.
//!
//! [`evaluate`] does not compute anything by itself. It walks the program once
//! and gives every node either a value (literals, constructors, builtins) or a
//! [`Thunk`] naming the nodes it depends on. Values are then produced on
//! demand by [`EvaluationContext::evaluate`], each at most once per context.
//!
//! ## Design Principles
//!
//! - **Never panic**: failures are reported through the diagnostics sink and
//!   the failing node evaluates to nothing
//! - **Stack-safe**: a depth counter shared by all context copies bounds
//!   recursion, and loops can be given an iteration limit
//! - **Immutable values**: function calls and loop iterations run in cheap
//!   copies of their defining context; assignments rebind declarations in the
//!   current frame instead of mutating values
//!
//! ## Example
//!
//! ```ignore
//! let context =
//!     evaluator::evaluate(root, &scope, &unification, &substitution, &reporter, options);
//! let value = context.evaluate(answer.id);
//! ```

mod call;
mod context;
mod error;
mod native;
mod operators;


pub use context::{EvaluationContext, Materializer, Thunk};
pub use error::EvaluationError;
pub use native::{lookup as lookup_builtin, paths as builtin_paths};

use std::convert::Infallible;
use std::rc::Rc;

use ecow::EcoString;
use tracing::debug;

use crate::api::ExecutionOptions;
use crate::diagnostics::Reporter;
use crate::scope::Scope;
use crate::syntax::{
    BinaryOp, Literal, Node, NodeId, NodeKind, Traversal, Visitor, walk_infallible,
};
use crate::types::{StaticType, Substitution, UnificationContext};
use crate::values::{FunctionMemory, Memory, Value};
use call::{Closure, ExecutionPlan, call_value};

/// Collects the subtrees that must be recomputed per call or iteration, the
/// declaration behind every assignment and what each initializer reads.
struct Planner<'s> {
    scope: &'s Scope,
    plan: ExecutionPlan,
}

fn descendants(node: &Node<'_>, out: &mut Vec<NodeId>) {
    for child in node.children() {
        out.push(child.id);
        descendants(child, out);
    }
}

impl<'a> Visitor<'a> for Planner<'_> {
    type Error = Infallible;

    fn enter(&mut self, node: &'a Node<'a>) -> Result<Traversal, Infallible> {
        match node.kind {
            NodeKind::Function { .. } | NodeKind::Loop { .. } => {
                let mut subtree = Vec::new();
                descendants(node, &mut subtree);
                self.plan.subtrees.insert(node.id, subtree);
            }
            NodeKind::Assignment { target, .. } => {
                if let Some(declaration) = self.scope.resolve(target.id) {
                    self.plan.assignment_targets.insert(node.id, declaration);
                }
            }
            NodeKind::Variable {
                initializer: Some(initializer),
                ..
            } => {
                let mut subtree = vec![initializer.id];
                descendants(initializer, &mut subtree);
                let reads = subtree
                    .into_iter()
                    .filter_map(|id| self.scope.resolve(id))
                    .collect();
                self.plan.reads.insert(node.id, reads);
            }
            NodeKind::TypeIdentifier { .. } | NodeKind::FunctionType { .. } => {
                return Ok(Traversal::SkipChildren);
            }
            _ => {}
        }
        Ok(Traversal::Continue)
    }
}

struct Registrar<'a, 's> {
    context: &'s EvaluationContext<'a>,
    scope: &'s Scope,
    unification: &'s UnificationContext,
    substitution: &'s Substitution,
    plan: Rc<ExecutionPlan>,
    /// Names of the enclosing namespaces and declarations.
    path: Vec<&'a str>,
}

fn identity<'a>(
    id: NodeId,
) -> impl Fn(&EvaluationContext<'a>, &[Value<'a>]) -> Result<Value<'a>, EvaluationError> + 'a {
    move |_, values| {
        values
            .first()
            .cloned()
            .ok_or(EvaluationError::MissingValue(id))
    }
}

impl<'a> Registrar<'a, '_> {
    fn resolved(&self, id: NodeId) -> StaticType {
        self.unification
            .node_type(id)
            .or_else(|| self.unification.pattern_type(id))
            .map(|ty| self.substitution.resolve(ty))
            .unwrap_or_else(StaticType::unit)
    }

    fn qualified(&self, name: &str) -> EcoString {
        let mut path = EcoString::new();
        for segment in &self.path {
            path.push_str(segment);
            path.push('.');
        }
        path.push_str(name);
        path
    }

    fn thunk<F>(&self, node: &'a Node<'a>, dependencies: Vec<NodeId>, materialize: F)
    where
        F: Fn(&EvaluationContext<'a>, &[Value<'a>]) -> Result<Value<'a>, EvaluationError> + 'a,
    {
        self.context
            .add_thunk(node.id, Thunk::new(dependencies, materialize));
    }

    fn register_literal(&self, node: &'a Node<'a>, literal: Literal<'a>) {
        let value = match literal {
            Literal::None => Value::unit(),
            Literal::Boolean(value) => Value::boolean(value),
            Literal::Number(value) => Value::number(value),
            Literal::String(value) => Value::string(value),
            Literal::Color(value) => Value::color(value),
            Literal::Array(elements) => {
                let ty = self.resolved(node.id);
                let dependencies = elements.iter().map(|element| element.id).collect();
                self.thunk(node, dependencies, move |_, values| {
                    Ok(Value::new(
                        ty.clone(),
                        Memory::Array(values.iter().cloned().collect()),
                    ))
                });
                return;
            }
        };
        self.context.add_value(node.id, value);
    }

    fn register_function(
        &self,
        node: &'a Node<'a>,
        name: &'a str,
        parameters: &'a [&'a Node<'a>],
        body: &'a [&'a Node<'a>],
    ) {
        let path = self.qualified(name);
        let ty = self.resolved(node.id);

        if body.is_empty() {
            if let Some(implementation) = native::lookup(&path) {
                debug!(builtin = %path, "bound native implementation");
                let function = FunctionMemory::Builtin {
                    path,
                    implementation,
                };
                self.context.add_value(node.id, Value::function(ty, function));
                return;
            }
        }

        // Defaults are computed once, in the defining context.
        let dependencies = parameters
            .iter()
            .filter_map(|parameter| match parameter.kind {
                NodeKind::Parameter { default_value, .. } => {
                    default_value.map(|value| value.id)
                }
                _ => None,
            })
            .collect();
        let plan = Rc::clone(&self.plan);
        self.thunk(node, dependencies, move |context, defaults| {
            let mut defaults = defaults.iter();
            let parameters = parameters
                .iter()
                .map(|&parameter| {
                    let default = match parameter.kind {
                        NodeKind::Parameter {
                            default_value: Some(_),
                            ..
                        } => defaults.next().cloned(),
                        _ => None,
                    };
                    (parameter, default)
                })
                .collect();
            let closure = Closure {
                name: path.clone(),
                node,
                parameters,
                body,
                base: context.copy(),
                plan: Rc::clone(&plan),
            };
            Ok(Value::function(
                ty.clone(),
                FunctionMemory::Closure(Rc::new(closure)),
            ))
        });
    }

    fn register_record(&self, node: &'a Node<'a>, declarations: &'a [&'a Node<'a>]) {
        let mut fields = Vec::new();
        let mut dependencies = Vec::new();
        for declaration in declarations {
            if let NodeKind::Variable {
                name, initializer, ..
            } = declaration.kind
            {
                fields.push((EcoString::from(name), initializer.is_some()));
                if initializer.is_some() {
                    dependencies.push(declaration.id);
                }
            }
        }

        let ty = self.resolved(node.id);
        let record = node.id;
        self.thunk(node, dependencies, move |_, defaults| {
            let mut defaults = defaults.iter();
            let fields = fields
                .iter()
                .map(|(name, has_default)| {
                    let default = if *has_default {
                        defaults.next().cloned()
                    } else {
                        None
                    };
                    (name.clone(), default)
                })
                .collect();
            Ok(Value::function(
                ty.clone(),
                FunctionMemory::RecordInit { record, fields },
            ))
        });
    }

    fn register_call(
        &self,
        node: &'a Node<'a>,
        callee: &'a Node<'a>,
        arguments: &'a [&'a Node<'a>],
    ) {
        let mut dependencies = vec![callee.id];
        // Label of each written argument, and whether it carries a value.
        let mut slots: Vec<(Option<EcoString>, bool)> = Vec::new();
        for argument in arguments {
            let (label, expression) = match argument.kind {
                NodeKind::Argument { label, expression } => (label, expression),
                _ => (None, *argument),
            };
            let placeholder = matches!(expression.kind, NodeKind::Placeholder);
            if !placeholder {
                dependencies.push(expression.id);
            }
            slots.push((label.map(EcoString::from), !placeholder));
        }

        let ty = self.resolved(node.id);
        let id = node.id;
        self.thunk(node, dependencies, move |context, values| {
            let Some((callee, values)) = values.split_first() else {
                return Err(EvaluationError::MissingValue(id));
            };
            let mut values = values.iter().cloned();
            let arguments = slots
                .iter()
                .map(|(label, present)| {
                    let value = if *present { values.next() } else { None };
                    (label.clone(), value)
                })
                .collect();
            call_value(context, id, callee, arguments, &ty)
        });
    }

    fn register_binary(
        &self,
        node: &'a Node<'a>,
        op: BinaryOp,
        left: &'a Node<'a>,
        right: &'a Node<'a>,
    ) {
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            // The right operand is only evaluated when it decides the result.
            self.thunk(node, Vec::new(), move |context, _| {
                let left = context.try_evaluate_bool(left.id)?;
                if left == (op == BinaryOp::Or) {
                    return Ok(Value::boolean(left));
                }
                context.try_evaluate_bool(right.id).map(Value::boolean)
            });
            return;
        }

        let id = node.id;
        self.thunk(node, vec![left.id, right.id], move |_, values| match values {
            [left, right] => operators::eval_binary(op, left, right),
            _ => Err(EvaluationError::MissingValue(id)),
        });
    }
}

impl<'a> Visitor<'a> for Registrar<'a, '_> {
    type Error = Infallible;

    fn enter(&mut self, node: &'a Node<'a>) -> Result<Traversal, Infallible> {
        match node.kind {
            NodeKind::Namespace { name, .. } => self.path.push(name),
            NodeKind::Function {
                name,
                parameters,
                body,
                ..
            } => {
                self.register_function(node, name, parameters, body);
                self.path.push(name);
            }
            NodeKind::Record {
                name, declarations, ..
            } => {
                self.register_record(node, declarations);
                self.path.push(name);
            }
            NodeKind::Enumeration { name, .. } => self.path.push(name),
            NodeKind::EnumerationCase { name, .. } => {
                let ty = self.resolved(node.id);
                let case = FunctionMemory::EnumInit { case: name.into() };
                self.context.add_value(node.id, Value::function(ty, case));
                return Ok(Traversal::SkipChildren);
            }
            NodeKind::Variable {
                initializer: Some(initializer),
                ..
            } => self.thunk(node, vec![initializer.id], identity(node.id)),
            NodeKind::Identifier { .. } | NodeKind::Member { .. } => {
                if let Some(declaration) = self.scope.resolve(node.id) {
                    self.thunk(node, vec![declaration], identity(node.id));
                }
                return Ok(Traversal::SkipChildren);
            }
            NodeKind::Call { callee, arguments } => {
                self.register_call(node, callee, arguments)
            }
            NodeKind::Binary { op, left, right } => {
                self.register_binary(node, op, left, right)
            }
            NodeKind::Assignment { value, .. } => {
                self.thunk(node, vec![value.id], identity(node.id))
            }
            NodeKind::Literal(literal) => self.register_literal(node, literal),
            NodeKind::TypeIdentifier { .. } | NodeKind::FunctionType { .. } => {
                return Ok(Traversal::SkipChildren);
            }
            _ => {}
        }
        Ok(Traversal::Continue)
    }

    fn leave(&mut self, node: &'a Node<'a>) -> Result<(), Infallible> {
        if matches!(
            node.kind,
            NodeKind::Namespace { .. }
                | NodeKind::Function { .. }
                | NodeKind::Record { .. }
                | NodeKind::Enumeration { .. }
        ) {
            self.path.pop();
        }
        Ok(())
    }
}

/// Registers a value or thunk for every evaluable node below `root`.
///
/// Types given to values are the inferred types of their nodes under
/// `substitution`.
pub fn evaluate<'a>(
    root: &'a Node<'a>,
    scope: &Scope,
    unification: &UnificationContext,
    substitution: &Substitution,
    reporter: &'a dyn Reporter,
    options: ExecutionOptions,
) -> EvaluationContext<'a> {
    let mut planner = Planner {
        scope,
        plan: ExecutionPlan::default(),
    };
    walk_infallible(&mut planner, root);

    let context = EvaluationContext::new(reporter, options);
    let mut registrar = Registrar {
        context: &context,
        scope,
        unification,
        substitution,
        plan: Rc::new(planner.plan),
        path: Vec::new(),
    };
    walk_infallible(&mut registrar, root);
    debug!(
        subtrees = registrar.plan.subtrees.len(),
        "evaluation context ready"
    );
    context
}
