//! Constraint generation.
//!
//! Walks the program once and gives every expression and declaration a
//! [`StaticType`], emitting a [`Constraint`] wherever a typing rule relates
//! two types. The constraints are solved afterwards by [`super::unify`].

use core::convert::Infallible;

use ecow::EcoString;
use hashbrown::HashMap;

use crate::scope::Scope;
use crate::syntax::{
    BinaryOp, Literal, Node, NodeId, NodeIndex, NodeKind, Traversal, Visitor, align,
    walk_infallible,
};

use super::{Constraint, FunctionArgument, StaticType, TypeVariableGenerator};

/// Everything constraint generation produces.
#[derive(Debug, Clone, Default)]
pub struct UnificationContext {
    /// In generation order. Earlier constraints bind first, so a conflict is
    /// blamed on the later one.
    pub constraints: Vec<Constraint>,
    /// Type of each expression and declaration node, before solving.
    pub nodes: HashMap<NodeId, StaticType>,
    /// Declared type of each declaration that was referenced or visited.
    pub pattern_types: HashMap<NodeId, StaticType>,
    generator: TypeVariableGenerator,
}

impl UnificationContext {
    pub fn node_type(&self, id: NodeId) -> Option<&StaticType> {
        self.nodes.get(&id)
    }

    pub fn pattern_type(&self, id: NodeId) -> Option<&StaticType> {
        self.pattern_types.get(&id)
    }

    pub fn fresh(&mut self) -> StaticType {
        self.generator.fresh()
    }
}

struct Checker<'a, 's> {
    scope: &'s Scope,
    index: &'s NodeIndex<'a>,
    context: UnificationContext,
    return_types: Vec<StaticType>,
    /// Types the next visit of a node must agree with, e.g. conditions.
    expected: HashMap<NodeId, StaticType>,
}

impl<'a> Checker<'a, '_> {
    fn fresh(&mut self) -> StaticType {
        self.context.generator.fresh()
    }

    fn constrain(&mut self, head: StaticType, tail: StaticType, origin: NodeId) {
        self.context
            .constraints
            .push(Constraint::new(head, tail, origin));
    }

    fn type_of(&mut self, node: &Node<'_>) -> StaticType {
        match self.context.nodes.get(&node.id) {
            Some(ty) => ty.clone(),
            None => {
                let ty = self.fresh();
                self.context.nodes.insert(node.id, ty.clone());
                ty
            }
        }
    }

    fn generics(generic_parameters: &[&Node<'_>]) -> Vec<StaticType> {
        generic_parameters
            .iter()
            .filter_map(|generic| generic.declared_name().map(StaticType::generic))
            .collect()
    }

    /// Type written in an annotation.
    fn annotation_type(&mut self, annotation: &'a Node<'a>) -> StaticType {
        match annotation.kind {
            NodeKind::TypeIdentifier { name, arguments } => {
                let parameters = arguments
                    .iter()
                    .map(|argument| self.annotation_type(argument))
                    .collect();
                let declaration = self
                    .scope
                    .resolve_type(annotation.id)
                    .and_then(|id| self.index.get(id));
                match declaration.map(|node| node.kind) {
                    Some(NodeKind::GenericParameter { name }) => StaticType::generic(name),
                    Some(NodeKind::Record { name, .. } | NodeKind::Enumeration { name, .. }) => {
                        StaticType::generic_constant(name, parameters)
                    }
                    Some(_) => self.fresh(),
                    // Unknown names stay nominal, so `Unit` works without a declaration.
                    None => StaticType::generic_constant(name, parameters),
                }
            }
            NodeKind::FunctionType {
                arguments,
                return_type,
            } => StaticType::function(
                arguments
                    .iter()
                    .map(|argument| FunctionArgument::unlabeled(self.annotation_type(argument)))
                    .collect(),
                self.annotation_type(return_type),
            ),
            _ => self.fresh(),
        }
    }

    /// Declared type of a declaration, computed on first use.
    fn pattern_type(&mut self, declaration: &'a Node<'a>) -> StaticType {
        if let Some(ty) = self.context.pattern_types.get(&declaration.id) {
            return ty.clone();
        }
        let ty = match declaration.kind {
            NodeKind::Function {
                parameters,
                return_type,
                ..
            } => {
                let arguments = parameters
                    .iter()
                    .map(|&parameter| {
                        let ty = self.pattern_type(parameter);
                        match parameter.declared_name() {
                            Some(name) => FunctionArgument::labeled(name, ty),
                            None => FunctionArgument::unlabeled(ty),
                        }
                    })
                    .collect();
                StaticType::function(arguments, self.annotation_type(return_type))
            }
            NodeKind::Record {
                name,
                generic_parameters,
                declarations,
            } => {
                let fields = declarations
                    .iter()
                    .filter(|field| matches!(field.kind, NodeKind::Variable { .. }))
                    .map(|&field| {
                        let ty = self.pattern_type(field);
                        match field.declared_name() {
                            Some(name) => FunctionArgument::labeled(name, ty),
                            None => FunctionArgument::unlabeled(ty),
                        }
                    })
                    .collect();
                StaticType::function(
                    fields,
                    StaticType::generic_constant(name, Self::generics(generic_parameters)),
                )
            }
            NodeKind::Enumeration {
                name,
                generic_parameters,
                ..
            } => StaticType::generic_constant(name, Self::generics(generic_parameters)),
            NodeKind::EnumerationCase {
                associated_values, ..
            } => {
                let enumeration = match self.index.parent(declaration.id) {
                    Some(parent) => self.pattern_type(parent),
                    None => self.fresh(),
                };
                let arguments = associated_values
                    .iter()
                    .map(|value| FunctionArgument::unlabeled(self.annotation_type(value)))
                    .collect();
                StaticType::function(arguments, enumeration)
            }
            NodeKind::Parameter { annotation, .. } => self.annotation_type(annotation),
            NodeKind::Variable {
                annotation: Some(annotation),
                ..
            } => self.annotation_type(annotation),
            NodeKind::GenericParameter { name } => StaticType::generic(name),
            _ => self.fresh(),
        };
        self.context
            .pattern_types
            .insert(declaration.id, ty.clone());
        ty
    }

    /// Type of a reference to `declaration`, instantiating its generics.
    fn reference_type(&mut self, reference: &Node<'_>) -> StaticType {
        let declaration = self
            .scope
            .resolve(reference.id)
            .and_then(|id| self.index.get(id));
        let Some(declaration) = declaration else {
            return self.fresh();
        };
        let ty = self.pattern_type(declaration);
        let polymorphic = matches!(
            declaration.kind,
            NodeKind::Function { .. } | NodeKind::Record { .. } | NodeKind::EnumerationCase { .. }
        );
        if !polymorphic || !ty.has_generics() {
            return ty;
        }
        let replacements: HashMap<EcoString, StaticType> = ty
            .generic_names()
            .into_iter()
            .map(|name| (name, self.fresh()))
            .collect();
        ty.replace_generics(&replacements)
    }

    fn literal_type(&mut self, node: &'a Node<'a>, literal: Literal<'a>) -> StaticType {
        match literal {
            Literal::None => StaticType::unit(),
            Literal::Boolean(_) => StaticType::boolean(),
            Literal::Number(_) => StaticType::number(),
            Literal::String(_) => StaticType::string(),
            Literal::Color(_) => StaticType::color(),
            Literal::Array(elements) => {
                let element = self.fresh();
                for item in elements {
                    let item_type = self.type_of(item);
                    self.constrain(element.clone(), item_type, node.id);
                }
                StaticType::array(element)
            }
        }
    }

    fn call_type(
        &mut self,
        node: &'a Node<'a>,
        callee: &'a Node<'a>,
        arguments: &'a [&'a Node<'a>],
    ) -> StaticType {
        let return_type = self.fresh();
        let callee_type = self.type_of(callee);

        let labeled: Vec<(Option<&str>, &'a Node<'a>)> = arguments
            .iter()
            .map(|argument| match argument.kind {
                NodeKind::Argument { label, .. } => (label, *argument),
                _ => (None, *argument),
            })
            .collect();

        let slots = self
            .scope
            .resolve(callee.id)
            .and_then(|id| self.index.get(id))
            .and_then(|declaration| declaration.parameter_slots());
        let aligned = slots.and_then(|slots| {
            let aligned = align(&slots, labeled.iter().copied()).ok()?;
            let complete = aligned
                .iter()
                .zip(&slots)
                .all(|(argument, slot)| argument.is_some() || slot.has_default);
            complete.then(|| {
                slots
                    .iter()
                    .zip(aligned)
                    .map(|(slot, argument)| (Some(slot.name), argument))
                    .collect::<Vec<_>>()
            })
        });
        // A missing required argument leaves the raw list, so the arity
        // mismatch surfaces during unification.
        let arguments: Vec<(Option<&str>, Option<&'a Node<'a>>)> = match aligned {
            Some(aligned) => aligned,
            None => labeled
                .into_iter()
                .map(|(label, argument)| (label, Some(argument)))
                .collect(),
        };

        let mut placeholder_arguments = Vec::with_capacity(arguments.len());
        let mut argument_constraints = Vec::new();
        for (label, argument) in arguments {
            let slot = self.fresh();
            if let Some(argument) = argument {
                let argument_type = self.type_of(argument);
                argument_constraints.push(Constraint::new(
                    slot.clone(),
                    argument_type,
                    argument.id,
                ));
            }
            placeholder_arguments.push(FunctionArgument {
                label: label.map(EcoString::from),
                ty: slot,
            });
        }

        let placeholder = StaticType::function(placeholder_arguments, return_type.clone());
        self.constrain(callee_type, placeholder, node.id);
        self.context.constraints.extend(argument_constraints);
        return_type
    }

    fn binary_type(
        &mut self,
        node: &'a Node<'a>,
        op: BinaryOp,
        left: &'a Node<'a>,
        right: &'a Node<'a>,
    ) -> StaticType {
        let left_type = self.type_of(left);
        let right_type = self.type_of(right);
        match op {
            _ if op.is_arithmetic() => {
                self.constrain(StaticType::number(), left_type, node.id);
                self.constrain(StaticType::number(), right_type, node.id);
                StaticType::number()
            }
            _ if op.is_ordering() => {
                self.constrain(StaticType::number(), left_type, node.id);
                self.constrain(StaticType::number(), right_type, node.id);
                StaticType::boolean()
            }
            BinaryOp::IsEqualTo | BinaryOp::IsNotEqualTo => {
                self.constrain(left_type, right_type, node.id);
                StaticType::boolean()
            }
            _ => {
                self.constrain(StaticType::boolean(), left_type, node.id);
                self.constrain(StaticType::boolean(), right_type, node.id);
                StaticType::boolean()
            }
        }
    }
}

impl<'a> Visitor<'a> for Checker<'a, '_> {
    type Error = Infallible;

    fn enter(&mut self, node: &'a Node<'a>) -> Result<Traversal, Infallible> {
        match node.kind {
            NodeKind::Function { .. } => {
                let expected = match self.pattern_type(node) {
                    StaticType::Function { return_type, .. } => *return_type,
                    _ => self.fresh(),
                };
                self.return_types.push(expected);
            }
            NodeKind::Record { .. } | NodeKind::Enumeration { .. } => {
                self.pattern_type(node);
            }
            NodeKind::Branch { condition, .. } | NodeKind::Loop { condition, .. } => {
                self.expected.insert(condition.id, StaticType::boolean());
            }
            NodeKind::Member { .. }
            | NodeKind::EnumerationCase { .. }
            | NodeKind::TypeIdentifier { .. }
            | NodeKind::FunctionType { .. } => return Ok(Traversal::SkipChildren),
            _ => {}
        }
        Ok(Traversal::Continue)
    }

    fn leave(&mut self, node: &'a Node<'a>) -> Result<(), Infallible> {
        let ty = match node.kind {
            NodeKind::Literal(literal) => Some(self.literal_type(node, literal)),
            NodeKind::Identifier { .. } | NodeKind::Member { .. } => {
                Some(self.reference_type(node))
            }
            NodeKind::Call { callee, arguments } => Some(self.call_type(node, callee, arguments)),
            NodeKind::Argument { expression, .. }
            | NodeKind::ExpressionStatement { expression } => Some(self.type_of(expression)),
            NodeKind::Placeholder => Some(self.fresh()),
            NodeKind::Binary { op, left, right } => Some(self.binary_type(node, op, left, right)),
            NodeKind::Assignment { target, value } => {
                let target_type = self.type_of(target);
                let value_type = self.type_of(value);
                self.constrain(target_type, value_type, node.id);
                Some(StaticType::unit())
            }
            NodeKind::Function { .. } => {
                self.return_types.pop();
                Some(self.pattern_type(node))
            }
            NodeKind::Record { .. }
            | NodeKind::Enumeration { .. }
            | NodeKind::EnumerationCase { .. } => Some(self.pattern_type(node)),
            NodeKind::Variable { initializer, .. } => {
                let declared = self.pattern_type(node);
                if let Some(initializer) = initializer {
                    let initializer_type = self.type_of(initializer);
                    self.constrain(declared.clone(), initializer_type, node.id);
                }
                Some(declared)
            }
            NodeKind::Parameter { default_value, .. } => {
                let declared = self.pattern_type(node);
                if let Some(default_value) = default_value {
                    let default_type = self.type_of(default_value);
                    self.constrain(declared.clone(), default_type, node.id);
                }
                Some(declared)
            }
            NodeKind::Return { expression } => {
                let returned = match expression {
                    Some(expression) => self.type_of(expression),
                    None => StaticType::unit(),
                };
                if let Some(expected) = self.return_types.last().cloned() {
                    self.constrain(expected, returned, node.id);
                }
                Some(StaticType::unit())
            }
            NodeKind::Branch { .. } | NodeKind::Loop { .. } => Some(StaticType::unit()),
            NodeKind::Program { .. }
            | NodeKind::Namespace { .. }
            | NodeKind::Import { .. }
            | NodeKind::GenericParameter { .. }
            | NodeKind::TypeIdentifier { .. }
            | NodeKind::FunctionType { .. } => None,
        };

        if let Some(ty) = ty {
            if let Some(expected) = self.expected.remove(&node.id) {
                self.constrain(expected, ty.clone(), node.id);
            }
            self.context.nodes.insert(node.id, ty);
        }
        Ok(())
    }
}

/// Generates the constraints and per-node types for `root`.
pub fn make_unification_context<'a>(
    root: &'a Node<'a>,
    scope: &Scope,
    index: &NodeIndex<'a>,
    generator: TypeVariableGenerator,
) -> UnificationContext {
    let mut checker = Checker {
        scope,
        index,
        context: UnificationContext {
            generator,
            ..UnificationContext::default()
        },
        return_types: Vec::new(),
        expected: HashMap::new(),
    };
    walk_infallible(&mut checker, root);
    tracing::debug!(
        constraints = checker.context.constraints.len(),
        nodes = checker.context.nodes.len(),
        "constraints generated"
    );
    checker.context
}

#[cfg(test)]
#[path = "checker_test.rs"]
mod checker_test;
