//! Arena-backed construction of syntax trees.

use bumpalo::Bump;
use thiserror::Error;
use uuid::Uuid;

use super::{BinaryOp, Literal, Node, NodeId, NodeKind};

/// Structural problems that make a tree unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("node id {0} appears more than once in the tree")]
    DuplicateNodeId(NodeId),

    #[error("expected a program node at the root, found {0}")]
    NotAProgram(&'static str),
}

/// Allocates nodes into a shared arena and assigns fresh ids.
///
/// The builder is what an external decoder (and every test) uses to hand the
/// compiler a tree. All returned references live as long as the arena.
#[derive(Clone, Copy)]
pub struct TreeBuilder<'a> {
    arena: &'a Bump,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    /// Allocates a node with a fresh v4 id.
    pub fn node(&self, kind: NodeKind<'a>) -> &'a Node<'a> {
        self.node_with_id(Uuid::new_v4(), kind)
    }

    /// Allocates a node with a caller-chosen id, as decoders do when the
    /// serialized tree already carries ids.
    pub fn node_with_id(&self, id: NodeId, kind: NodeKind<'a>) -> &'a Node<'a> {
        self.arena.alloc(Node { id, kind })
    }

    fn str(&self, s: &str) -> &'a str {
        self.arena.alloc_str(s)
    }

    fn list(&self, nodes: &[&'a Node<'a>]) -> &'a [&'a Node<'a>] {
        self.arena.alloc_slice_copy(nodes)
    }

    // Declarations.

    pub fn program(&self, declarations: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.node(NodeKind::Program {
            declarations: self.list(declarations),
        })
    }

    pub fn namespace(&self, name: &str, declarations: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.node(NodeKind::Namespace {
            name: self.str(name),
            declarations: self.list(declarations),
        })
    }

    pub fn import(&self, name: &str) -> &'a Node<'a> {
        self.node(NodeKind::Import {
            name: self.str(name),
        })
    }

    pub fn function(
        &self,
        name: &str,
        parameters: &[&'a Node<'a>],
        return_type: &'a Node<'a>,
        body: &[&'a Node<'a>],
    ) -> &'a Node<'a> {
        self.generic_function(name, &[], parameters, return_type, body)
    }

    pub fn generic_function(
        &self,
        name: &str,
        generic_parameters: &[&str],
        parameters: &[&'a Node<'a>],
        return_type: &'a Node<'a>,
        body: &[&'a Node<'a>],
    ) -> &'a Node<'a> {
        self.node(NodeKind::Function {
            name: self.str(name),
            generic_parameters: self.generics(generic_parameters),
            parameters: self.list(parameters),
            return_type,
            body: self.list(body),
        })
    }

    pub fn parameter(&self, name: &str, annotation: &'a Node<'a>) -> &'a Node<'a> {
        self.node(NodeKind::Parameter {
            name: self.str(name),
            annotation,
            default_value: None,
        })
    }

    pub fn parameter_with_default(
        &self,
        name: &str,
        annotation: &'a Node<'a>,
        default_value: &'a Node<'a>,
    ) -> &'a Node<'a> {
        self.node(NodeKind::Parameter {
            name: self.str(name),
            annotation,
            default_value: Some(default_value),
        })
    }

    pub fn generic_parameter(&self, name: &str) -> &'a Node<'a> {
        self.node(NodeKind::GenericParameter {
            name: self.str(name),
        })
    }

    fn generics(&self, names: &[&str]) -> &'a [&'a Node<'a>] {
        self.arena
            .alloc_slice_fill_iter(names.iter().map(|name| self.generic_parameter(name)))
    }

    pub fn record(&self, name: &str, fields: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.generic_record(name, &[], fields)
    }

    pub fn generic_record(
        &self,
        name: &str,
        generic_parameters: &[&str],
        fields: &[&'a Node<'a>],
    ) -> &'a Node<'a> {
        self.node(NodeKind::Record {
            name: self.str(name),
            generic_parameters: self.generics(generic_parameters),
            declarations: self.list(fields),
        })
    }

    pub fn enumeration(&self, name: &str, cases: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.generic_enumeration(name, &[], cases)
    }

    pub fn generic_enumeration(
        &self,
        name: &str,
        generic_parameters: &[&str],
        cases: &[&'a Node<'a>],
    ) -> &'a Node<'a> {
        self.node(NodeKind::Enumeration {
            name: self.str(name),
            generic_parameters: self.generics(generic_parameters),
            cases: self.list(cases),
        })
    }

    pub fn case(&self, name: &str, associated_values: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.node(NodeKind::EnumerationCase {
            name: self.str(name),
            associated_values: self.list(associated_values),
        })
    }

    pub fn variable(
        &self,
        name: &str,
        annotation: Option<&'a Node<'a>>,
        initializer: Option<&'a Node<'a>>,
    ) -> &'a Node<'a> {
        self.node(NodeKind::Variable {
            name: self.str(name),
            annotation,
            initializer,
        })
    }

    // Statements.

    pub fn branch(&self, condition: &'a Node<'a>, block: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.node(NodeKind::Branch {
            condition,
            block: self.list(block),
        })
    }

    pub fn while_loop(&self, condition: &'a Node<'a>, block: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.node(NodeKind::Loop {
            condition,
            block: self.list(block),
        })
    }

    pub fn return_statement(&self, expression: Option<&'a Node<'a>>) -> &'a Node<'a> {
        self.node(NodeKind::Return { expression })
    }

    pub fn expression_statement(&self, expression: &'a Node<'a>) -> &'a Node<'a> {
        self.node(NodeKind::ExpressionStatement { expression })
    }

    // Expressions.

    pub fn identifier(&self, name: &str) -> &'a Node<'a> {
        self.node(NodeKind::Identifier {
            name: self.str(name),
        })
    }

    pub fn member(&self, object: &'a Node<'a>, member: &str) -> &'a Node<'a> {
        self.node(NodeKind::Member {
            object,
            member: self.str(member),
        })
    }

    /// Builds `A.B.C` as nested member expressions over an identifier.
    ///
    /// A path without dots is a plain identifier.
    pub fn dotted(&self, path: &str) -> &'a Node<'a> {
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or_default();
        segments.fold(self.identifier(head), |object, member| {
            self.member(object, member)
        })
    }

    pub fn call(&self, callee: &'a Node<'a>, arguments: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.node(NodeKind::Call {
            callee,
            arguments: self.list(arguments),
        })
    }

    pub fn argument(&self, label: Option<&str>, expression: &'a Node<'a>) -> &'a Node<'a> {
        self.node(NodeKind::Argument {
            label: label.map(|label| self.str(label)),
            expression,
        })
    }

    pub fn placeholder(&self) -> &'a Node<'a> {
        self.node(NodeKind::Placeholder)
    }

    pub fn binary(&self, op: BinaryOp, left: &'a Node<'a>, right: &'a Node<'a>) -> &'a Node<'a> {
        self.node(NodeKind::Binary { op, left, right })
    }

    pub fn assign(&self, target: &'a Node<'a>, value: &'a Node<'a>) -> &'a Node<'a> {
        self.node(NodeKind::Assignment { target, value })
    }

    pub fn none(&self) -> &'a Node<'a> {
        self.node(NodeKind::Literal(Literal::None))
    }

    pub fn boolean(&self, value: bool) -> &'a Node<'a> {
        self.node(NodeKind::Literal(Literal::Boolean(value)))
    }

    pub fn number(&self, value: f64) -> &'a Node<'a> {
        self.node(NodeKind::Literal(Literal::Number(value)))
    }

    pub fn string(&self, value: &str) -> &'a Node<'a> {
        self.node(NodeKind::Literal(Literal::String(self.str(value))))
    }

    pub fn color(&self, value: &str) -> &'a Node<'a> {
        self.node(NodeKind::Literal(Literal::Color(self.str(value))))
    }

    pub fn array(&self, elements: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.node(NodeKind::Literal(Literal::Array(self.list(elements))))
    }

    // Type annotations.

    pub fn type_identifier(&self, name: &str) -> &'a Node<'a> {
        self.generic_type(name, &[])
    }

    pub fn generic_type(&self, name: &str, arguments: &[&'a Node<'a>]) -> &'a Node<'a> {
        self.node(NodeKind::TypeIdentifier {
            name: self.str(name),
            arguments: self.list(arguments),
        })
    }

    pub fn function_type(
        &self,
        arguments: &[&'a Node<'a>],
        return_type: &'a Node<'a>,
    ) -> &'a Node<'a> {
        self.node(NodeKind::FunctionType {
            arguments: self.list(arguments),
            return_type,
        })
    }
}

/// Joins several programs (prelude first) into a single program node.
///
/// Top-level declarations keep their order. Non-program inputs are rejected.
pub fn join_programs<'a>(
    arena: &'a Bump,
    programs: &[&'a Node<'a>],
) -> Result<&'a Node<'a>, SyntaxError> {
    let mut declarations = Vec::new();
    for program in programs {
        match program.kind {
            NodeKind::Program {
                declarations: inner,
            } => declarations.extend_from_slice(inner),
            other => return Err(SyntaxError::NotAProgram(kind_name(&other))),
        }
    }
    Ok(TreeBuilder::new(arena).program(&declarations))
}

pub(crate) fn kind_name(kind: &NodeKind<'_>) -> &'static str {
    match kind {
        NodeKind::Program { .. } => "program",
        NodeKind::Namespace { .. } => "namespace",
        NodeKind::Import { .. } => "import",
        NodeKind::Function { .. } => "function",
        NodeKind::Parameter { .. } => "parameter",
        NodeKind::GenericParameter { .. } => "generic parameter",
        NodeKind::Record { .. } => "record",
        NodeKind::Enumeration { .. } => "enumeration",
        NodeKind::EnumerationCase { .. } => "enumeration case",
        NodeKind::Variable { .. } => "variable",
        NodeKind::Branch { .. } => "branch",
        NodeKind::Loop { .. } => "loop",
        NodeKind::Return { .. } => "return",
        NodeKind::ExpressionStatement { .. } => "expression statement",
        NodeKind::Identifier { .. } => "identifier",
        NodeKind::Member { .. } => "member expression",
        NodeKind::Call { .. } => "call",
        NodeKind::Argument { .. } => "argument",
        NodeKind::Placeholder => "placeholder",
        NodeKind::Binary { .. } => "binary expression",
        NodeKind::Assignment { .. } => "assignment",
        NodeKind::Literal(_) => "literal",
        NodeKind::TypeIdentifier { .. } => "type identifier",
        NodeKind::FunctionType { .. } => "function type",
    }
}
