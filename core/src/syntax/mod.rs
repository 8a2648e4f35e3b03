//! Decoded syntax tree for Logic programs.
//!
//! Trees are produced by an external decoder and handed to the compiler as an
//! immutable, arena-allocated structure. Every node carries a unique
//! [`NodeId`]; all later passes build side tables keyed by that id instead of
//! mutating the tree.
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use logic_core::syntax::{NodeKind, TreeBuilder};
//!
//! let arena = Bump::new();
//! let b = TreeBuilder::new(&arena);
//! let program = b.program(&[b.variable("answer", None, Some(b.number(42.0)))]);
//!
//! assert!(matches!(program.kind, NodeKind::Program { .. }));
//! ```

pub mod arguments;
mod builder;
mod index;
pub mod visit;

pub use arguments::{AlignmentError, ParameterSlot, align};
pub use builder::{SyntaxError, TreeBuilder, join_programs};
pub use index::NodeIndex;
pub use visit::{Traversal, Visitor, walk, walk_infallible};

use smallvec::SmallVec;
use uuid::Uuid;

/// Process-wide unique identifier of a syntax node.
pub type NodeId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<'a> {
    pub id: NodeId,
    pub kind: NodeKind<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind<'a> {
    // Declarations.
    Program {
        declarations: &'a [&'a Node<'a>],
    },
    Namespace {
        name: &'a str,
        declarations: &'a [&'a Node<'a>],
    },
    Import {
        name: &'a str,
    },
    Function {
        name: &'a str,
        generic_parameters: &'a [&'a Node<'a>],
        parameters: &'a [&'a Node<'a>],
        return_type: &'a Node<'a>,
        body: &'a [&'a Node<'a>],
    },
    Parameter {
        name: &'a str,
        annotation: &'a Node<'a>,
        default_value: Option<&'a Node<'a>>,
    },
    GenericParameter {
        name: &'a str,
    },
    Record {
        name: &'a str,
        generic_parameters: &'a [&'a Node<'a>],
        declarations: &'a [&'a Node<'a>],
    },
    Enumeration {
        name: &'a str,
        generic_parameters: &'a [&'a Node<'a>],
        cases: &'a [&'a Node<'a>],
    },
    EnumerationCase {
        name: &'a str,
        associated_values: &'a [&'a Node<'a>],
    },
    Variable {
        name: &'a str,
        annotation: Option<&'a Node<'a>>,
        initializer: Option<&'a Node<'a>>,
    },

    // Statements.
    Branch {
        condition: &'a Node<'a>,
        block: &'a [&'a Node<'a>],
    },
    Loop {
        condition: &'a Node<'a>,
        block: &'a [&'a Node<'a>],
    },
    Return {
        expression: Option<&'a Node<'a>>,
    },
    ExpressionStatement {
        expression: &'a Node<'a>,
    },

    // Expressions.
    Identifier {
        name: &'a str,
    },
    Member {
        object: &'a Node<'a>,
        member: &'a str,
    },
    Call {
        callee: &'a Node<'a>,
        arguments: &'a [&'a Node<'a>],
    },
    Argument {
        label: Option<&'a str>,
        expression: &'a Node<'a>,
    },
    Placeholder,
    Binary {
        op: BinaryOp,
        left: &'a Node<'a>,
        right: &'a Node<'a>,
    },
    Assignment {
        target: &'a Node<'a>,
        value: &'a Node<'a>,
    },
    Literal(Literal<'a>),

    // Type annotations.
    TypeIdentifier {
        name: &'a str,
        arguments: &'a [&'a Node<'a>],
    },
    FunctionType {
        arguments: &'a [&'a Node<'a>],
        return_type: &'a Node<'a>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    None,
    Boolean(bool),
    Number(f64),
    String(&'a str),
    Color(&'a str),
    Array(&'a [&'a Node<'a>]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    IsEqualTo,
    IsNotEqualTo,
    IsLessThan,
    IsGreaterThan,
    IsLessThanOrEqualTo,
    IsGreaterThanOrEqualTo,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide
        )
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOp::IsLessThan
                | BinaryOp::IsGreaterThan
                | BinaryOp::IsLessThanOrEqualTo
                | BinaryOp::IsGreaterThanOrEqualTo
        )
    }
}

impl core::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::IsEqualTo => "==",
            BinaryOp::IsNotEqualTo => "!=",
            BinaryOp::IsLessThan => "<",
            BinaryOp::IsGreaterThan => ">",
            BinaryOp::IsLessThanOrEqualTo => "<=",
            BinaryOp::IsGreaterThanOrEqualTo => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        };
        f.write_str(symbol)
    }
}

impl<'a> Node<'a> {
    /// Direct children in source order.
    pub fn children(&self) -> SmallVec<[&'a Node<'a>; 4]> {
        let mut children = SmallVec::new();
        match self.kind {
            NodeKind::Program { declarations } | NodeKind::Namespace { declarations, .. } => {
                children.extend_from_slice(declarations);
            }
            NodeKind::Import { .. }
            | NodeKind::GenericParameter { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Placeholder => {}
            NodeKind::Function {
                generic_parameters,
                parameters,
                return_type,
                body,
                ..
            } => {
                children.extend_from_slice(generic_parameters);
                children.extend_from_slice(parameters);
                children.push(return_type);
                children.extend_from_slice(body);
            }
            NodeKind::Parameter {
                annotation,
                default_value,
                ..
            } => {
                children.push(annotation);
                children.extend(default_value);
            }
            NodeKind::Record {
                generic_parameters,
                declarations,
                ..
            } => {
                children.extend_from_slice(generic_parameters);
                children.extend_from_slice(declarations);
            }
            NodeKind::Enumeration {
                generic_parameters,
                cases,
                ..
            } => {
                children.extend_from_slice(generic_parameters);
                children.extend_from_slice(cases);
            }
            NodeKind::EnumerationCase {
                associated_values, ..
            } => children.extend_from_slice(associated_values),
            NodeKind::Variable {
                annotation,
                initializer,
                ..
            } => {
                children.extend(annotation);
                children.extend(initializer);
            }
            NodeKind::Branch { condition, block } | NodeKind::Loop { condition, block } => {
                children.push(condition);
                children.extend_from_slice(block);
            }
            NodeKind::Return { expression } => children.extend(expression),
            NodeKind::ExpressionStatement { expression } => children.push(expression),
            NodeKind::Member { object, .. } => children.push(object),
            NodeKind::Call { callee, arguments } => {
                children.push(callee);
                children.extend_from_slice(arguments);
            }
            NodeKind::Argument { expression, .. } => children.push(expression),
            NodeKind::Binary { left, right, .. } => {
                children.push(left);
                children.push(right);
            }
            NodeKind::Assignment { target, value } => {
                children.push(target);
                children.push(value);
            }
            NodeKind::Literal(Literal::Array(elements)) => children.extend_from_slice(elements),
            NodeKind::Literal(_) => {}
            NodeKind::TypeIdentifier { arguments, .. } => children.extend_from_slice(arguments),
            NodeKind::FunctionType {
                arguments,
                return_type,
            } => {
                children.extend_from_slice(arguments);
                children.push(return_type);
            }
        }
        children
    }

    /// Name introduced by a declaration node, if any.
    pub fn declared_name(&self) -> Option<&'a str> {
        match self.kind {
            NodeKind::Namespace { name, .. }
            | NodeKind::Function { name, .. }
            | NodeKind::Parameter { name, .. }
            | NodeKind::GenericParameter { name }
            | NodeKind::Record { name, .. }
            | NodeKind::Enumeration { name, .. }
            | NodeKind::EnumerationCase { name, .. }
            | NodeKind::Variable { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Parameters a call to this declaration can name, in declaration order.
    ///
    /// Functions expose their parameters, records their fields. Other
    /// declarations (including enumeration cases) only take positional
    /// arguments and return `None`.
    pub fn parameter_slots(&self) -> Option<Vec<ParameterSlot<'a>>> {
        match self.kind {
            NodeKind::Function { parameters, .. } => Some(
                parameters
                    .iter()
                    .filter_map(|parameter| match parameter.kind {
                        NodeKind::Parameter {
                            name,
                            default_value,
                            ..
                        } => Some(ParameterSlot {
                            name,
                            has_default: default_value.is_some(),
                        }),
                        _ => None,
                    })
                    .collect(),
            ),
            NodeKind::Record { declarations, .. } => Some(
                declarations
                    .iter()
                    .filter_map(|field| match field.kind {
                        NodeKind::Variable {
                            name, initializer, ..
                        } => Some(ParameterSlot {
                            name,
                            has_default: initializer.is_some(),
                        }),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Flattens `A.B.C` member chains into a dotted path.
    ///
    /// Returns `None` when the chain bottoms out in anything other than an
    /// identifier.
    pub fn dotted_path(&self) -> Option<String> {
        match self.kind {
            NodeKind::Identifier { name } => Some(name.to_string()),
            NodeKind::Member { object, member } => {
                let mut path = object.dotted_path()?;
                path.push('.');
                path.push_str(member);
                Some(path)
            }
            _ => None,
        }
    }
}
