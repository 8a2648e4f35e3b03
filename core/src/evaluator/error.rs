//! Runtime evaluation errors.
//!
//! None of these abort a compilation. The evaluation context reports them
//! through the diagnostics sink and the failing node (and everything that
//! depends on it) evaluates to nothing.

use ecow::EcoString;
use thiserror::Error;

use crate::syntax::{AlignmentError, BinaryOp, NodeId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// Node has neither a value nor a thunk, e.g. an unresolved reference.
    #[error("no value for node {0}")]
    MissingValue(NodeId),

    #[error("cycle detected while evaluating node {0}")]
    Cycle(NodeId),

    #[error("evaluation depth {depth} exceeds maximum of {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    #[error("loop exceeded {limit} iterations")]
    IterationLimit { limit: usize },

    #[error("condition evaluated to {0}, expected a boolean")]
    NotABoolean(String),

    #[error("missing argument `{0}`")]
    MissingArgument(EcoString),

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] AlignmentError),

    #[error("invalid arguments to builtin `{0}`")]
    InvalidBuiltinArguments(EcoString),

    #[error("index {index} out of bounds (length: {len})")]
    IndexOutOfBounds { index: f64, len: usize },

    /// Range bound that is not finite or cannot be stepped by one.
    #[error("cannot build a range from {from} to {to}")]
    InvalidRange { from: f64, to: f64 },

    #[error("range of {length} numbers exceeds the limit of {limit}")]
    RangeTooLong { length: f64, limit: usize },

    #[error("assignment {0} does not target a declaration")]
    UnboundAssignment(NodeId),

    #[error("division by zero")]
    DivisionByZero,

    #[error("operator `{op}` cannot be applied to {left} and {right}")]
    InvalidOperands {
        op: BinaryOp,
        left: String,
        right: String,
    },

    #[error("{0} is not callable")]
    NotCallable(String),
}
