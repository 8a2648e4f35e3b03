//! Callable values.

use core::fmt;
use std::rc::Rc;

use ecow::{EcoString, EcoVec};

use super::Value;
use crate::evaluator::EvaluationError;
use crate::syntax::NodeId;

/// Arguments as written at a call site, optionally labeled.
///
/// A placeholder (`_`) keeps its position but carries no value, so the
/// callee falls back to the default for that slot.
pub type CallArguments<'a> = Vec<(Option<EcoString>, Option<Value<'a>>)>;

/// Signature of natively implemented builtins.
///
/// Builtins take positional arguments in declaration order.
pub type NativeFn = for<'v> fn(&[Value<'v>]) -> Result<Value<'v>, EvaluationError>;

/// A user-defined function that can be invoked.
///
/// Implemented by the evaluator's closures, which carry their defining
/// context.
pub trait Function<'a> {
    fn call(&self, arguments: CallArguments<'a>) -> Result<Value<'a>, EvaluationError>;

    /// Qualified name, for display.
    fn name(&self) -> &str;
}

#[derive(Clone)]
pub enum FunctionMemory<'a> {
    /// Native implementation bound by qualified path (`Number.add`).
    Builtin {
        path: EcoString,
        implementation: NativeFn,
    },
    Closure(Rc<dyn Function<'a> + 'a>),
    /// Record constructor, with the default value of each field in
    /// declaration order.
    RecordInit {
        record: NodeId,
        fields: EcoVec<(EcoString, Option<Value<'a>>)>,
    },
    /// Enumeration case constructor.
    EnumInit { case: EcoString },
}

impl fmt::Debug for FunctionMemory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionMemory::Builtin { path, .. } => f.debug_tuple("Builtin").field(path).finish(),
            FunctionMemory::Closure(closure) => {
                f.debug_tuple("Closure").field(&closure.name()).finish()
            }
            FunctionMemory::RecordInit { record, fields } => f
                .debug_struct("RecordInit")
                .field("record", record)
                .field("fields", fields)
                .finish(),
            FunctionMemory::EnumInit { case } => {
                f.debug_struct("EnumInit").field("case", case).finish()
            }
        }
    }
}

impl PartialEq for FunctionMemory<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionMemory::Builtin { path: a, .. }, FunctionMemory::Builtin { path: b, .. }) => {
                a == b
            }
            (FunctionMemory::Closure(a), FunctionMemory::Closure(b)) => {
                core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (
                FunctionMemory::RecordInit { record: a, .. },
                FunctionMemory::RecordInit { record: b, .. },
            ) => a == b,
            (FunctionMemory::EnumInit { case: a }, FunctionMemory::EnumInit { case: b }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for FunctionMemory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionMemory::Builtin { path, .. } => write!(f, "<builtin {path}>"),
            FunctionMemory::Closure(closure) => write!(f, "<function {}>", closure.name()),
            FunctionMemory::RecordInit { .. } => write!(f, "<record constructor>"),
            FunctionMemory::EnumInit { case } => write!(f, "<case {case}>"),
        }
    }
}
