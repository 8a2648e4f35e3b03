//! Public error type for the Logic API.
//!
//! Only problems that make a compilation meaningless are errors. Unresolved
//! names, type mismatches and evaluation failures are reported through the
//! [`Reporter`](crate::diagnostics::Reporter) instead and never abort.

use thiserror::Error;

use crate::namespace::NamespaceError;
use crate::scope_stack::PopError;
use crate::syntax::SyntaxError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two declarations share a qualified name.
    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    /// The input trees are malformed (duplicate ids, non-program roots).
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Scope frames did not balance while resolving names.
    #[error("scope resolution failed: {0}")]
    Scope(#[from] PopError),
}
