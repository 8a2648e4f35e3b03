//! Logic - front-end for a small declarative language
//!
//! # Overview
//!
//! Logic programs declare functions, records, enumerations and variables,
//! grouped into namespaces. This crate takes decoded syntax trees (a prelude
//! first, then user programs) and runs the whole front-end over them:
//!
//! - a **namespace** of every qualified declaration
//! - **scope** resolution of each reference to its declaration
//! - Hindley-Milner style **type inference**
//! - a **lazy evaluator** that computes values on demand
//!
//! Nothing is printed. Problems are reported through a
//! [`Reporter`](diagnostics::Reporter); only malformed input fails a
//! compilation outright.
//!
//! # Quick Start
//!
//! ```
//! use logic::{Engine, EngineOptions, Value};
//! use logic::diagnostics::CollectingReporter;
//! use logic::syntax::{BinaryOp, TreeBuilder};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let reporter = CollectingReporter::new();
//! let b = TreeBuilder::new(&arena);
//!
//! // function double(n: Number) -> Number { return n + n }
//! let double = b.function(
//!     "double",
//!     &[b.parameter("n", b.type_identifier("Number"))],
//!     b.type_identifier("Number"),
//!     &[b.return_statement(Some(b.binary(
//!         BinaryOp::Add,
//!         b.identifier("n"),
//!         b.identifier("n"),
//!     )))],
//! );
//! // var answer = double(21)
//! let answer = b.variable(
//!     "answer",
//!     None,
//!     Some(b.call(b.identifier("double"), &[b.argument(None, b.number(21.0))])),
//! );
//! let program = b.program(&[double, answer]);
//!
//! let engine = Engine::new(EngineOptions::default());
//! let compilation = engine.compile_with_prelude(&arena, &[program], &reporter).unwrap();
//!
//! assert_eq!(compilation.evaluate(answer.id), Some(Value::number(42.0)));
//! assert!(!reporter.has_errors());
//! ```

// Re-export public API from logic_core
pub use logic_core::api::{
    Compilation, CompilationOptions, Engine, EngineOptions, Error, ExecutionOptions,
};

pub use logic_core::diagnostics::{self, Diagnostic, Reporter, Severity};
pub use logic_core::namespace::{self, Namespace, NamespaceError};
pub use logic_core::scope::{self, Scope};
pub use logic_core::stdlib::standard_library;
pub use logic_core::syntax::{self, Node, NodeId, NodeKind, TreeBuilder};
pub use logic_core::types::{self, StaticType, UnificationError};
pub use logic_core::values::{self, Memory, Value};

// Re-export errors
pub use logic_core::evaluator::{self, EvaluationError};
