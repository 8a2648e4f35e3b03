//! Public API for the Logic front-end.
//!
//! An [`Engine`] takes decoded program trees, runs namespace building, scope
//! resolution, type inference and evaluator setup, and hands back a
//! [`Compilation`] from which types and values can be queried.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use logic_core::api::{Engine, EngineOptions};
//! use logic_core::diagnostics::CollectingReporter;
//! use logic_core::syntax::{BinaryOp, TreeBuilder};
//! use logic_core::types::StaticType;
//!
//! let arena = Bump::new();
//! let reporter = CollectingReporter::new();
//! let b = TreeBuilder::new(&arena);
//! let sum = b.variable(
//!     "sum",
//!     None,
//!     Some(b.binary(BinaryOp::Add, b.number(40.0), b.number(2.0))),
//! );
//! let program = b.program(&[sum]);
//!
//! let engine = Engine::new(EngineOptions::default());
//! let compilation = engine.compile_with_prelude(&arena, &[program], &reporter).unwrap();
//!
//! assert_eq!(compilation.resolved_type(sum.id), Some(StaticType::number()));
//! assert_eq!(compilation.evaluate_path("sum").unwrap().to_string(), "42");
//! assert!(!reporter.has_errors());
//! ```

pub mod compilation;
pub mod engine;
pub mod error;
pub mod options;

pub use compilation::Compilation;
pub use engine::Engine;
pub use error::Error;
pub use options::{CompilationOptions, EngineOptions, ExecutionOptions};
