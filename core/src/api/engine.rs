//! The Logic compilation engine.

use bumpalo::Bump;
use tracing::debug;

use super::{CompilationOptions, EngineOptions, Error, ExecutionOptions};
use crate::api::Compilation;
use crate::diagnostics::Reporter;
use crate::evaluator;
use crate::namespace::build_namespace;
use crate::scope::build_scope;
use crate::stdlib::standard_library;
use crate::syntax::{Node, NodeIndex, TreeBuilder, join_programs};
use crate::types::{TypeVariableGenerator, Unifier, make_unification_context};

/// Runs every front-end pass over a set of programs.
///
/// # Lifetimes
///
/// - `'a`: lifetime of the arena holding the syntax trees and of the
///   diagnostics sink. Every [`Compilation`] borrows from both.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use logic_core::api::{Engine, EngineOptions};
/// use logic_core::diagnostics::SilentReporter;
/// use logic_core::syntax::TreeBuilder;
/// use logic_core::values::Value;
///
/// let arena = Bump::new();
/// let b = TreeBuilder::new(&arena);
/// let answer = b.variable("answer", None, Some(b.number(42.0)));
/// let program = b.program(&[answer]);
///
/// let engine = Engine::new(EngineOptions::default());
/// let compilation = engine.compile(&arena, &[program], &SilentReporter).unwrap();
/// assert_eq!(compilation.evaluate(answer.id), Some(Value::number(42.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: EngineOptions,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Compile `programs` with the engine's default options.
    pub fn compile<'a>(
        &self,
        arena: &'a Bump,
        programs: &[&'a Node<'a>],
        reporter: &'a dyn Reporter,
    ) -> Result<Compilation<'a>, Error> {
        self.compile_with_options(
            arena,
            programs,
            reporter,
            self.options.default_compilation_options.clone(),
            self.options.default_execution_options.clone(),
        )
    }

    /// Compile `programs` after the standard library prelude.
    pub fn compile_with_prelude<'a>(
        &self,
        arena: &'a Bump,
        programs: &[&'a Node<'a>],
        reporter: &'a dyn Reporter,
    ) -> Result<Compilation<'a>, Error> {
        let mut all = Vec::with_capacity(programs.len() + 1);
        all.push(standard_library(&TreeBuilder::new(arena)));
        all.extend_from_slice(programs);
        self.compile(arena, &all, reporter)
    }

    /// Compile `programs` with explicit options.
    ///
    /// The programs are joined in order into one tree; a prelude, if any,
    /// goes first.
    pub fn compile_with_options<'a>(
        &self,
        arena: &'a Bump,
        programs: &[&'a Node<'a>],
        reporter: &'a dyn Reporter,
        compilation_options: CompilationOptions,
        execution_options: ExecutionOptions,
    ) -> Result<Compilation<'a>, Error> {
        let root = join_programs(arena, programs)?;
        let index = NodeIndex::build(root)?;
        let namespace = build_namespace(root)?;
        let scope = build_scope(root, &namespace, None, reporter)?;

        let prefix = compilation_options.type_variable_prefix.as_str();
        let generator = TypeVariableGenerator::new(prefix);
        let unification = make_unification_context(root, &scope, &index, generator);
        let mut unifier = Unifier::new(reporter);
        unifier.solve(unification.constraints.iter().cloned());
        let unification_errors = unifier.errors().to_vec();
        let substitution = unifier.finish();
        debug!(
            nodes = index.len(),
            errors = unification_errors.len(),
            "types solved"
        );

        let context = evaluator::evaluate(
            root,
            &scope,
            &unification,
            &substitution,
            reporter,
            execution_options,
        );

        Ok(Compilation {
            root,
            index,
            namespace,
            scope,
            unification,
            substitution,
            unification_errors,
            context,
            options: compilation_options,
        })
    }
}
