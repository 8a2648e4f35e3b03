//! Configuration options for the Logic engine.

use crate::types::MAX_SUBSTITUTION_PASSES;

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use logic_core::api::CompilationOptions;
///
/// let options = CompilationOptions {
///     type_variable_prefix: "t".into(),
///     ..CompilationOptions::default()
/// };
/// assert_eq!(options.max_substitution_passes, 32);
/// ```
#[derive(Debug, Clone)]
pub struct CompilationOptions {
    /// Prefix of generated type variable names.
    ///
    /// Default: `"?"`
    pub type_variable_prefix: String,

    /// Upper bound on substitution passes when resolving a node's type.
    ///
    /// Default: 32
    pub max_substitution_passes: usize,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            type_variable_prefix: "?".into(),
            max_substitution_passes: MAX_SUBSTITUTION_PASSES,
        }
    }
}

/// Configuration options for evaluation.
///
/// These options control resource limits during evaluation.
///
/// # Example
///
/// ```
/// use logic_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_depth: 128,
///     max_iterations: Some(10_000),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Maximum number of nested thunk materializations (recursion protection).
    ///
    /// Default: 512
    pub max_depth: usize,

    /// Maximum number of iterations of a single loop (if Some).
    ///
    /// Default: None
    pub max_iterations: Option<usize>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_iterations: None,
        }
    }
}

/// Configuration options for the Logic engine.
///
/// These options set the defaults for compilation and evaluation, which can be
/// overridden per compilation.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Default options for compilation.
    pub default_compilation_options: CompilationOptions,

    /// Default options for evaluation.
    pub default_execution_options: ExecutionOptions,
}
