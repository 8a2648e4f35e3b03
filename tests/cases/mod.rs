//! Shared helpers for the integration tests.
#![allow(dead_code)]

use bumpalo::Bump;
use logic::diagnostics::CollectingReporter;
use logic::syntax::TreeBuilder;
use logic::{Compilation, Engine, EngineOptions, ExecutionOptions, Node};

/// Enables `tracing` output for a test (`RUST_LOG` overrides the level).
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// Compiles `programs` after the prelude with default options.
pub fn compile<'a>(
    arena: &'a Bump,
    programs: &[&'a Node<'a>],
    reporter: &'a CollectingReporter,
) -> Compilation<'a> {
    init_logging();
    Engine::new(EngineOptions::default())
        .compile_with_prelude(arena, programs, reporter)
        .unwrap()
}

/// Compiles `programs` after the prelude with custom limits.
pub fn compile_with_limits<'a>(
    arena: &'a Bump,
    programs: &[&'a Node<'a>],
    reporter: &'a CollectingReporter,
    execution: ExecutionOptions,
) -> Compilation<'a> {
    init_logging();
    let options = EngineOptions {
        default_execution_options: execution,
        ..EngineOptions::default()
    };
    Engine::new(options)
        .compile_with_prelude(arena, programs, reporter)
        .unwrap()
}

pub fn number<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    b.type_identifier("Number")
}

pub fn string<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    b.type_identifier("String")
}

/// Unlabeled arguments, in order.
pub fn positional<'a>(b: &TreeBuilder<'a>, values: &[&'a Node<'a>]) -> Vec<&'a Node<'a>> {
    values.iter().map(|&value| b.argument(None, value)).collect()
}

/// `function add(a: Number, b: Number) -> Number { return a + b }`
pub fn add_function<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    b.function(
        "add",
        &[b.parameter("a", number(b)), b.parameter("b", number(b))],
        number(b),
        &[b.return_statement(Some(b.binary(
            logic::syntax::BinaryOp::Add,
            b.identifier("a"),
            b.identifier("b"),
        )))],
    )
}
