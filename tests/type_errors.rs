/*
 * Error Reporting Tests
 *
 * Type errors and unresolved names are reported and compilation goes on.
 * Only malformed input (colliding declarations, reused node ids, a
 * non-program root) fails a compilation.
 */

mod cases;

use bumpalo::Bump;
use cases::{add_function, compile, number, positional};
use logic::diagnostics::CollectingReporter;
use logic::namespace::NamespaceError;
use logic::syntax::{BinaryOp, SyntaxError, TreeBuilder};
use logic::{Engine, EngineOptions, Error, StaticType, UnificationError};
use pretty_assertions::assert_eq;

#[test]
fn missing_arguments_are_an_arity_error() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let call = b.call(b.identifier("add"), &positional(&b, &[b.number(1.0)]));
    let result = b.variable("result", None, Some(call));
    let program = b.program(&[add_function(&b), result]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(
        compilation.unification_errors(),
        &[(
            call.id,
            UnificationError::ParameterCountMismatch {
                expected: 2,
                found: 1
            }
        )]
    );
    assert!(compilation.resolved_type(call.id).is_some());
    assert_eq!(
        reporter.errors(),
        vec![format!("{}: function takes 2 arguments, found 1", call.id)]
    );
}

#[test]
fn argument_types_must_match_parameters() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let first = b.argument(None, b.string("a"));
    let call = b.call(
        b.identifier("add"),
        &[first, b.argument(None, b.number(1.0))],
    );
    let result = b.variable("result", None, Some(call));
    let program = b.program(&[add_function(&b), result]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(
        compilation.unification_errors(),
        &[(
            first.id,
            UnificationError::Mismatch {
                expected: StaticType::number(),
                found: StaticType::string(),
            }
        )]
    );
    assert_eq!(
        compilation.resolved_type(call.id),
        Some(StaticType::number())
    );
}

#[test]
fn conditions_must_be_boolean() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let condition = b.number(1.0);
    let check = b.function(
        "check",
        &[],
        number(&b),
        &[
            b.branch(condition, &[b.return_statement(Some(b.number(1.0)))]),
            b.return_statement(Some(b.number(0.0))),
        ],
    );
    let program = b.program(&[check]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(
        compilation.unification_errors(),
        &[(
            condition.id,
            UnificationError::Mismatch {
                expected: StaticType::boolean(),
                found: StaticType::number(),
            }
        )]
    );
}

#[test]
fn undefined_identifiers_are_warnings() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let missing = b.identifier("missing");
    let total = b.variable(
        "total",
        None,
        Some(b.binary(BinaryOp::Add, missing, b.number(1.0))),
    );
    let program = b.program(&[total]);

    let compilation = compile(&arena, &[program], &reporter);

    let scope = compilation.scope();
    assert!(scope.undefined_identifiers.contains(&missing.id));
    assert!(scope.is_undefined(missing.id));
    assert_eq!(
        reporter.warnings(),
        vec![format!("{}: undefined identifier `missing`", missing.id)]
    );
    assert!(compilation.unification_errors().is_empty());
    assert_eq!(
        compilation.resolved_type(total.id),
        Some(StaticType::number())
    );
}

#[test]
fn colliding_declarations_fail_compilation() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let first = b.variable("twice", None, Some(b.number(1.0)));
    let second = b.variable("twice", None, Some(b.number(2.0)));
    let program = b.program(&[first, second]);

    let engine = Engine::new(EngineOptions::default());
    let result = engine.compile(&arena, &[program], &reporter);

    let Err(Error::Namespace(NamespaceError::Collision { path, .. })) = result else {
        panic!("expected a namespace collision");
    };
    assert_eq!(path, "twice");
}

#[test]
fn programs_may_not_redeclare_prelude_names() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let shadow = b.namespace(
        "Number",
        &[b.variable("add", None, Some(b.number(0.0)))],
    );
    let program = b.program(&[shadow]);

    let engine = Engine::new(EngineOptions::default());
    let result = engine.compile_with_prelude(&arena, &[program], &reporter);

    assert!(matches!(
        result,
        Err(Error::Namespace(NamespaceError::Collision { .. }))
    ));
}

#[test]
fn reused_node_ids_fail_compilation() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let shared = b.number(1.0);
    let program = b.program(&[
        b.variable("a", None, Some(shared)),
        b.variable("b", None, Some(shared)),
    ]);

    let engine = Engine::new(EngineOptions::default());
    let result = engine.compile(&arena, &[program], &reporter);

    assert!(matches!(
        result,
        Err(Error::Syntax(SyntaxError::DuplicateNodeId(id))) if id == shared.id
    ));
}

#[test]
fn roots_must_be_programs() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let loose = b.variable("loose", None, Some(b.number(1.0)));

    let engine = Engine::new(EngineOptions::default());
    let result = engine.compile(&arena, &[loose], &reporter);

    assert!(matches!(
        result,
        Err(Error::Syntax(SyntaxError::NotAProgram("variable")))
    ));
    assert!(reporter.diagnostics().is_empty());
}
