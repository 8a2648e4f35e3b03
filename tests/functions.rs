mod cases;

use bumpalo::Bump;
use cases::{add_function, compile, compile_with_limits, number, positional};
use logic::diagnostics::CollectingReporter;
use logic::syntax::{BinaryOp, TreeBuilder};
use logic::{ExecutionOptions, Node, StaticType, Value};
use pretty_assertions::assert_eq;

#[test]
fn add_returns_the_sum() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let call = b.call(
        b.identifier("add"),
        &positional(&b, &[b.number(2.0), b.number(3.0)]),
    );
    let result = b.variable("result", None, Some(call));
    let program = b.program(&[add_function(&b), result]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(
        compilation.resolved_type(call.id),
        Some(StaticType::number())
    );
    assert_eq!(compilation.evaluate(result.id), Some(Value::number(5.0)));
    assert!(compilation.unification_errors().is_empty());
    assert!(!reporter.has_errors());
}

#[test]
fn labeled_arguments_may_come_in_any_order() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let subtract = b.function(
        "subtract",
        &[b.parameter("from", number(&b)), b.parameter("amount", number(&b))],
        number(&b),
        &[b.return_statement(Some(b.binary(
            BinaryOp::Subtract,
            b.identifier("from"),
            b.identifier("amount"),
        )))],
    );
    let result = b.variable(
        "result",
        None,
        Some(b.call(
            b.identifier("subtract"),
            &[
                b.argument(Some("amount"), b.number(2.0)),
                b.argument(Some("from"), b.number(10.0)),
            ],
        )),
    );
    let program = b.program(&[subtract, result]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(compilation.evaluate(result.id), Some(Value::number(8.0)));
    assert!(compilation.unification_errors().is_empty());
}

#[test]
fn return_stops_execution() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let pick = b.function(
        "pick",
        &[],
        number(&b),
        &[
            b.branch(b.boolean(true), &[b.return_statement(Some(b.number(1.0)))]),
            b.return_statement(Some(b.call(
                b.dotted("Number.divide"),
                &positional(&b, &[b.number(2.0), b.number(0.0)]),
            ))),
        ],
    );
    let result = b.variable("result", None, Some(b.call(b.identifier("pick"), &[])));
    let program = b.program(&[pick, result]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(compilation.evaluate(result.id), Some(Value::number(1.0)));
    assert!(!reporter.has_errors());
}

#[test]
fn generic_functions_are_instantiated_per_use() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let identity = b.generic_function(
        "identity",
        &["T"],
        &[b.parameter("value", b.type_identifier("T"))],
        b.type_identifier("T"),
        &[b.return_statement(Some(b.identifier("value")))],
    );
    let number_call = b.call(b.identifier("identity"), &positional(&b, &[b.number(1.0)]));
    let string_call = b.call(b.identifier("identity"), &positional(&b, &[b.string("a")]));
    let n = b.variable("n", None, Some(number_call));
    let s = b.variable("s", None, Some(string_call));
    let program = b.program(&[identity, n, s]);

    let compilation = compile(&arena, &[program], &reporter);

    assert!(compilation.unification_errors().is_empty());
    assert_eq!(
        compilation.resolved_type(number_call.id),
        Some(StaticType::number())
    );
    assert_eq!(
        compilation.resolved_type(string_call.id),
        Some(StaticType::string())
    );
    assert_eq!(compilation.evaluate(n.id), Some(Value::number(1.0)));
    assert_eq!(compilation.evaluate(s.id), Some(Value::string("a")));
}

#[test]
fn recursion_terminates_through_branches() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    // function factorial(n: Number) -> Number {
    //     if (n <= 1) { return 1 }
    //     return n * factorial(n - 1)
    // }
    let factorial = b.function(
        "factorial",
        &[b.parameter("n", number(&b))],
        number(&b),
        &[
            b.branch(
                b.binary(
                    BinaryOp::IsLessThanOrEqualTo,
                    b.identifier("n"),
                    b.number(1.0),
                ),
                &[b.return_statement(Some(b.number(1.0)))],
            ),
            b.return_statement(Some(b.binary(
                BinaryOp::Multiply,
                b.identifier("n"),
                b.call(
                    b.identifier("factorial"),
                    &positional(
                        &b,
                        &[b.binary(BinaryOp::Subtract, b.identifier("n"), b.number(1.0))],
                    ),
                ),
            ))),
        ],
    );
    let result = b.variable(
        "result",
        None,
        Some(b.call(
            b.identifier("factorial"),
            &positional(&b, &[b.number(5.0)]),
        )),
    );
    let program = b.program(&[factorial, result]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(compilation.evaluate(result.id), Some(Value::number(120.0)));
    assert!(!reporter.has_errors());
}

#[test]
fn unbounded_recursion_is_reported() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let spin = b.function(
        "spin",
        &[],
        number(&b),
        &[b.return_statement(Some(b.call(b.identifier("spin"), &[])))],
    );
    let result = b.variable("result", None, Some(b.call(b.identifier("spin"), &[])));
    let program = b.program(&[spin, result]);
    let limits = ExecutionOptions {
        max_depth: 100,
        ..ExecutionOptions::default()
    };

    let compilation = compile_with_limits(&arena, &[program], &reporter, limits);

    assert_eq!(compilation.evaluate(result.id), None);
    let errors = reporter.errors();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].contains("exceeds maximum of 100"), "{errors:?}");
}

/// `function sum(limit: Number) -> Number`, adding `0 + 1 + ... + (limit - 1)`
/// in a loop.
fn sum_function<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    b.function(
        "sum",
        &[b.parameter("limit", number(b))],
        number(b),
        &[
            b.variable("total", None, Some(b.number(0.0))),
            b.variable("i", None, Some(b.number(0.0))),
            b.while_loop(
                b.binary(
                    BinaryOp::IsLessThan,
                    b.identifier("i"),
                    b.identifier("limit"),
                ),
                &[
                    b.expression_statement(b.assign(
                        b.identifier("total"),
                        b.binary(BinaryOp::Add, b.identifier("total"), b.identifier("i")),
                    )),
                    b.expression_statement(b.assign(
                        b.identifier("i"),
                        b.binary(BinaryOp::Add, b.identifier("i"), b.number(1.0)),
                    )),
                ],
            ),
            b.return_statement(Some(b.identifier("total"))),
        ],
    )
}

#[test]
fn loops_run_until_their_condition_fails() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let result = b.variable(
        "result",
        None,
        Some(b.call(
            b.identifier("sum"),
            &positional(&b, &[b.number(5.0)]),
        )),
    );
    let program = b.program(&[sum_function(&b), result]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(compilation.evaluate(result.id), Some(Value::number(10.0)));
    assert!(compilation.unification_errors().is_empty());
    assert!(!reporter.has_errors());
}

#[test]
fn iteration_limit_is_enforced() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let result = b.variable(
        "result",
        None,
        Some(b.call(
            b.identifier("sum"),
            &positional(&b, &[b.number(1000.0)]),
        )),
    );
    let program = b.program(&[sum_function(&b), result]);
    let limits = ExecutionOptions {
        max_iterations: Some(50),
        ..ExecutionOptions::default()
    };

    let compilation = compile_with_limits(&arena, &[program], &reporter, limits);

    assert_eq!(compilation.evaluate(result.id), None);
    assert_eq!(
        reporter.errors(),
        vec![format!("{}: loop exceeded 50 iterations", result.id)]
    );
}

fn call<'a>(b: &TreeBuilder<'a>, path: &str, arguments: &[&'a Node<'a>]) -> &'a Node<'a> {
    b.call(b.dotted(path), &positional(b, arguments))
}

#[test]
fn prelude_builtins_evaluate_natively() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let sum = b.variable(
        "sum",
        None,
        Some(call(&b, "Number.add", &[b.number(2.0), b.number(3.0)])),
    );
    let negated = b.variable(
        "negated",
        None,
        Some(call(&b, "Boolean.not", &[b.boolean(true)])),
    );
    let picked = b.variable(
        "picked",
        None,
        Some(call(
            &b,
            "Array.at",
            &[b.array(&[b.number(10.0), b.number(20.0)]), b.number(1.0)],
        )),
    );
    let greeting = b.variable(
        "greeting",
        None,
        Some(call(
            &b,
            "String.concat",
            &[b.string("hello, "), b.string("world")],
        )),
    );
    let count = b.variable(
        "count",
        None,
        Some(call(
            &b,
            "Array.count",
            &[call(&b, "Number.range", &[b.number(0.0), b.number(4.0)])],
        )),
    );
    let program = b.program(&[sum, negated, picked, greeting, count]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(compilation.evaluate(sum.id), Some(Value::number(5.0)));
    assert_eq!(
        compilation.evaluate(negated.id),
        Some(Value::boolean(false))
    );
    assert_eq!(compilation.evaluate(picked.id), Some(Value::number(20.0)));
    assert_eq!(
        compilation.evaluate(greeting.id),
        Some(Value::string("hello, world"))
    );
    assert_eq!(compilation.evaluate(count.id), Some(Value::number(4.0)));
    assert_eq!(
        compilation.resolved_type(picked.id),
        Some(StaticType::number())
    );
    assert!(compilation.unification_errors().is_empty());
    assert!(!reporter.has_errors());
}
