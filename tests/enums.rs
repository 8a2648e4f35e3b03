mod cases;

use bumpalo::Bump;
use cases::{compile, number, positional};
use logic::diagnostics::CollectingReporter;
use logic::syntax::TreeBuilder;
use logic::{Node, StaticType, Value};
use pretty_assertions::assert_eq;

/// `enum Shape { case dot; case circle(Number); case box(Number, Number) }`
fn shape<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    b.enumeration(
        "Shape",
        &[
            b.case("dot", &[]),
            b.case("circle", &[number(b)]),
            b.case("box", &[number(b), number(b)]),
        ],
    )
}

#[test]
fn cases_are_constructed_through_their_path() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let dot = b.variable("dot", None, Some(b.call(b.dotted("Shape.dot"), &[])));
    let circle = b.variable(
        "circle",
        None,
        Some(b.call(
            b.dotted("Shape.circle"),
            &positional(&b, &[b.number(2.0)]),
        )),
    );
    let square = b.variable(
        "square",
        None,
        Some(b.call(
            b.dotted("Shape.box"),
            &positional(&b, &[b.number(3.0), b.number(3.0)]),
        )),
    );
    let program = b.program(&[shape(&b), dot, circle, square]);

    let compilation = compile(&arena, &[program], &reporter);

    let dot = compilation.evaluate(dot.id).unwrap();
    assert_eq!(dot.as_enum(), Some(("dot", &[][..])));
    assert_eq!(dot.ty, StaticType::constant("Shape"));
    assert_eq!(dot.to_string(), "dot");

    let circle = compilation.evaluate(circle.id).unwrap();
    assert_eq!(
        circle.as_enum(),
        Some(("circle", &[Value::number(2.0)][..]))
    );
    assert_eq!(
        compilation.evaluate(square.id).unwrap().to_string(),
        "box(3, 3)"
    );
    assert!(compilation.unification_errors().is_empty());
    assert!(!reporter.has_errors());
}

#[test]
fn associated_values_are_type_checked() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let wrong = b.variable(
        "wrong",
        None,
        Some(b.call(
            b.dotted("Shape.circle"),
            &positional(&b, &[b.string("big")]),
        )),
    );
    let program = b.program(&[shape(&b), wrong]);

    let compilation = compile(&arena, &[program], &reporter);

    assert_eq!(compilation.unification_errors().len(), 1);
    assert!(
        reporter.errors()[0].contains("type mismatch: expected Number, found String"),
        "{:?}",
        reporter.errors()
    );
}

#[test]
fn prelude_optional_is_generic() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let number_call = b.call(
        b.dotted("Optional.value"),
        &positional(&b, &[b.number(3.0)]),
    );
    let string_call = b.call(
        b.dotted("Optional.value"),
        &positional(&b, &[b.string("x")]),
    );
    let empty_call = b.call(b.dotted("Optional.none"), &[]);
    let some_number = b.variable("someNumber", None, Some(number_call));
    let some_string = b.variable("someString", None, Some(string_call));
    let nothing = b.variable("nothing", None, Some(empty_call));
    let program = b.program(&[some_number, some_string, nothing]);

    let compilation = compile(&arena, &[program], &reporter);

    assert!(compilation.unification_errors().is_empty());
    assert_eq!(
        compilation.resolved_type(number_call.id),
        Some(StaticType::generic_constant(
            "Optional",
            vec![StaticType::number()]
        ))
    );
    assert_eq!(
        compilation.resolved_type(string_call.id),
        Some(StaticType::generic_constant(
            "Optional",
            vec![StaticType::string()]
        ))
    );
    assert_eq!(
        compilation.evaluate(some_number.id).unwrap().to_string(),
        "value(3)"
    );
    assert_eq!(
        compilation
            .evaluate(nothing.id)
            .unwrap()
            .as_enum()
            .map(|(case, _)| case),
        Some("none")
    );
    assert!(!reporter.has_errors());
}

#[test]
fn enumerations_are_types_not_values() {
    let arena = Bump::new();
    let reporter = CollectingReporter::new();
    let b = TreeBuilder::new(&arena);
    let program = b.program(&[shape(&b)]);

    let compilation = compile(&arena, &[program], &reporter);

    let namespace = compilation.namespace();
    assert!(namespace.type_("Shape").is_some());
    assert!(namespace.value("Shape").is_none());
    assert!(namespace.value("Shape.circle").is_some());
}
