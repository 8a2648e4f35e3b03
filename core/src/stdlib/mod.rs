//! Logic Standard Library
//!
//! The prelude is an ordinary program joined in front of user programs. It
//! declares the builtin types as records (and `Optional` as an enumeration),
//! plus one namespace of functions per type:
//! - Boolean: `and`, `or`, `not`, `isEqual`
//! - Number: arithmetic, comparisons and `range`
//! - String: `isEqual`, `concat`
//! - Array: `at`, `count`
//!
//! Functions in those namespaces have empty bodies. The evaluator binds each
//! of them to the native implementation registered under its qualified path.

use crate::syntax::{Node, TreeBuilder};

fn extern_function<'a>(
    b: &TreeBuilder<'a>,
    name: &str,
    parameters: &[(&str, &'a Node<'a>)],
    return_type: &'a Node<'a>,
) -> &'a Node<'a> {
    extern_generic_function(b, name, &[], parameters, return_type)
}

fn extern_generic_function<'a>(
    b: &TreeBuilder<'a>,
    name: &str,
    generics: &[&str],
    parameters: &[(&str, &'a Node<'a>)],
    return_type: &'a Node<'a>,
) -> &'a Node<'a> {
    let parameters: Vec<_> = parameters
        .iter()
        .map(|&(name, annotation)| b.parameter(name, annotation))
        .collect();
    b.generic_function(name, generics, &parameters, return_type, &[])
}

fn binary<'a>(
    b: &TreeBuilder<'a>,
    name: &str,
    operand: &str,
    result: &str,
) -> &'a Node<'a> {
    extern_function(
        b,
        name,
        &[
            ("a", b.type_identifier(operand)),
            ("b", b.type_identifier(operand)),
        ],
        b.type_identifier(result),
    )
}

fn boolean_namespace<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    b.namespace(
        "Boolean",
        &[
            binary(b, "and", "Boolean", "Boolean"),
            binary(b, "or", "Boolean", "Boolean"),
            extern_function(
                b,
                "not",
                &[("value", b.type_identifier("Boolean"))],
                b.type_identifier("Boolean"),
            ),
            binary(b, "isEqual", "Boolean", "Boolean"),
        ],
    )
}

fn number_namespace<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    let mut declarations: Vec<_> = ["add", "subtract", "multiply", "divide"]
        .into_iter()
        .map(|name| binary(b, name, "Number", "Number"))
        .collect();
    declarations.extend(
        [
            "isEqual",
            "isLessThan",
            "isGreaterThan",
            "isLessThanOrEqual",
            "isGreaterThanOrEqual",
        ]
        .into_iter()
        .map(|name| binary(b, name, "Number", "Boolean")),
    );
    declarations.push(extern_function(
        b,
        "range",
        &[
            ("from", b.type_identifier("Number")),
            ("to", b.type_identifier("Number")),
        ],
        b.generic_type("Array", &[b.type_identifier("Number")]),
    ));
    b.namespace("Number", &declarations)
}

fn string_namespace<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    b.namespace(
        "String",
        &[
            binary(b, "isEqual", "String", "Boolean"),
            binary(b, "concat", "String", "String"),
        ],
    )
}

fn array_namespace<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    let array = || b.generic_type("Array", &[b.type_identifier("Element")]);
    b.namespace(
        "Array",
        &[
            extern_generic_function(
                b,
                "at",
                &["Element"],
                &[("array", array()), ("index", b.type_identifier("Number"))],
                b.type_identifier("Element"),
            ),
            extern_generic_function(
                b,
                "count",
                &["Element"],
                &[("array", array())],
                b.type_identifier("Number"),
            ),
        ],
    )
}

/// Builds the prelude program.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use logic_core::{namespace::build_namespace, stdlib::standard_library, syntax::TreeBuilder};
///
/// let arena = Bump::new();
/// let prelude = standard_library(&TreeBuilder::new(&arena));
/// let namespace = build_namespace(prelude).unwrap();
/// assert!(namespace.value("Number.add").is_some());
/// ```
pub fn standard_library<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
    b.program(&[
        b.record("Boolean", &[]),
        b.record("Number", &[]),
        b.record("String", &[]),
        b.record("Color", &[]),
        b.generic_record("Array", &["Element"], &[]),
        b.generic_enumeration(
            "Optional",
            &["Wrapped"],
            &[
                b.case("value", &[b.type_identifier("Wrapped")]),
                b.case("none", &[]),
            ],
        ),
        boolean_namespace(b),
        number_namespace(b),
        string_namespace(b),
        array_namespace(b),
    ])
}
