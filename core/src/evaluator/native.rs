//! Natively implemented builtins, keyed by the qualified path of the prelude
//! declaration they implement.

use hashbrown::HashMap;
use lazy_static::lazy_static;

use super::EvaluationError;
use super::operators::eval_binary_number;
use crate::syntax::BinaryOp;
use crate::types::StaticType;
use crate::values::{NativeFn, Value};

/// Largest magnitude at which consecutive integers are still distinct `f64`s.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Most numbers `Number.range` produces.
pub const MAX_RANGE_LENGTH: usize = 1 << 20;

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, NativeFn> = {
        let entries: [(&'static str, NativeFn); 18] = [
            ("Boolean.and", boolean_and),
            ("Boolean.or", boolean_or),
            ("Boolean.not", boolean_not),
            ("Boolean.isEqual", boolean_is_equal),
            ("Number.add", number_add),
            ("Number.subtract", number_subtract),
            ("Number.multiply", number_multiply),
            ("Number.divide", number_divide),
            ("Number.isEqual", number_is_equal),
            ("Number.isLessThan", number_is_less_than),
            ("Number.isGreaterThan", number_is_greater_than),
            ("Number.isLessThanOrEqual", number_is_less_than_or_equal),
            ("Number.isGreaterThanOrEqual", number_is_greater_than_or_equal),
            ("Number.range", number_range),
            ("String.isEqual", string_is_equal),
            ("String.concat", string_concat),
            ("Array.at", array_at),
            ("Array.count", array_count),
        ];
        entries.into_iter().collect()
    };
}

pub fn lookup(path: &str) -> Option<NativeFn> {
    BUILTINS.get(path).copied()
}

/// Qualified paths of every native builtin.
pub fn paths() -> impl Iterator<Item = &'static str> {
    BUILTINS.keys().copied()
}

fn invalid(path: &str) -> EvaluationError {
    EvaluationError::InvalidBuiltinArguments(path.into())
}

fn numbers<const N: usize>(
    path: &str,
    arguments: &[Value<'_>],
) -> Result<[f64; N], EvaluationError> {
    if arguments.len() != N {
        return Err(invalid(path));
    }
    let mut numbers = [0.0; N];
    for (slot, argument) in numbers.iter_mut().zip(arguments) {
        *slot = argument.as_number().ok_or_else(|| invalid(path))?;
    }
    Ok(numbers)
}

fn booleans<const N: usize>(
    path: &str,
    arguments: &[Value<'_>],
) -> Result<[bool; N], EvaluationError> {
    if arguments.len() != N {
        return Err(invalid(path));
    }
    let mut booleans = [false; N];
    for (slot, argument) in booleans.iter_mut().zip(arguments) {
        *slot = argument.as_bool().ok_or_else(|| invalid(path))?;
    }
    Ok(booleans)
}

fn strings<'s, const N: usize>(
    path: &str,
    arguments: &'s [Value<'_>],
) -> Result<[&'s str; N], EvaluationError> {
    if arguments.len() != N {
        return Err(invalid(path));
    }
    let mut strings = [""; N];
    for (slot, argument) in strings.iter_mut().zip(arguments) {
        *slot = argument.as_str().ok_or_else(|| invalid(path))?;
    }
    Ok(strings)
}

fn boolean_and<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = booleans("Boolean.and", arguments)?;
    Ok(Value::boolean(a && b))
}

fn boolean_or<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = booleans("Boolean.or", arguments)?;
    Ok(Value::boolean(a || b))
}

fn boolean_not<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a] = booleans("Boolean.not", arguments)?;
    Ok(Value::boolean(!a))
}

fn boolean_is_equal<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = booleans("Boolean.isEqual", arguments)?;
    Ok(Value::boolean(a == b))
}

fn arithmetic<'v>(
    path: &str,
    op: BinaryOp,
    arguments: &[Value<'v>],
) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = numbers(path, arguments)?;
    eval_binary_number(op, a, b).map(Value::number)
}

fn number_add<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    arithmetic("Number.add", BinaryOp::Add, arguments)
}

fn number_subtract<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    arithmetic("Number.subtract", BinaryOp::Subtract, arguments)
}

fn number_multiply<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    arithmetic("Number.multiply", BinaryOp::Multiply, arguments)
}

fn number_divide<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    arithmetic("Number.divide", BinaryOp::Divide, arguments)
}

fn number_is_equal<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = numbers("Number.isEqual", arguments)?;
    Ok(Value::boolean(a == b))
}

fn number_is_less_than<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = numbers("Number.isLessThan", arguments)?;
    Ok(Value::boolean(a < b))
}

fn number_is_greater_than<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = numbers("Number.isGreaterThan", arguments)?;
    Ok(Value::boolean(a > b))
}

fn number_is_less_than_or_equal<'v>(
    arguments: &[Value<'v>],
) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = numbers("Number.isLessThanOrEqual", arguments)?;
    Ok(Value::boolean(a <= b))
}

fn number_is_greater_than_or_equal<'v>(
    arguments: &[Value<'v>],
) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = numbers("Number.isGreaterThanOrEqual", arguments)?;
    Ok(Value::boolean(a >= b))
}

/// Numbers from `from` (inclusive) to `to` (exclusive) in steps of one.
fn number_range<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [from, to] = numbers("Number.range", arguments)?;
    let steppable = |bound: f64| bound.is_finite() && bound.abs() <= MAX_EXACT_INTEGER;
    if !steppable(from) || !steppable(to) {
        return Err(EvaluationError::InvalidRange { from, to });
    }
    let length = (to - from).ceil().max(0.0);
    if length > MAX_RANGE_LENGTH as f64 {
        return Err(EvaluationError::RangeTooLong {
            length,
            limit: MAX_RANGE_LENGTH,
        });
    }
    let items = (0..length as usize).map(|step| Value::number(from + step as f64));
    Ok(Value::array(StaticType::number(), items))
}

fn string_is_equal<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = strings("String.isEqual", arguments)?;
    Ok(Value::boolean(a == b))
}

fn string_concat<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [a, b] = strings("String.concat", arguments)?;
    let mut result = ecow::EcoString::from(a);
    result.push_str(b);
    Ok(Value::string(result))
}

fn array_at<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [array, index] = arguments else {
        return Err(invalid("Array.at"));
    };
    let items = array.as_array().ok_or_else(|| invalid("Array.at"))?;
    let index = index.as_number().ok_or_else(|| invalid("Array.at"))?;
    if index < 0.0 || index.fract() != 0.0 || index as usize >= items.len() {
        return Err(EvaluationError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }
    Ok(items[index as usize].clone())
}

fn array_count<'v>(arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
    let [array] = arguments else {
        return Err(invalid("Array.count"));
    };
    let items = array.as_array().ok_or_else(|| invalid("Array.count"))?;
    Ok(Value::number(items.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call<'v>(path: &str, arguments: &[Value<'v>]) -> Result<Value<'v>, EvaluationError> {
        let Some(implementation) = lookup(path) else {
            panic!("no builtin named {path}");
        };
        implementation(arguments)
    }

    #[test]
    fn numbers_and_booleans() {
        assert_eq!(
            call("Number.add", &[Value::number(2.0), Value::number(3.0)]),
            Ok(Value::number(5.0))
        );
        assert_eq!(
            call("Boolean.not", &[Value::boolean(true)]),
            Ok(Value::boolean(false))
        );
        assert_eq!(
            call("Number.divide", &[Value::number(1.0), Value::number(0.0)]),
            Err(EvaluationError::DivisionByZero)
        );
    }

    #[test]
    fn wrong_arguments_are_rejected() {
        assert_eq!(
            call("Number.add", &[Value::number(2.0)]),
            Err(EvaluationError::InvalidBuiltinArguments(
                "Number.add".into()
            ))
        );
        assert_eq!(
            call("Boolean.and", &[Value::number(1.0), Value::boolean(true)]),
            Err(EvaluationError::InvalidBuiltinArguments(
                "Boolean.and".into()
            ))
        );
    }

    #[test]
    fn arrays() {
        let range = call("Number.range", &[Value::number(0.0), Value::number(3.0)]).unwrap();
        assert_eq!(range.to_string(), "[0, 1, 2]");
        assert_eq!(
            call("Array.at", &[range.clone(), Value::number(2.0)]),
            Ok(Value::number(2.0))
        );
        assert_eq!(
            call("Array.count", &[range.clone()]),
            Ok(Value::number(3.0))
        );
        assert_eq!(
            call("Array.at", &[range, Value::number(3.0)]),
            Err(EvaluationError::IndexOutOfBounds { index: 3.0, len: 3 })
        );
    }

    #[test]
    fn ranges_are_bounded() {
        fn range(from: f64, to: f64) -> Result<Value<'static>, EvaluationError> {
            call("Number.range", &[Value::number(from), Value::number(to)])
        }
        let shown = |from, to| range(from, to).map(|range| range.to_string());

        assert_eq!(shown(0.5, 2.0), Ok("[0.5, 1.5]".to_string()));
        assert_eq!(shown(3.0, 1.0), Ok("[]".to_string()));
        assert_eq!(
            range(1e16, 1e16 + 2.0),
            Err(EvaluationError::InvalidRange {
                from: 1e16,
                to: 1e16 + 2.0
            })
        );
        assert_eq!(
            range(0.0, f64::INFINITY),
            Err(EvaluationError::InvalidRange {
                from: 0.0,
                to: f64::INFINITY
            })
        );
        assert_eq!(
            range(0.0, 1e12),
            Err(EvaluationError::RangeTooLong {
                length: 1e12,
                limit: MAX_RANGE_LENGTH
            })
        );
    }

    #[test]
    fn string_builtins() {
        assert_eq!(
            call("String.concat", &[Value::string("ab"), Value::string("cd")]),
            Ok(Value::string("abcd"))
        );
        assert_eq!(
            call("String.isEqual", &[Value::string("a"), Value::string("a")]),
            Ok(Value::boolean(true))
        );
    }

    #[test]
    fn every_path_resolves() {
        for path in paths() {
            assert!(lookup(path).is_some(), "{path}");
        }
        assert!(lookup("Number.unknown").is_none());
    }
}
