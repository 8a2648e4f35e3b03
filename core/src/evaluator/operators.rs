//! Binary operator implementations.

use crate::evaluator::EvaluationError;
use crate::syntax::BinaryOp;
use crate::values::{Memory, Value};

fn invalid(op: BinaryOp, left: &Value<'_>, right: &Value<'_>) -> EvaluationError {
    EvaluationError::InvalidOperands {
        op,
        left: left.to_string(),
        right: right.to_string(),
    }
}

/// Evaluate an arithmetic operation on two numbers.
///
/// Follows IEEE 754 except for division, where a zero divisor is an error.
/// Any other operator is rejected as [`EvaluationError::InvalidOperands`].
pub(super) fn eval_binary_number(
    op: BinaryOp,
    left: f64,
    right: f64,
) -> Result<f64, EvaluationError> {
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Subtract => Ok(left - right),
        BinaryOp::Multiply => Ok(left * right),
        BinaryOp::Divide if right == 0.0 => Err(EvaluationError::DivisionByZero),
        BinaryOp::Divide => Ok(left / right),
        _ => Err(invalid(op, &Value::number(left), &Value::number(right))),
    }
}

fn compare(op: BinaryOp, left: f64, right: f64) -> bool {
    match op {
        BinaryOp::IsLessThan => left < right,
        BinaryOp::IsGreaterThan => left > right,
        BinaryOp::IsLessThanOrEqualTo => left <= right,
        _ => left >= right,
    }
}

pub(super) fn eval_binary<'a>(
    op: BinaryOp,
    left: &Value<'a>,
    right: &Value<'a>,
) -> Result<Value<'a>, EvaluationError> {
    match op {
        BinaryOp::IsEqualTo => Ok(Value::boolean(left.memory == right.memory)),
        BinaryOp::IsNotEqualTo => Ok(Value::boolean(left.memory != right.memory)),
        _ if op.is_arithmetic() => match (&left.memory, &right.memory) {
            (Memory::Number(a), Memory::Number(b)) => {
                eval_binary_number(op, *a, *b).map(Value::number)
            }
            _ => Err(invalid(op, left, right)),
        },
        _ if op.is_ordering() => match (&left.memory, &right.memory) {
            (Memory::Number(a), Memory::Number(b)) => Ok(Value::boolean(compare(op, *a, *b))),
            _ => Err(invalid(op, left, right)),
        },
        BinaryOp::And | BinaryOp::Or => match (&left.memory, &right.memory) {
            (Memory::Bool(a), Memory::Bool(b)) => Ok(Value::boolean(if op == BinaryOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(invalid(op, left, right)),
        },
        _ => Err(invalid(op, left, right)),
    }
}
