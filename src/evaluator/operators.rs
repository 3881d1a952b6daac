//! Operator semantics shared by the tree walk.
//!
//! Every coercion is an explicit match arm: loose equality, numeric
//! coercion for arithmetic and ordering, and the one membership routine
//! used by both `in` and `contains`.

use crate::ast::{ArithmeticOperator, ComparisonOperator};
use crate::value::{EvalError, Result, Value};
use std::cmp::Ordering;
use std::mem;

pub fn eval_prefix_expression(operator: ArithmeticOperator, operand: Value) -> Result<Value> {
    let unsupported = || EvalError::UnsupportedPrefix {
        operator,
        type_name: operand.type_name(),
    };

    match operator {
        ArithmeticOperator::Plus => operand.to_number().map(Value::Number).ok_or_else(unsupported),
        ArithmeticOperator::Minus => operand
            .to_number()
            .map(|n| Value::Number(-n))
            .ok_or_else(unsupported),
        ArithmeticOperator::Asterisk | ArithmeticOperator::Slash | ArithmeticOperator::Percent => {
            Err(unsupported())
        }
    }
}

pub fn eval_arithmetic_expression(
    operator: ArithmeticOperator,
    left: Value,
    right: Value,
) -> Result<Value> {
    let concatenates = matches!(left, Value::String(_)) || matches!(right, Value::String(_));
    if operator == ArithmeticOperator::Plus
        && concatenates
        && left.is_primitive()
        && right.is_primitive()
    {
        return Ok(Value::String(format!("{}{}", left, right)));
    }

    let invalid = || EvalError::InvalidArithmetic {
        left: left.type_name(),
        operator,
        right: right.type_name(),
    };

    if !left.is_numeric() && !right.is_numeric() {
        return Err(invalid());
    }

    let (x, y) = match (left.to_number(), right.to_number()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(invalid()),
    };

    Ok(Value::Number(match operator {
        ArithmeticOperator::Plus => x + y,
        ArithmeticOperator::Minus => x - y,
        ArithmeticOperator::Asterisk => x * y,
        ArithmeticOperator::Slash => x / y,
        ArithmeticOperator::Percent => x % y,
    }))
}

pub fn eval_comparison_expression(
    operator: ComparisonOperator,
    left: Value,
    right: Value,
) -> Result<Value> {
    let result = match operator {
        ComparisonOperator::Eq => loose_equals(&left, &right),
        ComparisonOperator::NotEq => !loose_equals(&left, &right),
        ComparisonOperator::StrictEq => left == right,
        ComparisonOperator::StrictNotEq => left != right,
        ComparisonOperator::GT => ordering(operator, &left, &right)? == Some(Ordering::Greater),
        ComparisonOperator::GTE => matches!(
            ordering(operator, &left, &right)?,
            Some(Ordering::Greater | Ordering::Equal)
        ),
        ComparisonOperator::LT => ordering(operator, &left, &right)? == Some(Ordering::Less),
        ComparisonOperator::LTE => matches!(
            ordering(operator, &left, &right)?,
            Some(Ordering::Less | Ordering::Equal)
        ),
        ComparisonOperator::In => contains(operator, &right, &left)?,
        ComparisonOperator::Contains => contains(operator, &left, &right)?,
    };

    Ok(Value::Boolean(result))
}

/// `==`: same-tag values compare by value; otherwise a boolean is read as a
/// number and a string next to a number is read as a number.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    if mem::discriminant(left) == mem::discriminant(right) {
        return left == right;
    }

    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            Value::String(s.clone()).to_number() == Some(*n)
        }
        (Value::Boolean(b), other) | (other, Value::Boolean(b)) if other.is_primitive() => {
            loose_equals(&Value::Number(if *b { 1.0 } else { 0.0 }), other)
        }
        _ => false,
    }
}

// `None` when either side is NaN: every ordering test is then false.
fn ordering(operator: ComparisonOperator, left: &Value, right: &Value) -> Result<Option<Ordering>> {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Ok(Some(a.cmp(b)));
    }

    match (left.to_number(), right.to_number()) {
        (Some(x), Some(y)) => Ok(x.partial_cmp(&y)),
        _ => Err(EvalError::InvalidComparison {
            left: left.type_name(),
            operator,
            right: right.type_name(),
        }),
    }
}

/// Membership of `item` in `container`: strict element equality for arrays
/// (NaN matches NaN), substring search for strings.
fn contains(operator: ComparisonOperator, container: &Value, item: &Value) -> Result<bool> {
    match container {
        Value::Array(elements) => Ok(elements.iter().any(|element| match (element, item) {
            (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
            (element, item) => element == item,
        })),
        Value::String(haystack) if item.is_primitive() => {
            Ok(haystack.contains(item.to_string().as_str()))
        }
        Value::String(_) => Err(EvalError::InvalidComparison {
            left: container.type_name(),
            operator,
            right: item.type_name(),
        }),
        _ => Err(EvalError::NotAContainer {
            type_name: container.type_name(),
        }),
    }
}
