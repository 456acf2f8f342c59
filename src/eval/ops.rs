use std::cmp::Ordering;

use crate::{
    syntax::{BinaryOp, UnaryOp},
    value::{Key, Value},
};

use super::EvalError;

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Num::Int(*i)),
            Value::Bool(b) => Some(Num::Int(i64::from(*b))),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn overflow() -> EvalError {
    EvalError::Arithmetic {
        message: "integer overflow".to_string(),
    }
}

fn division_by_zero() -> EvalError {
    EvalError::Arithmetic {
        message: "division by zero".to_string(),
    }
}

fn unsupported(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::Type {
        message: format!(
            "unsupported operand types for {op}: '{}' and '{}'",
            left.type_name(),
            right.type_name()
        ),
    }
}

pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, EvalError> {
    match (op, Num::of(operand)) {
        (UnaryOp::Not, _) => Ok(Value::Bool(!operand.is_truthy())),
        (UnaryOp::Neg, Some(Num::Int(i))) => i.checked_neg().map(Value::Int).ok_or_else(overflow),
        (UnaryOp::Neg, Some(Num::Float(f))) => Ok(Value::Float(-f)),
        (UnaryOp::Pos, Some(Num::Int(i))) => Ok(Value::Int(i)),
        (UnaryOp::Pos, Some(Num::Float(f))) => Ok(Value::Float(f)),
        (_, None) => Err(EvalError::Type {
            message: format!("bad operand type for unary operator: '{}'", operand.type_name()),
        }),
    }
}

/// Applies a binary operator to two evaluated operands.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic("-", left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => multiply(left, right),
        BinaryOp::Div => divide(left, right),
        BinaryOp::FloorDiv => floor_divide(left, right),
        BinaryOp::Mod => modulo(left, right),
        BinaryOp::Eq => Ok(Value::Bool(equal(left, right))),
        BinaryOp::NotEq => Ok(Value::Bool(!equal(left, right))),
        BinaryOp::Lt => compare(left, right).map(|o| Value::Bool(o == Ordering::Less)),
        BinaryOp::LtEq => compare(left, right).map(|o| Value::Bool(o != Ordering::Greater)),
        BinaryOp::Gt => compare(left, right).map(|o| Value::Bool(o == Ordering::Greater)),
        BinaryOp::GtEq => compare(left, right).map(|o| Value::Bool(o != Ordering::Less)),
        BinaryOp::And => Ok(if left.is_truthy() { right } else { left }.clone()),
        BinaryOp::Or => Ok(if left.is_truthy() { left } else { right }.clone()),
    }
}

fn arithmetic(
    symbol: &str,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    match (Num::of(left), Num::of(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => int_op(a, b).map(Value::Int).ok_or_else(overflow),
        (Some(a), Some(b)) => Ok(Value::Float(float_op(a.as_f64(), b.as_f64()))),
        _ => Err(unsupported(symbol, left, right)),
    }
}

fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) => Ok(Value::List(a.iter().chain(b).cloned().collect())),
        _ => arithmetic("+", left, right, i64::checked_add, |a, b| a + b),
    }
}

fn multiply(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
            let count = repeat_count(s.len(), *n)?;
            let mut repeated = String::new();
            repeated
                .try_reserve_exact(s.len() * count)
                .map_err(|_| too_large())?;
            for _ in 0..count {
                repeated.push_str(s);
            }
            Ok(Value::Str(repeated))
        }
        (Value::List(items), Value::Int(n)) | (Value::Int(n), Value::List(items)) => {
            let count = repeat_count(items.len(), *n)?;
            let mut repeated = Vec::new();
            repeated
                .try_reserve_exact(items.len() * count)
                .map_err(|_| too_large())?;
            for _ in 0..count {
                repeated.extend_from_slice(items);
            }
            Ok(Value::List(repeated))
        }
        _ => arithmetic("*", left, right, i64::checked_mul, |a, b| a * b),
    }
}

/// Upper bound on the length of a repeated string (in bytes) or list.
const MAX_REPEAT_LEN: usize = 1 << 24;

fn too_large() -> EvalError {
    EvalError::Arithmetic {
        message: "repeated sequence is too large".to_string(),
    }
}

/// Number of repetitions for a sequence of `len` elements. Negative counts
/// give an empty result, as does an empty sequence.
fn repeat_count(len: usize, n: i64) -> Result<usize, EvalError> {
    let count = usize::try_from(n).unwrap_or(0);
    if len == 0 || count == 0 {
        return Ok(0);
    }
    match len.checked_mul(count) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(count),
        _ => Err(too_large()),
    }
}

fn divide(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (Num::of(left), Num::of(right)) {
        (Some(_), Some(b)) if b.as_f64() == 0.0 => Err(division_by_zero()),
        (Some(a), Some(b)) => Ok(Value::Float(a.as_f64() / b.as_f64())),
        _ => Err(unsupported("/", left, right)),
    }
}

fn floor_divide(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (Num::of(left), Num::of(right)) {
        (Some(_), Some(b)) if b.as_f64() == 0.0 => Err(division_by_zero()),
        (Some(Num::Int(a)), Some(Num::Int(b))) => {
            let quotient = a.checked_div(b).ok_or_else(overflow)?;
            // Round toward negative infinity.
            if a % b != 0 && (a < 0) != (b < 0) {
                Ok(Value::Int(quotient - 1))
            } else {
                Ok(Value::Int(quotient))
            }
        }
        (Some(a), Some(b)) => Ok(Value::Float((a.as_f64() / b.as_f64()).floor())),
        _ => Err(unsupported("//", left, right)),
    }
}

fn modulo(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (Num::of(left), Num::of(right)) {
        (Some(_), Some(b)) if b.as_f64() == 0.0 => Err(division_by_zero()),
        (Some(Num::Int(a)), Some(Num::Int(b))) => {
            let remainder = a.checked_rem(b).ok_or_else(overflow)?;
            // The result takes the sign of the divisor.
            if remainder != 0 && (remainder < 0) != (b < 0) {
                Ok(Value::Int(remainder + b))
            } else {
                Ok(Value::Int(remainder))
            }
        }
        (Some(a), Some(b)) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            let remainder = a % b;
            if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
                Ok(Value::Float(remainder + b))
            } else {
                Ok(Value::Float(remainder))
            }
        }
        _ => Err(unsupported("%", left, right)),
    }
}

/// Equality with numeric promotion, so `1 == 1.0` and `True == 1`.
pub fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equal(x, y))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|((ka, va), (kb, vb))| ka == kb && equal(va, vb))
        }
        _ => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => a == b,
            (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
            _ => left == right,
        },
    }
}

/// Orders numbers, strings and lists of comparable items.
///
/// # Errors
/// Returns `EvalError::Type` for values that have no ordering between them.
pub fn compare(left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::List(a), Value::List(b)) => {
            for (x, y) in a.iter().zip(b) {
                let ordering = compare(x, y)?;
                if ordering != Ordering::Equal {
                    return Ok(ordering);
                }
            }
            Ok(a.len().cmp(&b.len()))
        }
        _ => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(a.cmp(&b)),
            (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()).ok_or_else(|| EvalError::Type {
                message: "nan cannot be ordered".to_string(),
            }),
            _ => Err(unsupported("comparison", left, right)),
        },
    }
}

/// Reads `object[index]`. Sequences accept negative indexes.
pub fn index(object: &Value, index: &Value) -> Result<Value, EvalError> {
    match (object, index) {
        (Value::List(items), Value::Int(i)) => position(*i, items.len())
            .and_then(|p| items.get(p).cloned())
            .ok_or_else(|| out_of_range("list")),
        (Value::Str(s), Value::Int(i)) => {
            let len = s.chars().count();
            position(*i, len)
                .and_then(|p| s.chars().nth(p))
                .map(|c| Value::Str(c.to_string()))
                .ok_or_else(|| out_of_range("string"))
        }
        (Value::Map(map), key) => {
            let key = Key::from_value(key.clone()).map_err(|message| EvalError::Type { message })?;
            map.get(&key).cloned().ok_or_else(|| EvalError::Index {
                message: format!("key {key} not found"),
            })
        }
        (Value::List(_) | Value::Str(_), other) => Err(EvalError::Type {
            message: format!("indices must be integers, not {}", other.type_name()),
        }),
        (other, _) => Err(EvalError::Type {
            message: format!("'{}' object is not subscriptable", other.type_name()),
        }),
    }
}

fn position(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + len } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

fn out_of_range(kind: &str) -> EvalError {
    EvalError::Index {
        message: format!("{kind} index out of range"),
    }
}
