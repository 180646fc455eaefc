//! Operator implementations.
//!
//! [`apply`] is the single dispatch point: one exhaustive `match` over the
//! catalog, with each family delegated to a small helper. Operands arrive
//! already type-checked; helpers still destructure variants explicitly and
//! report a type error instead of panicking if that ever stops holding.
//!
//! # Ternary encoding
//!
//! `cond ? a : b` is two stages. `?` yields its right value when the
//! condition holds and [`StageValue::Untaken`] otherwise; `:` passes a taken
//! left value through and otherwise yields its right value. `Untaken` is
//! distinct from [`Value::Nil`], so a then-branch that evaluates to nil is
//! still the result.
//!
//! # Argument encoding
//!
//! `f(a, b, c)` is a call stage whose right child is a chain of separator
//! stages. Each separator yields [`StageValue::Args`] and splices operands
//! that are themselves `Args`, so the chain flattens to `[a b c]` whichever
//! way it nests. A [`Value::Sequence`] from a parameter or a function result
//! is an ordinary value: it is passed as one argument, never spread.

use std::borrow::Cow;

use gauge_ir::{ExpressionFunction, OperatorSymbol, Value};

use crate::errors::{
    function_failed, operand_mismatch, parameter_failed, pattern_compile_failed, EvalResult,
};
use crate::parameters::Parameters;
use crate::unary_operators::evaluate_prefix;

/// What a stage hands to its parent.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum StageValue {
    Value(Value),
    /// A `?` stage whose condition was false.
    Untaken,
    /// Arguments collected by separator stages.
    Args(Vec<Value>),
}

impl StageValue {
    /// View as an operand. An untaken branch reads as nil; collected
    /// arguments read as a sequence.
    pub(crate) fn to_operand(&self) -> Cow<'_, Value> {
        match self {
            StageValue::Value(value) => Cow::Borrowed(value),
            StageValue::Untaken => Cow::Owned(Value::Nil),
            StageValue::Args(items) => Cow::Owned(Value::sequence(items.clone())),
        }
    }

    #[inline]
    pub(crate) fn into_value(self) -> Value {
        match self {
            StageValue::Value(value) => value,
            StageValue::Untaken => Value::Nil,
            StageValue::Args(items) => Value::sequence(items),
        }
    }
}

/// Operand for a value-level operator; a missing side reads as nil.
#[inline]
fn operand(side: Option<StageValue>) -> Value {
    side.map_or(Value::Nil, StageValue::into_value)
}

/// Run `symbol` over already-evaluated, already-checked operands.
pub(crate) fn apply<P: Parameters + ?Sized>(
    symbol: &OperatorSymbol,
    left: Option<StageValue>,
    right: Option<StageValue>,
    params: &P,
) -> EvalResult<StageValue> {
    let value = match symbol {
        // Ternary
        OperatorSymbol::TernaryIf => return Ok(ternary_if(&operand(left), right)),
        OperatorSymbol::TernaryElse => return Ok(ternary_else(left, right)),
        OperatorSymbol::Separator => return Ok(separate(left, right)),

        // Leaves
        OperatorSymbol::Literal(value) => value.clone(),
        OperatorSymbol::Parameter(name) => {
            params.get(name).map_err(|err| parameter_failed(name, err))?
        }

        // Calls
        OperatorSymbol::Function(function) => call_function(function, right)?,

        // Arithmetic
        OperatorSymbol::Add => add(symbol, &operand(left), &operand(right))?,
        OperatorSymbol::Sub => numeric(symbol, &operand(left), &operand(right), |a, b| a - b)?,
        OperatorSymbol::Mul => numeric(symbol, &operand(left), &operand(right), |a, b| a * b)?,
        OperatorSymbol::Div => numeric(symbol, &operand(left), &operand(right), |a, b| a / b)?,
        OperatorSymbol::Exp => numeric(symbol, &operand(left), &operand(right), f64::powf)?,
        OperatorSymbol::Mod => numeric(symbol, &operand(left), &operand(right), |a, b| a % b)?,

        // Comparison
        OperatorSymbol::Gte => ordering(symbol, &operand(left), &operand(right), |a, b| a >= b)?,
        OperatorSymbol::Gt => ordering(symbol, &operand(left), &operand(right), |a, b| a > b)?,
        OperatorSymbol::Lte => ordering(symbol, &operand(left), &operand(right), |a, b| a <= b)?,
        OperatorSymbol::Lt => ordering(symbol, &operand(left), &operand(right), |a, b| a < b)?,
        OperatorSymbol::Eq => Value::Bool(operand(left) == operand(right)),
        OperatorSymbol::NotEq => Value::Bool(operand(left) != operand(right)),

        // Logical
        OperatorSymbol::And => logical(symbol, &operand(left), &operand(right), |a, b| a && b)?,
        OperatorSymbol::Or => logical(symbol, &operand(left), &operand(right), |a, b| a || b)?,

        // Bitwise
        OperatorSymbol::BitOr => signed_bits(symbol, &operand(left), &operand(right), |a, b| a | b)?,
        OperatorSymbol::BitAnd => {
            signed_bits(symbol, &operand(left), &operand(right), |a, b| a & b)?
        }
        OperatorSymbol::BitXor => {
            signed_bits(symbol, &operand(left), &operand(right), |a, b| a ^ b)?
        }
        OperatorSymbol::Shl => unsigned_bits(symbol, &operand(left), &operand(right), shift_left)?,
        OperatorSymbol::Shr => {
            unsigned_bits(symbol, &operand(left), &operand(right), shift_right)?
        }

        // Prefix
        OperatorSymbol::Negate | OperatorSymbol::Invert | OperatorSymbol::BitNot => {
            evaluate_prefix(symbol, &operand(right))?
        }

        // Pattern matching
        OperatorSymbol::RegexMatch => {
            Value::Bool(regex_match(symbol, &operand(left), &operand(right))?)
        }
        OperatorSymbol::RegexNotMatch => {
            Value::Bool(!regex_match(symbol, &operand(left), &operand(right))?)
        }
    };
    Ok(StageValue::Value(value))
}

// Family helpers

/// Numeric addition, or concatenation of display forms when either side is
/// a string.
fn add(symbol: &OperatorSymbol, left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::string(format!("{left}{right}"))),
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Number(_), other) | (other, _) => Err(operand_mismatch(symbol, other)),
    }
}

fn numbers(symbol: &OperatorSymbol, left: &Value, right: &Value) -> EvalResult<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        (Value::Number(_), other) | (other, _) => Err(operand_mismatch(symbol, other)),
    }
}

fn numeric(
    symbol: &OperatorSymbol,
    left: &Value,
    right: &Value,
    op: impl FnOnce(f64, f64) -> f64,
) -> EvalResult {
    let (a, b) = numbers(symbol, left, right)?;
    Ok(Value::Number(op(a, b)))
}

fn ordering(
    symbol: &OperatorSymbol,
    left: &Value,
    right: &Value,
    op: impl FnOnce(f64, f64) -> bool,
) -> EvalResult {
    let (a, b) = numbers(symbol, left, right)?;
    Ok(Value::Bool(op(a, b)))
}

fn logical(
    symbol: &OperatorSymbol,
    left: &Value,
    right: &Value,
    op: impl FnOnce(bool, bool) -> bool,
) -> EvalResult {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(op(*a, *b))),
        (Value::Bool(_), other) | (other, _) => Err(operand_mismatch(symbol, other)),
    }
}

/// `| & ^` over the signed 64-bit truncation of both operands.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "bitwise operators are defined over the i64 truncation"
)]
fn signed_bits(
    symbol: &OperatorSymbol,
    left: &Value,
    right: &Value,
    op: impl FnOnce(i64, i64) -> i64,
) -> EvalResult {
    let (a, b) = numbers(symbol, left, right)?;
    Ok(Value::Number(op(a as i64, b as i64) as f64))
}

/// `<< >>` over the unsigned 64-bit truncation of both operands.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "shifts are defined over the u64 truncation"
)]
fn unsigned_bits(
    symbol: &OperatorSymbol,
    left: &Value,
    right: &Value,
    op: impl FnOnce(u64, u64) -> u64,
) -> EvalResult {
    let (a, b) = numbers(symbol, left, right)?;
    Ok(Value::Number(op(a as u64, b as u64) as f64))
}

/// Shifting out every bit yields zero.
fn shift_left(value: u64, by: u64) -> u64 {
    u32::try_from(by)
        .ok()
        .and_then(|by| value.checked_shl(by))
        .unwrap_or(0)
}

fn shift_right(value: u64, by: u64) -> u64 {
    u32::try_from(by)
        .ok()
        .and_then(|by| value.checked_shr(by))
        .unwrap_or(0)
}

/// Match `left` against `right`, compiling `right` first when it is a string.
fn regex_match(symbol: &OperatorSymbol, left: &Value, right: &Value) -> EvalResult<bool> {
    let Value::Str(haystack) = left else {
        return Err(operand_mismatch(symbol, left));
    };
    match right {
        Value::Pattern(pattern) => Ok(pattern.is_match(haystack)),
        Value::Str(source) => regex::Regex::new(source)
            .map(|pattern| pattern.is_match(haystack))
            .map_err(|err| pattern_compile_failed(source, err)),
        other => Err(operand_mismatch(symbol, other)),
    }
}

// Ternary

fn ternary_if(condition: &Value, then: Option<StageValue>) -> StageValue {
    match condition {
        Value::Bool(true) => StageValue::Value(operand(then)),
        _ => StageValue::Untaken,
    }
}

fn ternary_else(chosen: Option<StageValue>, otherwise: Option<StageValue>) -> StageValue {
    match chosen {
        Some(StageValue::Untaken) | None => otherwise.unwrap_or(StageValue::Value(Value::Nil)),
        Some(taken) => taken,
    }
}

// Calls

/// Apply `function` to zero, one or many arguments.
///
/// No operand is a zero-argument call; separator output is spread; any
/// other value, sequences included, is the single argument.
fn call_function(function: &ExpressionFunction, args: Option<StageValue>) -> EvalResult {
    let result = match args {
        None => function.call(&[]),
        Some(StageValue::Args(items)) => function.call(&items),
        Some(single) => function.call(std::slice::from_ref(&single.into_value())),
    };
    tracing::trace!(function = function.name(), ok = result.is_ok(), "function called");
    result.map_err(|err| function_failed(function, err))
}

/// Concatenate separator operands into one argument list.
///
/// Only lists built by nested separators are spliced.
fn separate(left: Option<StageValue>, right: Option<StageValue>) -> StageValue {
    let mut args = Vec::new();
    for side in [left, right].into_iter().flatten() {
        match side {
            StageValue::Args(items) => args.extend(items),
            other => args.push(other.into_value()),
        }
    }
    StageValue::Args(args)
}
