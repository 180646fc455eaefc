//! Prefix operator implementations.
//!
//! Prefix stages only use their right operand. Dispatch matches on the
//! `(symbol, operand)` pair; the type gate has already rejected bad operand
//! kinds, so the fallback arm only fires if a caller bypasses it.

use gauge_ir::{OperatorSymbol, Value};

use crate::errors::{operand_mismatch, EvalResult};

/// Evaluate `-x`, `!x` or `~x`.
pub fn evaluate_prefix(symbol: &OperatorSymbol, operand: &Value) -> EvalResult {
    match (symbol, operand) {
        (OperatorSymbol::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (OperatorSymbol::Invert, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (OperatorSymbol::BitNot, Value::Number(n)) => Ok(Value::Number(bit_not(*n))),
        _ => Err(operand_mismatch(symbol, operand)),
    }
}

/// Invert the signed 64-bit truncation of `n`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "bitwise operators are defined over the i64 truncation"
)]
fn bit_not(n: f64) -> f64 {
    !(n as i64) as f64
}
