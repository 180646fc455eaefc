//! Operand type gate.
//!
//! Runs the symbol's [`TypePolicy`] against both operands before the
//! operator body sees them. A combined predicate, when present, replaces the
//! per-side predicates. Missing operands are checked as nil.

use gauge_ir::{OperatorSymbol, TypeErrorTemplate, TypePolicy, Value};

use crate::errors::{type_mismatch, EvalResult};
use crate::operators::StageValue;

static NIL: Value = Value::Nil;

/// [`check_operands`] over stage results. Unchecked symbols never build an
/// operand view.
pub(crate) fn check_stage_operands(
    symbol: &OperatorSymbol,
    left: Option<&StageValue>,
    right: Option<&StageValue>,
) -> EvalResult<()> {
    if symbol.type_policy() == TypePolicy::Unchecked {
        return Ok(());
    }
    let left = left.map(StageValue::to_operand);
    let right = right.map(StageValue::to_operand);
    check_operands(symbol, left.as_deref(), right.as_deref())
}

/// Check `left`/`right` against `symbol`'s policy.
///
/// On failure the error names the first offending operand, left before
/// right.
pub(crate) fn check_operands(
    symbol: &OperatorSymbol,
    left: Option<&Value>,
    right: Option<&Value>,
) -> EvalResult<()> {
    let left = left.unwrap_or(&NIL);
    let right = right.unwrap_or(&NIL);

    let offending = match symbol.type_policy() {
        TypePolicy::Unchecked => None,
        TypePolicy::Combined(check) => {
            (!check.accepts(left, right)).then(|| check.culprit(left, right))
        }
        TypePolicy::Sides {
            left: left_kind,
            right: right_kind,
        } => {
            if left_kind.is_some_and(|kind| !kind.accepts(left)) {
                Some(left)
            } else if right_kind.is_some_and(|kind| !kind.accepts(right)) {
                Some(right)
            } else {
                None
            }
        }
    };

    let Some(value) = offending else {
        return Ok(());
    };
    // Every checked symbol carries a template; see the catalog tests.
    let template = symbol
        .error_template()
        .unwrap_or(TypeErrorTemplate::Modifier);
    Err(type_mismatch(template, value, symbol))
}
