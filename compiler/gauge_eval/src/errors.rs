//! Evaluation errors.
//!
//! # Categories
//!
//! - [`TypeError`]: an operand failed its symbol's acceptance policy. Always
//!   raised before the operator body runs.
//! - [`RuntimeError`]: raised by operator logic. Covers pattern compilation,
//!   parameter lookup, external function failure, and the depth guard.
//!
//! Factory functions below are the construction API. They are `#[cold]`
//! and emit a `debug` event, so every runtime failure shows up in traces at
//! the point it was raised.

use gauge_ir::{ExpressionFunction, FunctionError, OperatorSymbol, TypeErrorTemplate, Value};

use crate::parameters::ParameterError;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// The single error an evaluation can end with.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl EvalError {
    #[inline]
    pub fn is_type_error(&self) -> bool {
        matches!(self, EvalError::Type(_))
    }

    #[inline]
    pub fn is_runtime_error(&self) -> bool {
        matches!(self, EvalError::Runtime(_))
    }

    pub fn as_type_error(&self) -> Option<&TypeError> {
        match self {
            EvalError::Type(err) => Some(err),
            EvalError::Runtime(_) => None,
        }
    }

    pub fn as_runtime_error(&self) -> Option<&RuntimeError> {
        match self {
            EvalError::Runtime(err) => Some(err),
            EvalError::Type(_) => None,
        }
    }
}

/// An operand was rejected by the type policy of `symbol`.
///
/// `message` is `template` rendered with `value` and `symbol`; it is kept
/// alongside the parts so callers can match structurally or log verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TypeError {
    pub template: TypeErrorTemplate,
    /// Display form of the offending operand.
    pub value: String,
    /// Display text of the operator.
    pub symbol: &'static str,
    pub message: String,
}

/// Failure raised while an operator was running.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Unable to compile regexp pattern '{pattern}': {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("{source}")]
    Function {
        name: String,
        #[source]
        source: FunctionError,
    },
    #[error("expression exceeds the maximum evaluation depth of {limit}")]
    DepthLimitExceeded { limit: usize },
}

// Type errors

/// `value` failed the policy of `symbol`; render it with `template`.
#[cold]
pub fn type_mismatch(
    template: TypeErrorTemplate,
    value: &Value,
    symbol: &OperatorSymbol,
) -> EvalError {
    let value = value.to_string();
    let symbol = symbol.as_symbol();
    let message = template.render(&value, symbol);
    TypeError {
        template,
        value,
        symbol,
        message,
    }
    .into()
}

/// An operator body received a variant its type policy should have
/// rejected. Reported as the type error the policy would have produced.
#[cold]
pub(crate) fn operand_mismatch(symbol: &OperatorSymbol, value: &Value) -> EvalError {
    let template = symbol
        .error_template()
        .unwrap_or(TypeErrorTemplate::Modifier);
    type_mismatch(template, value, symbol)
}

// Runtime errors

#[cold]
pub fn pattern_compile_failed(pattern: &str, source: regex::Error) -> EvalError {
    tracing::debug!(pattern, error = %source, "pattern compile failed");
    RuntimeError::PatternCompile {
        pattern: pattern.to_owned(),
        source,
    }
    .into()
}

#[cold]
pub fn parameter_failed(name: &str, source: ParameterError) -> EvalError {
    tracing::debug!(parameter = name, error = %source, "parameter lookup failed");
    RuntimeError::Parameter(source).into()
}

#[cold]
pub fn function_failed(function: &ExpressionFunction, source: FunctionError) -> EvalError {
    tracing::debug!(function = function.name(), error = %source, "function call failed");
    RuntimeError::Function {
        name: function.name().to_owned(),
        source,
    }
    .into()
}

#[cold]
pub fn depth_limit_exceeded(limit: usize) -> EvalError {
    tracing::debug!(limit, "evaluation depth limit exceeded");
    RuntimeError::DepthLimitExceeded { limit }.into()
}
