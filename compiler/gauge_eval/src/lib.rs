//! Gauge Eval - evaluator for compiled Gauge expression trees.
//!
//! # Architecture
//!
//! - [`Evaluator`]: recursive walk over a [`StageNode`], bounded by the
//!   depth limit in [`EvalConfig`] and backed by on-demand stack growth
//! - `check_operands`: the per-symbol operand type gate, run before every
//!   operator body
//! - `apply`: exhaustive enum dispatch over the operator catalog
//! - [`Parameters`]: caller-supplied name resolution for parameter leaves
//!
//! # Re-exports
//!
//! The data model from `gauge_ir` is re-exported so embedders can depend on
//! this crate alone:
//! - `Value`, `Pattern`, `OperatorSymbol`, `StageNode`, `ExpressionFunction`
//! - `EvalError`, `EvalResult`, `TypeError`, `RuntimeError`
//!
//! # Example
//!
//! ```
//! use gauge_eval::{evaluate, MapParameters, OperatorSymbol, StageNode, Value};
//!
//! // rate * 2 > 1
//! let tree = StageNode::infix(
//!     OperatorSymbol::Gt,
//!     StageNode::infix(
//!         OperatorSymbol::Mul,
//!         StageNode::parameter("rate"),
//!         StageNode::literal(2),
//!     )?,
//!     StageNode::literal(1),
//! )?;
//!
//! let params = MapParameters::new().with("rate", 0.75);
//! assert_eq!(evaluate(&tree, &params)?, Value::Bool(true));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
pub mod errors;
mod evaluator;
mod operators;
mod parameters;
mod type_check;
mod unary_operators;

#[cfg(test)]
mod tests;

pub use gauge_ir::{
    Arity, ExpressionFunction, FunctionError, OperatorSymbol, Pattern, ShapeError, StageNode,
    TypeErrorTemplate, TypePolicy, Value,
};

pub use config::{EvalConfig, DEFAULT_MAX_DEPTH};
pub use errors::{
    depth_limit_exceeded, function_failed, parameter_failed, pattern_compile_failed,
    type_mismatch, EvalError, EvalResult, RuntimeError, TypeError,
};
pub use evaluator::{evaluate, Evaluator};
pub use parameters::{MapParameters, NoParameters, ParameterError, Parameters};
pub use unary_operators::evaluate_prefix;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=gauge_eval=debug` or `RUST_LOG=gauge_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
