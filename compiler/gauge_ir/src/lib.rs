//! Gauge IR - compiled expression trees and the values that flow through them.
//!
//! # Architecture
//!
//! - [`Value`]: tagged runtime datum (number, bool, string, pattern,
//!   sequence, nil)
//! - [`OperatorSymbol`]: the closed operator catalog. Each variant knows its
//!   display text, arity, operand type policy and type-error template.
//! - [`StageNode`]: an owned binary tree of symbols. Built once by a parser,
//!   immutable afterwards, shareable across threads.
//! - [`ExpressionFunction`]: a caller-supplied variadic function embedded in
//!   a call stage.
//!
//! Evaluation lives in `gauge_eval`; this crate holds no behaviour beyond
//! the data model and its invariants.

mod function;
mod node;
mod symbol;
mod value;

pub use function::{ExpressionFunction, FunctionError};
pub use node::{ShapeError, StageNode};
pub use symbol::{
    Arity, CombinedCheck, OperandKind, OperatorSymbol, TypeErrorTemplate, TypePolicy,
};
pub use value::{Pattern, Value};
