//! Tree-walking evaluator.
//!
//! Each stage evaluates its left child, then its right child, runs the type
//! gate over both results and finally applies its operator. The first error
//! anywhere aborts the walk; a failing left child means the right child is
//! never visited.

use gauge_ir::{StageNode, Value};
use gauge_stack::ensure_sufficient_stack;

use crate::config::EvalConfig;
use crate::errors::{depth_limit_exceeded, EvalResult};
use crate::operators::{apply, StageValue};
use crate::parameters::Parameters;
use crate::type_check::check_stage_operands;

/// Evaluates compiled trees under one [`EvalConfig`].
///
/// Holds no per-evaluation state, so one evaluator can serve any number of
/// threads and trees at once.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate `node` against `params`.
    ///
    /// Returns the root stage's value, or the first error raised. A root
    /// ternary whose condition was false and has no else-branch yields nil.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate<P: Parameters + ?Sized>(&self, node: &StageNode, params: &P) -> EvalResult {
        self.eval_stage(node, params, 1).map(StageValue::into_value)
    }

    /// Evaluate one stage at `depth` (the root is 1).
    fn eval_stage<P: Parameters + ?Sized>(
        &self,
        node: &StageNode,
        params: &P,
        depth: usize,
    ) -> EvalResult<StageValue> {
        if let Some(limit) = self.config.max_depth() {
            if depth > limit {
                return Err(depth_limit_exceeded(limit));
            }
        }
        ensure_sufficient_stack(|| self.eval_stage_inner(node, params, depth))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(symbol = node.symbol().as_symbol()))]
    fn eval_stage_inner<P: Parameters + ?Sized>(
        &self,
        node: &StageNode,
        params: &P,
        depth: usize,
    ) -> EvalResult<StageValue> {
        let left = node
            .left()
            .map(|child| self.eval_stage(child, params, depth + 1))
            .transpose()?;
        let right = node
            .right()
            .map(|child| self.eval_stage(child, params, depth + 1))
            .transpose()?;

        check_stage_operands(node.symbol(), left.as_ref(), right.as_ref())?;
        apply(node.symbol(), left, right, params)
    }
}

/// Evaluate `node` with the default configuration.
pub fn evaluate<P: Parameters + ?Sized>(node: &StageNode, params: &P) -> EvalResult<Value> {
    Evaluator::default().evaluate(node, params)
}
