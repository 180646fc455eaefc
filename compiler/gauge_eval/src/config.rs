//! Evaluator configuration.

/// Default ceiling on tree depth.
///
/// Far beyond any hand-written expression; low enough that a hostile tree
/// is rejected before it costs meaningful stack or time.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Evaluation policy shared by every call on an [`Evaluator`](crate::Evaluator).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    max_depth: Option<usize>,
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject trees deeper than `limit` stages with
    /// [`RuntimeError::DepthLimitExceeded`](crate::RuntimeError::DepthLimitExceeded).
    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Remove the depth ceiling. Recursion then relies on stack growth alone.
    #[must_use]
    pub fn unlimited_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Maximum tree depth, or `None` for unlimited.
    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}
