//! Stack growth for recursive stage evaluation.
//!
//! A compiled tree is evaluated by plain recursive descent, so the native
//! stack depth tracks the tree depth. Trees built from untrusted expressions
//! can be arbitrarily deep; wrapping each recursive step in
//! [`ensure_sufficient_stack`] moves the failure mode from a stack overflow
//! abort to whatever depth limit the evaluator enforces.
//!
//! - **Native targets**: `stacker` allocates a fresh segment when the
//!   remaining stack drops below the red zone.
//! - **WASM targets**: passthrough.

/// Grow the stack when less than this remains (100KB).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Size of each freshly allocated stack segment (1MB).
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
///
/// ```text
/// fn eval_stage(&self, node: &StageNode, depth: usize) -> EvalResult<StageValue> {
///     ensure_sufficient_stack(|| self.eval_stage_inner(node, depth))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: the runtime manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
