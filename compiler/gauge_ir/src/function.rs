//! External functions embedded in call stages.

use std::fmt;
use std::sync::Arc;

use crate::Value;

/// Error returned by an external function.
pub type FunctionError = Box<dyn std::error::Error + Send + Sync>;

type FunctionBody = dyn Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync;

/// A named, variadic function supplied by the embedding application.
///
/// Cloning shares the underlying closure. The closure must be `Send + Sync`
/// because a compiled tree may be evaluated from several threads at once.
#[derive(Clone)]
pub struct ExpressionFunction {
    name: Arc<str>,
    body: Arc<FunctionBody>,
}

impl ExpressionFunction {
    pub fn new<F>(name: impl Into<Arc<str>>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function with `args`.
    #[inline]
    pub fn call(&self, args: &[Value]) -> Result<Value, FunctionError> {
        (self.body)(args)
    }
}

impl fmt::Debug for ExpressionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
