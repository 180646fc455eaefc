//! Parameter resolution.
//!
//! Parameter leaves ask a [`Parameters`] implementation for their value by
//! name. Storage is the embedder's concern; [`MapParameters`] is a plain
//! in-memory store for tests and simple hosts.

use std::error::Error;

use gauge_ir::Value;
use rustc_hash::FxHashMap;

/// Resolves parameter names to values during evaluation.
///
/// Implementations are called once per parameter leaf per evaluation and
/// receive `&self`, so one resolver may serve a single evaluation while the
/// tree itself is shared.
pub trait Parameters {
    fn get(&self, name: &str) -> Result<Value, ParameterError>;
}

impl<T: Parameters + ?Sized> Parameters for &T {
    #[inline]
    fn get(&self, name: &str) -> Result<Value, ParameterError> {
        (**self).get(name)
    }
}

/// A parameter could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("No parameter '{name}' found.")]
    Missing { name: String },
    /// Failure reported by a custom resolver.
    #[error(transparent)]
    Resolver(Box<dyn Error + Send + Sync>),
}

impl ParameterError {
    pub fn missing(name: impl Into<String>) -> Self {
        ParameterError::Missing { name: name.into() }
    }

    pub fn resolver(source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        ParameterError::Resolver(source.into())
    }
}

/// In-memory parameter store.
#[derive(Clone, Debug, Default)]
pub struct MapParameters {
    values: FxHashMap<String, Value>,
}

impl MapParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Parameters for MapParameters {
    fn get(&self, name: &str) -> Result<Value, ParameterError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| ParameterError::missing(name))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Resolver for expressions without parameters. Every lookup fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParameters;

impl Parameters for NoParameters {
    fn get(&self, name: &str) -> Result<Value, ParameterError> {
        Err(ParameterError::missing(name))
    }
}
