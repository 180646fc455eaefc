//! Runtime values for stage evaluation.
//!
//! Every operand and every result is a [`Value`]. Numbers are always `f64`;
//! integer inputs are widened on entry through the `From` impls, so operator
//! bodies never see more than one numeric representation.
//!
//! # Thread Safety
//!
//! Heap payloads are `Arc`-backed, which keeps `Value` cheap to clone and
//! `Send + Sync`. Literal values captured in a compiled tree are therefore
//! shared, not copied, between concurrent evaluations.

mod pattern;

use std::fmt;
use std::sync::Arc;

pub use pattern::Pattern;

/// Runtime value produced and consumed by stages.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Double-precision number.
    Number(f64),
    /// Boolean.
    Bool(bool),
    /// Immutable string.
    Str(Arc<str>),
    /// Pre-compiled regular expression.
    Pattern(Pattern),
    /// Ordered argument list built by separator stages.
    ///
    /// Only ever produced during evaluation; a tree never stores one.
    Sequence(Arc<[Value]>),
    /// Absent value.
    #[default]
    Nil,
}

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Create a sequence value.
    #[inline]
    pub fn sequence(items: Vec<Value>) -> Self {
        Value::Sequence(items.into())
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(&**items),
            _ => None,
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Kind name, for logs and diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Pattern(_) => "pattern",
            Value::Sequence(_) => "sequence",
            Value::Nil => "nil",
        }
    }
}

/// Value equality as used by `==` and `!=`.
///
/// Values of different kinds are never equal. Numbers follow IEEE 754, so
/// `NaN != NaN`. Patterns are equal when their source text is.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

/// Default display form.
///
/// This is the text string concatenation appends and the text type errors
/// quote, so it stays unadorned: strings are not quoted. Finite numbers use
/// plain decimal notation at any magnitude, never an exponent.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if n.is_sign_positive() { "+Inf" } else { "-Inf" })
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Pattern(p) => f.write_str(p.as_str()),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Nil => f.write_str("<nil>"),
        }
    }
}

// Conversions. All numeric inputs widen to f64.

macro_rules! lossless_number {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            #[inline]
            fn from(n: $t) -> Self {
                Value::Number(f64::from(n))
            }
        })*
    };
}

macro_rules! widening_number {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            #[inline]
            #[allow(clippy::cast_precision_loss, reason = "parameters are sanitized to f64 by contract")]
            fn from(n: $t) -> Self {
                Value::Number(n as f64)
            }
        })*
    };
}

lossless_number!(f64, f32, i8, i16, i32, u8, u16, u32);
widening_number!(i64, u64, isize, usize);

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Pattern> for Value {
    #[inline]
    fn from(p: Pattern) -> Self {
        Value::Pattern(p)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Value::sequence(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
