//! The operator catalog.
//!
//! The set of operators is fixed, so the catalog is an enum rather than a
//! table of callables: each query below is an exhaustive `match`, and adding
//! a symbol without deciding its arity, type policy and error template does
//! not compile.

use std::sync::Arc;

use crate::{ExpressionFunction, Value};

/// Operator carried by a [`StageNode`](crate::StageNode).
#[derive(Clone, Debug)]
pub enum OperatorSymbol {
    // Leaves
    /// Constant captured at construction.
    Literal(Value),
    /// Named lookup through the parameter resolver.
    Parameter(Arc<str>),

    // Calls
    /// External function applied to the right operand.
    Function(ExpressionFunction),
    /// Argument separator (`,`).
    Separator,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Exp,
    Mod,

    // Comparison
    Gte,
    Gt,
    Lte,
    Lt,
    Eq,
    NotEq,

    // Logical
    And,
    Or,

    // Bitwise
    BitOr,
    BitAnd,
    BitXor,
    Shl,
    Shr,

    // Prefix
    Negate,
    Invert,
    BitNot,

    // Pattern matching
    RegexMatch,
    RegexNotMatch,

    // Ternary
    TernaryIf,
    TernaryElse,
}

/// Child layout an operator requires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    /// No children.
    Leaf,
    /// Right child only.
    Prefix,
    /// Both children.
    Infix,
    /// Optional right child, no left child.
    Call,
}

/// Operand kind a side predicate accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperandKind {
    Number,
    Bool,
    Str,
    StrOrPattern,
}

impl OperandKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            OperandKind::Number => matches!(value, Value::Number(_)),
            OperandKind::Bool => matches!(value, Value::Bool(_)),
            OperandKind::Str => matches!(value, Value::Str(_)),
            OperandKind::StrOrPattern => matches!(value, Value::Str(_) | Value::Pattern(_)),
        }
    }
}

/// Predicate that needs both operands at once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CombinedCheck {
    /// Two numbers, or at least one string (concatenation).
    Addition,
}

impl CombinedCheck {
    pub fn accepts(self, left: &Value, right: &Value) -> bool {
        match self {
            CombinedCheck::Addition => {
                matches!((left, right), (Value::Number(_), Value::Number(_)))
                    || matches!(left, Value::Str(_))
                    || matches!(right, Value::Str(_))
            }
        }
    }

    /// The operand to name in the error when [`accepts`](Self::accepts)
    /// fails: the first side that could not take part on its own.
    pub fn culprit<'v>(self, left: &'v Value, right: &'v Value) -> &'v Value {
        match self {
            CombinedCheck::Addition => {
                if matches!(left, Value::Number(_)) {
                    right
                } else {
                    left
                }
            }
        }
    }
}

/// Operand acceptance policy for a symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypePolicy {
    /// Any operands.
    Unchecked,
    /// Independent per-side predicates; `None` accepts anything.
    Sides {
        left: Option<OperandKind>,
        right: Option<OperandKind>,
    },
    /// One predicate over both sides. Overrides per-side checks.
    Combined(CombinedCheck),
}

impl TypePolicy {
    const fn both(kind: OperandKind) -> Self {
        TypePolicy::Sides {
            left: Some(kind),
            right: Some(kind),
        }
    }

    const fn right(kind: OperandKind) -> Self {
        TypePolicy::Sides {
            left: None,
            right: Some(kind),
        }
    }
}

/// Message template for type violations, fixed per symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeErrorTemplate {
    Logical,
    Modifier,
    Comparator,
    Ternary,
    Prefix,
}

impl TypeErrorTemplate {
    /// Render the message for an offending `value` under operator `symbol`.
    pub fn render(self, value: &str, symbol: &str) -> String {
        match self {
            TypeErrorTemplate::Logical => format!(
                "Value '{value}' cannot be used with the logical operator '{symbol}', it is not a bool"
            ),
            TypeErrorTemplate::Modifier => format!(
                "Value '{value}' cannot be used with the modifier '{symbol}', it is not a number"
            ),
            TypeErrorTemplate::Comparator => format!(
                "Value '{value}' cannot be used with the comparator '{symbol}', it is not a number"
            ),
            TypeErrorTemplate::Ternary => format!(
                "Value '{value}' cannot be used with the ternary operator '{symbol}', it is not a bool"
            ),
            TypeErrorTemplate::Prefix => {
                format!("Value '{value}' cannot be used with the prefix '{symbol}'")
            }
        }
    }
}

impl OperatorSymbol {
    /// Display text, as quoted by error messages.
    pub const fn as_symbol(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Parameter(_) => "parameter",
            Self::Function(_) => "function",
            Self::Separator => ",",
            // Arithmetic
            Self::Add => "+",
            Self::Sub | Self::Negate => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Exp | Self::BitXor => "^",
            Self::Mod => "%",
            // Comparison
            Self::Gte => ">=",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Lt => "<",
            Self::Eq => "==",
            Self::NotEq => "!=",
            // Logical
            Self::And => "&&",
            Self::Or => "||",
            Self::Invert => "!",
            // Bitwise
            Self::BitOr => "|",
            Self::BitAnd => "&",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::BitNot => "~",
            // Pattern matching
            Self::RegexMatch => "=~",
            Self::RegexNotMatch => "!~",
            // Ternary
            Self::TernaryIf => "?",
            Self::TernaryElse => ":",
        }
    }

    pub const fn arity(&self) -> Arity {
        match self {
            Self::Literal(_) | Self::Parameter(_) => Arity::Leaf,
            Self::Function(_) => Arity::Call,
            Self::Negate | Self::Invert | Self::BitNot => Arity::Prefix,
            Self::Separator
            | Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Exp
            | Self::Mod
            | Self::Gte
            | Self::Gt
            | Self::Lte
            | Self::Lt
            | Self::Eq
            | Self::NotEq
            | Self::And
            | Self::Or
            | Self::BitOr
            | Self::BitAnd
            | Self::BitXor
            | Self::Shl
            | Self::Shr
            | Self::RegexMatch
            | Self::RegexNotMatch
            | Self::TernaryIf
            | Self::TernaryElse => Arity::Infix,
        }
    }

    pub const fn type_policy(&self) -> TypePolicy {
        match self {
            Self::Add => TypePolicy::Combined(CombinedCheck::Addition),
            Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Exp
            | Self::Mod
            | Self::BitOr
            | Self::BitAnd
            | Self::BitXor
            | Self::Shl
            | Self::Shr
            | Self::Gte
            | Self::Gt
            | Self::Lte
            | Self::Lt => TypePolicy::both(OperandKind::Number),
            Self::And | Self::Or => TypePolicy::both(OperandKind::Bool),
            Self::RegexMatch | Self::RegexNotMatch => TypePolicy::Sides {
                left: Some(OperandKind::Str),
                right: Some(OperandKind::StrOrPattern),
            },
            Self::Negate | Self::BitNot => TypePolicy::right(OperandKind::Number),
            Self::Invert => TypePolicy::right(OperandKind::Bool),
            Self::TernaryIf => TypePolicy::Sides {
                left: Some(OperandKind::Bool),
                right: None,
            },
            Self::Eq
            | Self::NotEq
            | Self::TernaryElse
            | Self::Separator
            | Self::Literal(_)
            | Self::Parameter(_)
            | Self::Function(_) => TypePolicy::Unchecked,
        }
    }

    /// Template used when [`type_policy`](Self::type_policy) rejects an
    /// operand. `None` for symbols that never type-check.
    pub const fn error_template(&self) -> Option<TypeErrorTemplate> {
        match self {
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Exp
            | Self::Mod
            | Self::BitOr
            | Self::BitAnd
            | Self::BitXor
            | Self::Shl
            | Self::Shr => Some(TypeErrorTemplate::Modifier),
            Self::Gte
            | Self::Gt
            | Self::Lte
            | Self::Lt
            | Self::Eq
            | Self::NotEq
            | Self::RegexMatch
            | Self::RegexNotMatch => Some(TypeErrorTemplate::Comparator),
            Self::And | Self::Or => Some(TypeErrorTemplate::Logical),
            Self::Negate | Self::Invert | Self::BitNot => Some(TypeErrorTemplate::Prefix),
            Self::TernaryIf => Some(TypeErrorTemplate::Ternary),
            Self::TernaryElse
            | Self::Separator
            | Self::Literal(_)
            | Self::Parameter(_)
            | Self::Function(_) => None,
        }
    }
}
