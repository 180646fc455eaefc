//! The compiled expression tree.
//!
//! A [`StageNode`] owns its children outright; the tree has no sharing and
//! no cycles. Catalog behaviour (arity, type policy, template) is read from
//! the symbol on demand rather than copied into the node, so the two can
//! never drift apart.
//!
//! # Construction vs. evaluation
//!
//! Parsers build trees through the checked constructors here, which enforce
//! the child layout of each symbol's [`Arity`]. The only mutation offered is
//! [`StageNode::swap_with`]/[`StageNode::swap_with_right_child`], used while
//! re-balancing for precedence. Evaluation takes `&StageNode` and never
//! mutates anything.

use std::sync::Arc;

use crate::{Arity, ExpressionFunction, OperatorSymbol, Value};

/// A node's children do not match its symbol's arity.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("operator '{symbol}' takes no left operand")]
    UnexpectedLeft { symbol: &'static str },
    #[error("operator '{symbol}' takes no right operand")]
    UnexpectedRight { symbol: &'static str },
    #[error("operator '{symbol}' requires a left operand")]
    MissingLeft { symbol: &'static str },
    #[error("operator '{symbol}' requires a right operand")]
    MissingRight { symbol: &'static str },
    #[error("cannot swap '{this}' with '{other}': operators differ in arity")]
    ArityMismatch {
        this: &'static str,
        other: &'static str,
    },
}

/// One stage of a compiled expression.
#[derive(Debug)]
pub struct StageNode {
    symbol: OperatorSymbol,
    left: Option<Box<StageNode>>,
    right: Option<Box<StageNode>>,
}

impl StageNode {
    /// Build a node, checking the children against the symbol's arity.
    pub fn new(
        symbol: OperatorSymbol,
        left: Option<StageNode>,
        right: Option<StageNode>,
    ) -> Result<Self, ShapeError> {
        let name = symbol.as_symbol();
        match (symbol.arity(), left.is_some(), right.is_some()) {
            (Arity::Leaf | Arity::Prefix | Arity::Call, true, _) => {
                return Err(ShapeError::UnexpectedLeft { symbol: name });
            }
            (Arity::Leaf, false, true) => {
                return Err(ShapeError::UnexpectedRight { symbol: name });
            }
            (Arity::Prefix, false, false) => {
                return Err(ShapeError::MissingRight { symbol: name });
            }
            (Arity::Infix, false, _) => return Err(ShapeError::MissingLeft { symbol: name }),
            (Arity::Infix, true, false) => {
                return Err(ShapeError::MissingRight { symbol: name });
            }
            (Arity::Leaf, false, false)
            | (Arity::Prefix, false, true)
            | (Arity::Call, false, _)
            | (Arity::Infix, true, true) => {}
        }
        Ok(Self {
            symbol,
            left: left.map(Box::new),
            right: right.map(Box::new),
        })
    }

    /// Constant leaf.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::leaf(OperatorSymbol::Literal(value.into()))
    }

    /// Parameter reference leaf.
    pub fn parameter(name: impl Into<Arc<str>>) -> Self {
        Self::leaf(OperatorSymbol::Parameter(name.into()))
    }

    /// Function call. `args` is absent for a zero-argument call, a single
    /// expression for one argument, or a separator chain for several.
    pub fn call(function: ExpressionFunction, args: Option<StageNode>) -> Self {
        Self {
            symbol: OperatorSymbol::Function(function),
            left: None,
            right: args.map(Box::new),
        }
    }

    /// Prefix operator applied to `operand`.
    pub fn prefix(symbol: OperatorSymbol, operand: StageNode) -> Result<Self, ShapeError> {
        Self::new(symbol, None, Some(operand))
    }

    /// Binary operator over `left` and `right`.
    pub fn infix(
        symbol: OperatorSymbol,
        left: StageNode,
        right: StageNode,
    ) -> Result<Self, ShapeError> {
        Self::new(symbol, Some(left), Some(right))
    }

    fn leaf(symbol: OperatorSymbol) -> Self {
        Self {
            symbol,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn symbol(&self) -> &OperatorSymbol {
        &self.symbol
    }

    #[inline]
    pub fn left(&self) -> Option<&StageNode> {
        self.left.as_deref()
    }

    #[inline]
    pub fn right(&self) -> Option<&StageNode> {
        self.right.as_deref()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1_usize)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(node.left().map(|n| (n, depth + 1)));
            pending.extend(node.right().map(|n| (n, depth + 1)));
        }
        deepest
    }

    /// Exchange operators with `other`, leaving both nodes' children where
    /// they are.
    ///
    /// Both symbols must share an arity, so neither node ends up with a
    /// child layout its new symbol rejects.
    pub fn swap_with(&mut self, other: &mut StageNode) -> Result<(), ShapeError> {
        check_swappable(&self.symbol, &other.symbol)?;
        std::mem::swap(&mut self.symbol, &mut other.symbol);
        Ok(())
    }

    /// [`swap_with`](Self::swap_with) against this node's own right child.
    ///
    /// Returns `Ok(false)` when there is no right child.
    pub fn swap_with_right_child(&mut self) -> Result<bool, ShapeError> {
        let Some(child) = self.right.as_deref_mut() else {
            return Ok(false);
        };
        check_swappable(&self.symbol, &child.symbol)?;
        std::mem::swap(&mut self.symbol, &mut child.symbol);
        Ok(true)
    }
}

fn check_swappable(this: &OperatorSymbol, other: &OperatorSymbol) -> Result<(), ShapeError> {
    if this.arity() == other.arity() {
        Ok(())
    } else {
        Err(ShapeError::ArityMismatch {
            this: this.as_symbol(),
            other: other.as_symbol(),
        })
    }
}

// Tear down iteratively; the default drop glue recurses once per level.
/// Post-order copy with an explicit work list, so cloning a deep tree uses
/// constant native stack.
impl Clone for StageNode {
    fn clone(&self) -> Self {
        let mut pending: Vec<(&StageNode, bool)> = vec![(self, false)];
        let mut built: Vec<StageNode> = Vec::new();
        while let Some((node, children_built)) = pending.pop() {
            if !children_built {
                pending.push((node, true));
                pending.extend(node.right.as_deref().map(|child| (child, false)));
                pending.extend(node.left.as_deref().map(|child| (child, false)));
                continue;
            }
            let right = node.right.is_some().then(|| built.pop()).flatten();
            let left = node.left.is_some().then(|| built.pop()).flatten();
            built.push(StageNode {
                symbol: node.symbol.clone(),
                left: left.map(Box::new),
                right: right.map(Box::new),
            });
        }
        built.pop().unwrap_or_else(|| StageNode::leaf(self.symbol.clone()))
    }
}

impl Drop for StageNode {
    fn drop(&mut self) {
        let mut pending: Vec<Box<StageNode>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}
