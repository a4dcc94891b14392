//! Check trees - boolean expressions gating which line an NPC says.
//!
//! A tree is parsed once per check-port edge by the build pass. Leaves name a
//! check property; interior nodes combine their operands with NOT or one of
//! the binary operations. Evaluation is fail-closed: anything that cannot be
//! resolved reads as `false`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Guid, PropertyId};

/// Binary boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperation {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
}

impl BinaryOperation {
    /// Combine two operand values.
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            BinaryOperation::And => a && b,
            BinaryOperation::Or => a || b,
            BinaryOperation::Xor => a ^ b,
            BinaryOperation::Nand => !(a && b),
            BinaryOperation::Nor => !(a || b),
            BinaryOperation::Xnor => !(a ^ b),
        }
    }
}

/// Which line is being checked or triggered. Passed through to game callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext<'a> {
    pub node: &'a Guid,
    pub line_index: usize,
}

/// Answers check-property leaves.
///
/// `None` means the property has no registered predicate; the tree treats it
/// as `false`.
pub trait CheckResolver {
    fn resolve(&mut self, property: PropertyId, context: &LineContext<'_>) -> Option<bool>;
}

impl<F> CheckResolver for F
where
    F: FnMut(PropertyId, &LineContext<'_>) -> Option<bool>,
{
    fn resolve(&mut self, property: PropertyId, context: &LineContext<'_>) -> Option<bool> {
        self(property, context)
    }
}

impl CheckResolver for HashMap<PropertyId, bool> {
    fn resolve(&mut self, property: PropertyId, _context: &LineContext<'_>) -> Option<bool> {
        self.get(&property).copied()
    }
}

/// A boolean expression over check properties.
///
/// Subtrees are owned; trees are never shared and cannot be cyclic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CheckTree {
    /// A check property. `None` when the wire did not lead to a property node.
    Property(Option<PropertyId>),
    Not(Box<CheckTree>),
    Binary {
        operation: BinaryOperation,
        a: Box<CheckTree>,
        b: Box<CheckTree>,
    },
}

impl CheckTree {
    /// A leaf reading `property`.
    pub fn leaf(property: PropertyId) -> Self {
        CheckTree::Property(Some(property))
    }

    /// A leaf that always evaluates to `false`.
    pub fn dangling() -> Self {
        CheckTree::Property(None)
    }

    /// Negate `operand`.
    pub fn not(operand: CheckTree) -> Self {
        CheckTree::Not(Box::new(operand))
    }

    /// Combine two subtrees with `operation`.
    pub fn binary(operation: BinaryOperation, a: CheckTree, b: CheckTree) -> Self {
        CheckTree::Binary {
            operation,
            a: Box::new(a),
            b: Box::new(b),
        }
    }

    /// Evaluate the tree.
    ///
    /// Both operands of a binary node are always evaluated, so resolvers with
    /// side effects see every leaf exactly once per evaluation.
    pub fn evaluate<R>(&self, resolver: &mut R, context: &LineContext<'_>) -> bool
    where
        R: CheckResolver + ?Sized,
    {
        match self {
            CheckTree::Property(None) => false,
            CheckTree::Property(Some(property)) => {
                resolver.resolve(*property, context).unwrap_or(false)
            }
            CheckTree::Not(operand) => !operand.evaluate(resolver, context),
            CheckTree::Binary { operation, a, b } => {
                let a = a.evaluate(resolver, context);
                let b = b.evaluate(resolver, context);
                operation.apply(a, b)
            }
        }
    }

    /// Number of leaves, dangling ones included.
    pub fn leaf_count(&self) -> usize {
        match self {
            CheckTree::Property(_) => 1,
            CheckTree::Not(operand) => operand.leaf_count(),
            CheckTree::Binary { a, b, .. } => a.leaf_count() + b.leaf_count(),
        }
    }
}

/// Conjunction over a flat check list, as used by data without check trees.
pub fn evaluate_all<R>(checks: &[PropertyId], resolver: &mut R, context: &LineContext<'_>) -> bool
where
    R: CheckResolver + ?Sized,
{
    checks.iter().fold(true, |passed, property| {
        resolver.resolve(*property, context).unwrap_or(false) && passed
    })
}
