use core::fmt;

use crate::syntax::NodeId;

use super::StaticType;

/// Asserts that `head` and `tail` are the same type.
///
/// `origin` is the node whose typing rule produced the constraint and is the
/// node blamed when the constraint cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub head: StaticType,
    pub tail: StaticType,
    pub origin: NodeId,
}

impl Constraint {
    pub fn new(head: StaticType, tail: StaticType, origin: NodeId) -> Self {
        Self { head, tail, origin }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.head, self.tail)
    }
}
