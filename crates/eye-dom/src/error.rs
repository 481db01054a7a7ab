//! DOM Errors

use crate::NodeId;
use thiserror::Error;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// Node id does not refer to a node of this tree
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// Insertion would create a cycle or target a node that cannot hold children
    #[error("hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Operation requires an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    #[error("invalid tag name {0:?}")]
    InvalidTagName(String),
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {ch:?} at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    /// Name expected after `#`, `.` or `[`
    #[error("expected a name at offset {pos}")]
    ExpectedIdent { pos: usize },
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    /// Combinator with nothing on one side (`> a`, `a >`, `a,,b`)
    #[error("combinator is missing an operand")]
    DanglingCombinator,
}
