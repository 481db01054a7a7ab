//! eye DOM - Document Object Model
//!
//! Arena-based DOM tree with selector queries and native event dispatch.
//! This is the host surface the `eye` wrapper forwards to.

mod classlist;
mod dataset;
mod document;
mod error;
mod events;
mod node;
mod selector;
mod serialize;
mod tree;

pub use classlist::DOMTokenList;
pub use dataset::{to_attribute_name, to_camel_case};
pub use document::{Document, Dom, WeakDom};
pub use error::{DomError, DomResult, SelectorError};
pub use events::{default_bubbles, Event, EventInit, EventListener, EventPhase};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use selector::Selector;
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `Some(self)` unless this is the sentinel
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
