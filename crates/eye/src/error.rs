//! Wrapper Errors
//!
//! Misuse is reported through these values rather than by panicking.

use eye_dom::{DomError, SelectorError};
use thiserror::Error;

/// Result type for collection operations
pub type EyeResult<T> = Result<T, EyeError>;

/// Element collection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EyeError {
    /// Event names given a target selector that cannot be delegated.
    /// The other names of the same call were registered.
    #[error("delegation is not available for {events:?}")]
    NotDelegable { events: Vec<String> },
    /// The event list was empty
    #[error("no event name given")]
    MissingEvent,
    #[error("invalid selector {selector:?}: {source}")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },
    /// Nodes of one document were handed to a collection of another
    #[error("collections belong to different documents")]
    ForeignDocument,
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Template key parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template key {key:?} has no tag")]
    EmptyTag { key: String },
    #[error("template key {key:?} declares an empty slot name")]
    EmptySlotName { key: String },
    #[error("template key {key:?} has invalid tag {tag:?}")]
    InvalidTag { key: String, tag: String },
}

/// Model definition and refresh errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("model definition requires a descriptor with at least one element")]
    MissingDescriptor,
    #[error("slot {name:?} is declared more than once")]
    DuplicateSlot { name: String },
    /// The instance no longer carries the element for a slot
    #[error("slot {name:?} has no element in this instance")]
    SlotMissing { name: String },
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl EyeError {
    /// Wrap a host error and report it
    pub(crate) fn reported(err: DomError) -> Self {
        report(Self::from(err))
    }
}

impl ModelError {
    /// Wrap a host error and report it
    pub(crate) fn reported(err: DomError) -> Self {
        report(Self::from(err))
    }
}

/// Log a misuse at the call site and hand the error back for returning
pub(crate) fn report<E: std::fmt::Display>(err: E) -> E {
    tracing::error!(error = %err, "eye misuse");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use eye_dom::NodeId;

    #[test]
    fn test_reported_wraps_host_error() {
        let missing = DomError::NotFound(NodeId::ROOT);
        assert_eq!(
            EyeError::reported(missing.clone()),
            EyeError::Dom(missing.clone())
        );
        assert_eq!(ModelError::reported(missing.clone()), ModelError::Dom(missing));
    }
}
