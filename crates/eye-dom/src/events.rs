//! DOM Events
//!
//! Native event objects and listeners. Dispatch itself lives on [`crate::Dom`]
//! because listeners must run without the document being borrowed.

use crate::NodeId;
use std::rc::Rc;

/// Event types whose native dispatch does not bubble
const NON_BUBBLING: &[&str] = &[
    "focus",
    "blur",
    "load",
    "unload",
    "beforeunload",
    "scroll",
    "resize",
    "mouseenter",
    "mouseleave",
    "pointerenter",
    "pointerleave",
    "play",
    "pause",
    "ended",
    "volumechange",
    "timeupdate",
    "error",
];

/// Whether `event_type` bubbles when created without explicit init options
pub fn default_bubbles(event_type: &str) -> bool {
    !NON_BUBBLING.contains(&event_type)
}

/// Phase of the dispatch the event is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    AtTarget,
    Bubbling,
}

/// Options for [`Event::with_init`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) phase: EventPhase,
    bubbles: bool,
    cancelable: bool,
    /// Free-form payload (`CustomEvent.detail`)
    pub detail: Option<String>,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create an event with the host's default bubbling for its type
    pub fn new(event_type: &str) -> Self {
        Self::with_init(
            event_type,
            EventInit {
                bubbles: default_bubbles(event_type),
                cancelable: true,
            },
        )
    }

    pub fn with_init(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: NodeId::NONE,
            current_target: NodeId::NONE,
            phase: EventPhase::None,
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            detail: None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Node the event was dispatched to (the origin)
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listeners are currently running
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop propagation to further nodes
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip the remaining listeners of the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

/// Native listener, called with the event and the node it is attached to.
///
/// Identity is the allocation: clones compare equal under [`ptr_eq`](Self::ptr_eq).
#[derive(Clone)]
pub struct EventListener {
    callback: Rc<dyn Fn(&mut Event, NodeId)>,
}

impl EventListener {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Event, NodeId) + 'static,
    {
        Self { callback: Rc::new(f) }
    }

    /// Invoke as if attached to `listening`
    pub fn call(&self, event: &mut Event, listening: NodeId) {
        (self.callback)(event, listening)
    }

    /// Same underlying callback
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListener")
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}
