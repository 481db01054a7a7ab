//! Event Delegation
//!
//! One relay listener per element and delegable event type forwards each
//! dispatch to the handlers registered for that type, filtered by whether
//! the event origin sits inside the handler's target selector.

use eye_dom::{Event, EventListener, NodeId, Selector, WeakDom};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;

/// Listener type accepted by `on`/`off`
pub type Handler = EventListener;

/// Event types that reach ancestors by bubbling and may be delegated
pub const DELEGABLE_EVENTS: &[&str] = &[
    "click",
    "dblclick",
    "submit",
    "input",
    "change",
    "keydown",
    "keyup",
    "keypress",
    "focusin",
    "focusout",
    "mousedown",
    "mouseup",
    "mousemove",
    "contextmenu",
    "auxclick",
    "wheel",
    "mouseover",
    "mouseout",
    "pointerdown",
    "pointerup",
    "pointermove",
    "pointerover",
    "pointerout",
    "gotpointercapture",
    "lostpointercapture",
    "pointercancel",
];

pub fn is_delegable(event_type: &str) -> bool {
    DELEGABLE_EVENTS.contains(&event_type)
}

/// Handler plus the selector the event origin must sit in
#[derive(Debug, Clone)]
pub struct DelegatedEntry {
    pub handler: Handler,
    pub target: Selector,
}

/// Delegated handlers of one element collection, per event type, in
/// registration order. Registering the same handler twice keeps both.
#[derive(Debug, Default)]
pub struct DelegationRegistry {
    entries: HashMap<String, Vec<DelegatedEntry>>,
}

impl DelegationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event_type: &str, target: Selector, handler: Handler) {
        self.entries
            .entry(event_type.to_string())
            .or_default()
            .push(DelegatedEntry { handler, target });
    }

    /// Drop every entry for `event_type` whose handler is `handler`
    pub fn remove(&mut self, event_type: &str, handler: &Handler) -> usize {
        let Some(list) = self.entries.get_mut(event_type) else {
            return 0;
        };
        let before = list.len();
        list.retain(|entry| !entry.handler.ptr_eq(handler));
        before - list.len()
    }

    /// Snapshot of the entries for `event_type`
    pub fn entries(&self, event_type: &str) -> Vec<DelegatedEntry> {
        self.entries.get(event_type).cloned().unwrap_or_default()
    }

    pub fn len(&self, event_type: &str) -> usize {
        self.entries.get(event_type).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

/// Build the relay listener for a registry.
///
/// Both handles are weak: once the owning collection or the document is gone
/// the relay does nothing.
pub(crate) fn relay(registry: Weak<RefCell<DelegationRegistry>>, dom: WeakDom) -> EventListener {
    EventListener::new(move |event: &mut Event, listening: NodeId| {
        let Some(registry) = registry.upgrade() else {
            return;
        };
        let entries = registry.borrow().entries(event.event_type());
        if entries.is_empty() {
            return;
        }
        let Some(dom) = dom.upgrade() else {
            return;
        };

        for entry in entries {
            let hit = dom.borrow().tree.closest(event.target(), &entry.target);
            if let Some(hit) = hit {
                tracing::trace!(
                    event = event.event_type(),
                    target = %entry.target,
                    %hit,
                    %listening,
                    "delegated handler matched"
                );
                entry.handler.call(event, listening);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        EventListener::new(|_, _| {})
    }

    #[test]
    fn test_allow_list() {
        assert!(is_delegable("click"));
        assert!(is_delegable("focusin"));
        assert!(!is_delegable("focus"));
        assert!(!is_delegable("load"));
        assert!(!is_delegable("mouseenter"));
    }

    #[test]
    fn test_insert_keeps_duplicates_in_order() {
        let mut registry = DelegationRegistry::new();
        let first = noop();
        let second = noop();
        registry.insert("click", Selector::parse(".a").unwrap(), first.clone());
        registry.insert("click", Selector::parse(".b").unwrap(), second.clone());
        registry.insert("click", Selector::parse(".a").unwrap(), first.clone());

        let entries = registry.entries("click");
        assert_eq!(entries.len(), 3);
        assert!(entries[0].handler.ptr_eq(&first));
        assert!(entries[1].handler.ptr_eq(&second));
        assert_eq!(entries[1].target.as_str(), ".b");
    }

    #[test]
    fn test_remove_by_identity() {
        let mut registry = DelegationRegistry::new();
        let keep = noop();
        let gone = noop();
        registry.insert("click", Selector::parse(".a").unwrap(), gone.clone());
        registry.insert("click", Selector::parse(".b").unwrap(), keep.clone());
        registry.insert("click", Selector::parse(".c").unwrap(), gone.clone());

        assert_eq!(registry.remove("click", &gone), 2);
        assert_eq!(registry.remove("input", &gone), 0);
        assert_eq!(registry.len("click"), 1);
        assert!(registry.entries("click")[0].handler.ptr_eq(&keep));
    }

    #[test]
    fn test_relay_is_inert_without_registry() {
        let registry = std::rc::Rc::new(RefCell::new(DelegationRegistry::new()));
        let dom = eye_dom::Dom::new();
        let listener = relay(std::rc::Rc::downgrade(&registry), dom.downgrade());
        drop(registry);
        listener.call(&mut Event::new("click"), NodeId::ROOT);
    }
}
