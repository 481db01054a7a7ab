//! Document - High-level document API
//!
//! [`Document`] owns the tree and the native listener table; [`Dom`] is the
//! shared single-threaded handle everything else holds.

use crate::{DomError, DomResult, DomTree, Event, EventListener, EventPhase, NodeId};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Native listeners per node, in registration order
    listeners: HashMap<NodeId, Vec<(String, EventListener)>>,
}

impl Document {
    /// Create a document with the html/head/body skeleton
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.alloc_element("html");
        let head = tree.alloc_element("head");
        let body = tree.alloc_element("body");

        tree.link_before(tree.root(), html, NodeId::NONE);
        tree.link_before(html, head, NodeId::NONE);
        tree.link_before(html, body, NodeId::NONE);

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
            listeners: HashMap::new(),
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| {
                self.tree
                    .get(n)
                    .and_then(|n| n.as_element())
                    .and_then(|e| e.id())
                    == Some(id)
            })
    }

    /// Snapshot of the listeners registered on `node` for `event_type`
    pub fn listeners_for(&self, node: NodeId, event_type: &str) -> Vec<EventListener> {
        self.listeners
            .get(&node)
            .map(|list| {
                list.iter()
                    .filter(|(t, _)| t == event_type)
                    .map(|(_, l)| l.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners
            .get(&node)
            .map_or(0, |list| list.iter().filter(|(t, _)| t == event_type).count())
    }

    fn add_listener(&mut self, node: NodeId, event_type: &str, listener: &EventListener) -> bool {
        let list = self.listeners.entry(node).or_default();
        if list.iter().any(|(t, l)| t == event_type && l.ptr_eq(listener)) {
            return false;
        }
        list.push((event_type.to_string(), listener.clone()));
        true
    }

    fn remove_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: &EventListener,
    ) -> bool {
        let Some(list) = self.listeners.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|(t, l)| !(t == event_type && l.ptr_eq(listener)));
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(&node);
        }
        removed
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a [`Document`]
#[derive(Debug, Clone)]
pub struct Dom(Rc<RefCell<Document>>);

/// Non-owning handle; listeners stored inside the document hold these
#[derive(Debug, Clone)]
pub struct WeakDom(Weak<RefCell<Document>>);

impl Dom {
    /// New document with the html/head/body skeleton
    pub fn new() -> Self {
        Self::from_document(Document::new())
    }

    pub fn from_document(document: Document) -> Self {
        Self(Rc::new(RefCell::new(document)))
    }

    /// Borrow the document. Panics if it is mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Document> {
        self.0.borrow()
    }

    /// Mutably borrow the document. Panics if it is borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Document> {
        self.0.borrow_mut()
    }

    pub fn try_borrow_mut(&self) -> Option<RefMut<'_, Document>> {
        self.0.try_borrow_mut().ok()
    }

    pub fn downgrade(&self) -> WeakDom {
        WeakDom(Rc::downgrade(&self.0))
    }

    /// Same document
    pub fn ptr_eq(&self, other: &Dom) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// `addEventListener`; returns false if this exact listener was already
    /// registered for `event_type` on `node`
    pub fn add_event_listener(
        &self,
        node: NodeId,
        event_type: &str,
        listener: &EventListener,
    ) -> DomResult<bool> {
        let mut doc = self.borrow_mut();
        doc.tree.node(node)?;
        Ok(doc.add_listener(node, event_type, listener))
    }

    /// `removeEventListener`, matched by listener identity
    pub fn remove_event_listener(
        &self,
        node: NodeId,
        event_type: &str,
        listener: &EventListener,
    ) -> bool {
        self.borrow_mut().remove_listener(node, event_type, listener)
    }

    /// `dispatchEvent`. Runs listeners on the target, then on each ancestor
    /// when the event bubbles. Returns false if the default was prevented.
    ///
    /// The document is not borrowed while a listener runs. Each node's
    /// listener list is snapshotted before its listeners are called, so
    /// listeners added or removed meanwhile take effect on the next dispatch.
    pub fn dispatch_event(&self, target: NodeId, event: &mut Event) -> DomResult<bool> {
        let path: Vec<NodeId> = {
            let doc = self.borrow();
            if doc.tree.get(target).is_none() {
                return Err(DomError::NotFound(target));
            }
            if event.bubbles() {
                doc.tree.ancestors(target).collect()
            } else {
                vec![target]
            }
        };

        tracing::trace!(
            event = event.event_type(),
            %target,
            path = path.len(),
            "dispatching event"
        );

        event.target = target;
        for (depth, node) in path.into_iter().enumerate() {
            let listeners = self.borrow().listeners_for(node, event.event_type());
            event.current_target = node;
            event.phase = if depth == 0 {
                EventPhase::AtTarget
            } else {
                EventPhase::Bubbling
            };
            for listener in listeners {
                listener.call(event, node);
                if event.is_immediate_propagation_stopped() {
                    break;
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        event.current_target = NodeId::NONE;
        event.phase = EventPhase::None;
        Ok(!event.is_default_prevented())
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl WeakDom {
    pub fn upgrade(&self) -> Option<Dom> {
        self.0.upgrade().map(Dom)
    }
}
