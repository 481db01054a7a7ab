//! Element Collections
//!
//! [`Eye`] wraps zero or more elements of one document. Every collection
//! owns a delegation registry and attaches one relay listener per element
//! for each delegable event type.

use crate::delegation::{self, DELEGABLE_EVENTS, DelegationRegistry, Handler, is_delegable};
use crate::error::{EyeError, EyeResult, report};
use eye_dom::{Dom, DomError, Event, EventListener, NodeId, Selector};
use std::cell::RefCell;
use std::rc::Rc;

/// Construction options for [`Eye::create`]
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    classes: Vec<String>,
    id: Option<String>,
    text: Option<String>,
    data: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add whitespace-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        self.classes.extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// `dataset[key] = value`; `key` is camelCase
    pub fn data(mut self, key: &str, value: &str) -> Self {
        self.data.push((key.to_string(), value.to_string()));
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Append the new element to `parent`
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Collection of elements with event delegation
pub struct Eye {
    dom: Dom,
    nodes: Vec<NodeId>,
    registry: Rc<RefCell<DelegationRegistry>>,
    relay: EventListener,
}

impl Eye {
    /// Create one element
    pub fn create(dom: &Dom, tag: &str, attrs: Attrs) -> EyeResult<Self> {
        let node = {
            let mut doc = dom.borrow_mut();
            let tree = &mut doc.tree;
            let node = tree.create_element(tag).map_err(EyeError::reported)?;
            {
                let classes = tree
                    .class_list_mut(node)
                    .map_err(EyeError::reported)?;
                for class in &attrs.classes {
                    classes.add(class);
                }
            }
            if let Some(id) = &attrs.id {
                tree.set_attribute(node, "id", id)
                    .map_err(EyeError::reported)?;
            }
            for (name, value) in &attrs.attributes {
                tree.set_attribute(node, name, value)
                    .map_err(EyeError::reported)?;
            }
            for (key, value) in &attrs.data {
                tree.dataset_set(node, key, value)
                    .map_err(EyeError::reported)?;
            }
            if let Some(text) = &attrs.text {
                tree.set_text_content(node, text)
                    .map_err(EyeError::reported)?;
            }
            if let Some(parent) = attrs.parent {
                tree.append_child(parent, node)
                    .map_err(EyeError::reported)?;
            }
            node
        };
        Self::attach(dom, vec![node])
    }

    /// Every element of the document matching `selector`.
    ///
    /// A trailing `!` is accepted and ignored.
    pub fn select(dom: &Dom, selector: &str) -> EyeResult<Self> {
        let source = selector.trim().trim_end_matches('!');
        let parsed = parse_selector(source)?;
        let nodes = {
            let doc = dom.borrow();
            doc.tree.query_selector_all(doc.tree.root(), &parsed)
        };
        Self::attach(dom, nodes)
    }

    /// Wrap existing elements
    pub fn wrap(dom: &Dom, nodes: impl IntoIterator<Item = NodeId>) -> EyeResult<Self> {
        let nodes: Vec<NodeId> = nodes.into_iter().collect();
        {
            let doc = dom.borrow();
            for &node in &nodes {
                match doc.tree.get(node) {
                    None => return Err(EyeError::reported(DomError::NotFound(node))),
                    Some(n) if !n.is_element() => {
                        return Err(EyeError::reported(DomError::NotAnElement(node)));
                    }
                    Some(_) => {}
                }
            }
        }
        Self::attach(dom, nodes)
    }

    fn attach(dom: &Dom, nodes: Vec<NodeId>) -> EyeResult<Self> {
        let registry = Rc::new(RefCell::new(DelegationRegistry::new()));
        let relay = delegation::relay(Rc::downgrade(&registry), dom.downgrade());
        for &node in &nodes {
            for event_type in DELEGABLE_EVENTS {
                dom.add_event_listener(node, event_type, &relay)
                    .map_err(EyeError::reported)?;
            }
        }
        tracing::trace!(elements = nodes.len(), "collection attached");
        Ok(Self {
            dom: dom.clone(),
            nodes,
            registry,
            relay,
        })
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn each(&self, mut f: impl FnMut(usize, NodeId)) -> &Self {
        for (i, &node) in self.nodes.iter().enumerate() {
            f(i, node);
        }
        self
    }

    /// Register `handler` for each whitespace-separated name in `events`.
    ///
    /// Without `target` the handler becomes a native listener on every
    /// element. With `target` it is delegated: it runs when the event origin
    /// has an inclusive ancestor matching `target`. Names that cannot be
    /// delegated are reported together after the others are registered.
    pub fn on(&self, events: &str, target: Option<&str>, handler: &Handler) -> EyeResult<&Self> {
        let names: Vec<&str> = events.split_whitespace().collect();
        if names.is_empty() {
            return Err(report(EyeError::MissingEvent));
        }

        let Some(target) = target else {
            for name in &names {
                for &node in &self.nodes {
                    self.dom
                        .add_event_listener(node, name, handler)
                        .map_err(EyeError::reported)?;
                }
            }
            tracing::debug!(events, elements = self.nodes.len(), "direct listener added");
            return Ok(self);
        };

        let selector = parse_selector(target)?;
        let mut rejected = Vec::new();
        {
            let mut registry = self.registry.borrow_mut();
            for name in names {
                if is_delegable(name) {
                    registry.insert(name, selector.clone(), handler.clone());
                } else {
                    rejected.push(name.to_string());
                }
            }
        }
        tracing::debug!(events, target, "delegated listener added");

        if rejected.is_empty() {
            Ok(self)
        } else {
            Err(report(EyeError::NotDelegable { events: rejected }))
        }
    }

    /// Remove `handler` for each name in `events`, both as a native listener
    /// and from the delegation registry
    pub fn off(&self, events: &str, handler: &Handler) -> EyeResult<()> {
        let names: Vec<&str> = events.split_whitespace().collect();
        if names.is_empty() {
            return Err(report(EyeError::MissingEvent));
        }

        let mut direct = 0;
        let mut delegated = 0;
        for name in names {
            for &node in &self.nodes {
                if self.dom.remove_event_listener(node, name, handler) {
                    direct += 1;
                }
            }
            delegated += self.registry.borrow_mut().remove(name, handler);
        }
        tracing::debug!(events, direct, delegated, "listener removed");
        Ok(())
    }

    /// Dispatch a fresh `event_type` event on every element
    pub fn trigger(&self, event_type: &str) -> EyeResult<&Self> {
        for &node in &self.nodes {
            let mut event = Event::new(event_type);
            self.dom
                .dispatch_event(node, &mut event)
                .map_err(EyeError::reported)?;
        }
        Ok(self)
    }

    /// Delegated entries currently registered for `event_type`
    pub fn delegated_count(&self, event_type: &str) -> usize {
        self.registry.borrow().len(event_type)
    }

    /// Descendants of the elements matching `selector`, or `None` if there
    /// are none
    pub fn find(&self, selector: &str) -> EyeResult<Option<Eye>> {
        let parsed = parse_selector(selector)?;
        let found = {
            let doc = self.dom.borrow();
            let mut found: Vec<NodeId> = Vec::new();
            for &node in &self.nodes {
                for hit in doc.tree.query_selector_all(node, &parsed) {
                    if !found.contains(&hit) {
                        found.push(hit);
                    }
                }
            }
            found
        };
        if found.is_empty() {
            return Ok(None);
        }
        Self::attach(&self.dom, found).map(Some)
    }

    /// Text of the first element
    pub fn text(&self) -> String {
        self.first()
            .map(|node| self.dom.borrow().tree.text_content(node))
            .unwrap_or_default()
    }

    pub fn set_text(&self, text: &str) -> EyeResult<&Self> {
        let mut doc = self.dom.borrow_mut();
        for &node in &self.nodes {
            doc.tree
                .set_text_content(node, text)
                .map_err(EyeError::reported)?;
        }
        Ok(self)
    }

    /// Attribute of the first element
    pub fn attr(&self, name: &str) -> Option<String> {
        let node = self.first()?;
        self.dom.borrow().tree.get_attribute(node, name)
    }

    pub fn set_attr(&self, name: &str, value: &str) -> EyeResult<&Self> {
        let mut doc = self.dom.borrow_mut();
        for &node in &self.nodes {
            doc.tree
                .set_attribute(node, name, value)
                .map_err(EyeError::reported)?;
        }
        Ok(self)
    }

    /// Append the elements of `other` to the first element of this collection
    pub fn append(&self, other: &Eye) -> EyeResult<&Self> {
        if !self.dom.ptr_eq(&other.dom) {
            return Err(report(EyeError::ForeignDocument));
        }
        let Some(parent) = self.first() else {
            return Ok(self);
        };
        let mut doc = self.dom.borrow_mut();
        for &child in &other.nodes {
            doc.tree
                .append_child(parent, child)
                .map_err(EyeError::reported)?;
        }
        Ok(self)
    }

    /// Append every element (or a deep copy of it when `clone`) to `parent`
    pub fn append_to(&self, parent: NodeId, clone: bool) -> EyeResult<&Self> {
        let mut doc = self.dom.borrow_mut();
        for &node in &self.nodes {
            let child = if clone {
                doc.tree
                    .clone_node(node, true)
                    .map_err(EyeError::reported)?
            } else {
                node
            };
            doc.tree
                .append_child(parent, child)
                .map_err(EyeError::reported)?;
        }
        Ok(self)
    }

    /// Deep copies of the elements as a new collection, appended to
    /// `parent` when given
    pub fn clone_into(&self, parent: Option<NodeId>) -> EyeResult<Eye> {
        let copies = {
            let mut doc = self.dom.borrow_mut();
            let mut copies = Vec::with_capacity(self.nodes.len());
            for &node in &self.nodes {
                let copy = doc
                    .tree
                    .clone_node(node, true)
                    .map_err(EyeError::reported)?;
                if let Some(parent) = parent {
                    doc.tree
                        .append_child(parent, copy)
                        .map_err(EyeError::reported)?;
                }
                copies.push(copy);
            }
            copies
        };
        Self::attach(&self.dom, copies)
    }

    /// Detach every element from its parent
    pub fn remove(&self) -> EyeResult<&Self> {
        let mut doc = self.dom.borrow_mut();
        for &node in &self.nodes {
            doc.tree.detach(node).map_err(EyeError::reported)?;
        }
        Ok(self)
    }

    /// Markup inside the first element
    pub fn html(&self) -> String {
        self.first()
            .map(|node| self.dom.borrow().tree.inner_html(node))
            .unwrap_or_default()
    }
}

impl Drop for Eye {
    fn drop(&mut self) {
        if self.dom.try_borrow_mut().is_none() {
            tracing::warn!(
                elements = self.nodes.len(),
                "document busy, relay listeners left attached"
            );
            return;
        }
        for &node in &self.nodes {
            for event_type in DELEGABLE_EVENTS {
                self.dom.remove_event_listener(node, event_type, &self.relay);
            }
        }
    }
}

impl std::fmt::Debug for Eye {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Eye")
            .field("nodes", &self.nodes)
            .field("registry", &self.registry.borrow())
            .finish()
    }
}

fn parse_selector(source: &str) -> EyeResult<Selector> {
    Selector::parse(source).map_err(|source_err| {
        report(EyeError::Selector {
            selector: source.to_string(),
            source: source_err,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Handler, Rc<Cell<u32>>) {
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        (EventListener::new(move |_, _| seen.set(seen.get() + 1)), hits)
    }

    fn body(dom: &Dom) -> NodeId {
        dom.borrow().body()
    }

    #[test]
    fn test_create_applies_attrs() {
        let dom = Dom::new();
        let attrs = Attrs::new()
            .class("card wide")
            .id("main")
            .text("hello")
            .data("userName", "ann")
            .attr("title", "tip")
            .parent(body(&dom));
        let eye = Eye::create(&dom, "div", attrs).unwrap();
        let node = eye.first().unwrap();

        let doc = dom.borrow();
        assert_eq!(doc.tree.parent(node), Some(doc.body()));
        assert_eq!(doc.tree.get_attribute(node, "class").as_deref(), Some("card wide"));
        assert_eq!(doc.get_element_by_id("main"), Some(node));
        assert_eq!(doc.tree.get_attribute(node, "data-user-name").as_deref(), Some("ann"));
        assert_eq!(doc.tree.get_attribute(node, "title").as_deref(), Some("tip"));
        assert_eq!(doc.tree.text_content(node), "hello");
    }

    #[test]
    fn test_create_rejects_text_parent() {
        let dom = Dom::new();
        let text = dom.borrow_mut().tree.create_text("x");
        let err = Eye::create(&dom, "div", Attrs::new().parent(text)).unwrap_err();
        assert!(matches!(err, EyeError::Dom(DomError::HierarchyRequest { .. })));
    }

    #[test]
    fn test_select_strips_bang() {
        let dom = Dom::new();
        let parent = body(&dom);
        Eye::create(&dom, "p", Attrs::new().class("x").parent(parent)).unwrap();
        Eye::create(&dom, "p", Attrs::new().class("x").parent(parent)).unwrap();

        assert_eq!(Eye::select(&dom, "p.x!").unwrap().len(), 2);
        assert!(Eye::select(&dom, "span").unwrap().is_empty());
        assert!(matches!(
            Eye::select(&dom, "p >"),
            Err(EyeError::Selector { .. })
        ));
    }

    #[test]
    fn test_relay_attached_per_delegable_type() {
        let dom = Dom::new();
        let eye = Eye::create(&dom, "div", Attrs::new()).unwrap();
        let node = eye.first().unwrap();
        assert_eq!(dom.borrow().listener_count(node, "click"), 1);
        assert_eq!(dom.borrow().listener_count(node, "pointercancel"), 1);
        assert_eq!(dom.borrow().listener_count(node, "focus"), 0);

        drop(eye);
        assert_eq!(dom.borrow().listener_count(node, "click"), 0);
    }

    #[test]
    fn test_direct_listener_survives_drop() {
        let dom = Dom::new();
        let (handler, hits) = counter();
        let node = {
            let eye = Eye::create(&dom, "button", Attrs::new()).unwrap();
            eye.on("focus", None, &handler).unwrap();
            eye.first().unwrap()
        };

        dom.dispatch_event(node, &mut Event::new("focus")).unwrap();
        assert_eq!(hits.get(), 1);

        let again = Eye::wrap(&dom, [node]).unwrap();
        again.off("focus", &handler).unwrap();
        dom.dispatch_event(node, &mut Event::new("focus")).unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_on_requires_event_name() {
        let dom = Dom::new();
        let eye = Eye::create(&dom, "div", Attrs::new()).unwrap();
        let (handler, _) = counter();
        assert_eq!(eye.on("  ", None, &handler).unwrap_err(), EyeError::MissingEvent);
        assert_eq!(eye.off("", &handler).unwrap_err(), EyeError::MissingEvent);
    }

    #[test]
    fn test_partial_delegation() {
        let dom = Dom::new();
        let eye = Eye::create(&dom, "ul", Attrs::new()).unwrap();
        let (handler, _) = counter();

        let err = eye.on("click focus input", Some("li"), &handler).unwrap_err();
        assert_eq!(
            err,
            EyeError::NotDelegable {
                events: vec!["focus".to_string()]
            }
        );
        assert_eq!(eye.delegated_count("click"), 1);
        assert_eq!(eye.delegated_count("input"), 1);
        assert_eq!(eye.delegated_count("focus"), 0);
    }

    #[test]
    fn test_invalid_target_registers_nothing() {
        let dom = Dom::new();
        let eye = Eye::create(&dom, "ul", Attrs::new()).unwrap();
        let (handler, _) = counter();
        assert!(eye.on("click", Some("li["), &handler).is_err());
        assert_eq!(eye.delegated_count("click"), 0);
    }

    #[test]
    fn test_wrap_rejects_non_elements() {
        let dom = Dom::new();
        let text = dom.borrow_mut().tree.create_text("x");
        assert!(matches!(
            Eye::wrap(&dom, [text]),
            Err(EyeError::Dom(DomError::NotAnElement(_)))
        ));
        assert!(matches!(
            Eye::wrap(&dom, [NodeId::NONE]),
            Err(EyeError::Dom(DomError::NotFound(_)))
        ));
    }

    #[test]
    fn test_find_and_text() {
        let dom = Dom::new();
        let list = Eye::create(&dom, "ul", Attrs::new().parent(body(&dom))).unwrap();
        let root = list.first().unwrap();
        Eye::create(&dom, "li", Attrs::new().text("one").parent(root)).unwrap();
        Eye::create(&dom, "li", Attrs::new().text("two").parent(root)).unwrap();

        let items = list.find("li").unwrap().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items.text(), "one");
        assert!(list.find("span").unwrap().is_none());

        items.set_text("same").unwrap();
        assert_eq!(list.html(), "<li>same</li><li>same</li>");
    }

    #[test]
    fn test_append_and_clone_into() {
        let dom = Dom::new();
        let parent = body(&dom);
        let host = Eye::create(&dom, "div", Attrs::new().parent(parent)).unwrap();
        let item = Eye::create(&dom, "span", Attrs::new().text("a")).unwrap();
        host.append(&item).unwrap();
        assert_eq!(host.html(), "<span>a</span>");

        let copies = item.clone_into(Some(host.first().unwrap())).unwrap();
        assert_eq!(copies.len(), 1);
        assert_ne!(copies.first(), item.first());
        assert_eq!(host.html(), "<span>a</span><span>a</span>");

        item.append_to(parent, true).unwrap();
        assert_eq!(dom.borrow().tree.element_children(parent).len(), 2);

        copies.remove().unwrap();
        assert_eq!(host.html(), "<span>a</span>");
    }

    #[test]
    fn test_append_across_documents() {
        let one = Dom::new();
        let two = Dom::new();
        let a = Eye::create(&one, "div", Attrs::new()).unwrap();
        let b = Eye::create(&two, "div", Attrs::new()).unwrap();
        assert_eq!(a.append(&b).unwrap_err(), EyeError::ForeignDocument);
    }
}
