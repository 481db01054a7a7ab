//! DOM Tree (arena-based allocation)
//!
//! Every node of a document, attached or not, lives in one `Vec`. Detaching
//! a node only unlinks it; slots are never reused, so a `NodeId` stays valid
//! for the lifetime of the tree.

use crate::dataset::to_attribute_name;
use crate::{DOMTokenList, DomError, DomResult, Node, NodeData, NodeId};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (detached ones included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a detached element; the tag is lowercased
    pub fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        let tag = tag.trim();
        let valid = tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }
        Ok(self.alloc(Node::element(tag.to_ascii_lowercase())))
    }

    /// Allocate an element with a tag known to be valid
    pub(crate) fn alloc_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag.to_string()))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content.to_string()))
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(Node::comment(content.to_string()))
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Iterate over direct children as `(id, node)` pairs
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next: first }
    }

    /// Child ids, collected so the caller may mutate the tree afterwards
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
            .collect()
    }

    /// Walk from `id` (inclusive) up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let start = if self.get(id).is_some() { id } else { NodeId::NONE };
        Ancestors { tree: self, next: start }
    }

    /// Whether `node` is `ancestor` or lies below it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root(), id)
    }

    /// Descendants of `root` in document (pre-)order, `root` excluded
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(root);
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut kids = self.child_ids(id);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append `child` as last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` as first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let first = self.node(parent)?.first_child.to_option();
        self.insert_before(parent, child, first)
    }

    /// Insert `child` before `reference` (append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        if !self.node(parent)?.is_container() {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if matches!(self.node(child)?.data, NodeData::Document) || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        let mut reference = reference.unwrap_or(NodeId::NONE);
        if reference == child {
            reference = self.node(child)?.next_sibling;
        }
        if reference.is_valid() && self.node(reference)?.parent != parent {
            return Err(DomError::NotFound(reference));
        }

        self.unlink(child);
        self.link_before(parent, child, reference);
        Ok(child)
    }

    /// Remove a node from its parent; the node itself survives, detached
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        self.node(id)?;
        self.unlink(id);
        Ok(())
    }

    /// Copy a node (and its subtree when `deep`); the copy is detached
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let copy = self.node(id)?.detached_copy();
        let new_id = self.alloc(copy);
        tracing::trace!(source = %id, copy = %new_id, deep, "node cloned");
        if deep {
            for child in self.child_ids(id) {
                let child_copy = self.clone_node(child, true)?;
                self.link_before(new_id, child_copy, NodeId::NONE);
            }
        }
        Ok(new_id)
    }

    /// Link a detached node without validation (known-good callers only)
    pub(crate) fn link_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[child.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.has_attr(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.element_mut(id)?.remove_attr(name))
    }

    pub fn class_list(&self, id: NodeId) -> DomResult<&DOMTokenList> {
        self.node(id)?
            .as_element()
            .map(|e| &e.classes)
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn class_list_mut(&mut self, id: NodeId) -> DomResult<&mut DOMTokenList> {
        Ok(&mut self.element_mut(id)?.classes)
    }

    /// `dataset[key]`
    pub fn dataset_get(&self, id: NodeId, key: &str) -> Option<String> {
        self.get_attribute(id, &to_attribute_name(key))
    }

    /// `dataset[key] = value`
    pub fn dataset_set(&mut self, id: NodeId, key: &str, value: &str) -> DomResult<()> {
        self.set_attribute(id, &to_attribute_name(key), value)
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut crate::ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(t)) => t.content.clone(),
            Some(NodeData::Comment(c)) => c.clone(),
            Some(_) => self
                .descendants(id)
                .into_iter()
                .filter_map(|d| self.nodes[d.index()].as_text())
                .collect(),
            None => String::new(),
        }
    }

    /// Replace all children with a single text node (none if `text` is empty).
    ///
    /// A lone text child is updated in place, so repeated writes allocate
    /// nothing.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(t) => {
                t.content = text.to_string();
                return Ok(());
            }
            NodeData::Comment(c) => {
                *c = text.to_string();
                return Ok(());
            }
            NodeData::Document => return Ok(()),
            NodeData::Element(_) => {}
        }

        let children = self.child_ids(id);
        if let &[only] = children.as_slice() {
            if !text.is_empty() {
                if let NodeData::Text(t) = &mut self.nodes[only.index()].data {
                    t.content = text.to_string();
                    return Ok(());
                }
            }
        }

        for child in children {
            self.unlink(child);
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.link_before(id, text_node, NodeId::NONE);
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Inclusive ancestor walk
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next.to_option()?;
        self.next = self.tree.get(id).map_or(NodeId::NONE, |n| n.parent);
        Some(id)
    }
}
