//! DOM Node
//!
//! Nodes link to each other through `NodeId`s (4 bytes) instead of pointers,
//! so the whole tree lives in one arena and clones never alias.

use crate::{DOMTokenList, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: String) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(TextData { content }))
    }

    pub fn comment(content: String) -> Self {
        Self::with_data(NodeData::Comment(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Copy of this node's data with all links cleared
    pub(crate) fn detached_copy(&self) -> Self {
        Self::with_data(self.data.clone())
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Whether this node may have children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Element(_) | NodeData::Document)
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    Element(ElementData),
    Text(TextData),
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes other than `class`, in insertion order
    pub attrs: Vec<Attribute>,
    /// Class list (serves the `class` attribute)
    pub classes: DOMTokenList,
}

impl ElementData {
    pub fn new(tag: String) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            classes: DOMTokenList::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<String> {
        if name == "class" {
            return (!self.classes.is_empty()).then(|| self.classes.value());
        }
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.clone())
    }

    /// Borrowing lookup; `class` is not stored here, use `classes`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if name == "class" {
            self.classes = DOMTokenList::parse(value);
            return;
        }
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attrs.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Remove an attribute; returns whether it existed
    pub fn remove_attr(&mut self, name: &str) -> bool {
        if name == "class" {
            let had = !self.classes.is_empty();
            self.classes = DOMTokenList::new();
            return had;
        }
        let before = self.attrs.len();
        self.attrs.retain(|a| a.name != name);
        self.attrs.len() != before
    }

    pub fn has_attr(&self, name: &str) -> bool {
        if name == "class" {
            !self.classes.is_empty()
        } else {
            self.attrs.iter().any(|a| a.name == name)
        }
    }

    /// `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }
}

/// Text node data
#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_attribute_routes_to_token_list() {
        let mut elem = ElementData::new("div".into());
        elem.set_attr("class", "card  active");
        assert!(elem.classes.contains("card"));
        assert_eq!(elem.get_attr("class").as_deref(), Some("card active"));
        assert!(elem.attrs.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let mut elem = ElementData::new("a".into());
        elem.set_attr("href", "/one");
        elem.set_attr("href", "/two");
        assert_eq!(elem.attr("href"), Some("/two"));
        assert_eq!(elem.attrs.len(), 1);
        assert!(elem.remove_attr("href"));
        assert!(!elem.has_attr("href"));
    }

    #[test]
    fn test_detached_copy_clears_links() {
        let mut node = Node::text("hi".into());
        node.parent = NodeId(3);
        node.next_sibling = NodeId(4);
        let copy = node.detached_copy();
        assert!(!copy.parent.is_valid());
        assert!(!copy.next_sibling.is_valid());
        assert_eq!(copy.as_text(), Some("hi"));
    }
}
