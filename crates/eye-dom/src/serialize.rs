//! HTML Serialization
//!
//! outerHTML / innerHTML for debugging and snapshot tests.

use crate::{DomTree, NodeData, NodeId};

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl DomTree {
    /// Serialize the node and its subtree
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the children of the node
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.child_ids(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.data {
            NodeData::Document => {
                for child in self.child_ids(id) {
                    self.write_node(child, out);
                }
            }
            NodeData::Text(t) => escape_into(&t.content, false, out),
            NodeData::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(&elem.tag);
                if !elem.classes.is_empty() {
                    out.push_str(" class=\"");
                    escape_into(&elem.classes.value(), true, out);
                    out.push('"');
                }
                for attr in &elem.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_into(&attr.value, true, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                    return;
                }
                for child in self.child_ids(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&elem.tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
