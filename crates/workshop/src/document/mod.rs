//! Owned document tree
//!
//! Pages are parsed once into an immutable [`DocumentNode`] tree which the
//! locator and renderer read. The tree is dropped as soon as extraction for
//! the page completes.

pub mod locate;
pub mod parse;
pub mod render;

pub use locate::{find_all, find_first, find_first_including_self};
pub use parse::parse;
pub use render::render;

/// Kind of a document node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic root of a parsed page
    Document,
    Element,
    Text,
}

/// Immutable node of a parsed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    pub kind: NodeKind,
    /// Lowercase tag name; empty for document and text nodes
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<DocumentNode>,
    /// Payload of text nodes
    pub text: Option<String>,
}

impl DocumentNode {
    pub fn document(children: Vec<DocumentNode>) -> Self {
        Self {
            kind: NodeKind::Document,
            tag: String::new(),
            attributes: Vec::new(),
            children,
            text: None,
        }
    }

    pub fn element<S: Into<String>>(tag: S, attributes: Vec<(String, String)>, children: Vec<DocumentNode>) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: tag.into(),
            attributes,
            children,
            text: None,
        }
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            kind: NodeKind::Text,
            tag: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: Some(text.into()),
        }
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Value of the first attribute called `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of every descendant text node, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

impl Drop for DocumentNode {
    // Nested Vec drops recurse once per level; flatten so deep pages cannot overflow the stack.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_attribute_lookup_uses_first_match() {
        let node = DocumentNode::element("div", attrs(&[("class", "a"), ("class", "b")]), vec![]);
        assert_eq!(node.attribute("class"), Some("a"));
        assert_eq!(node.attribute("id"), None);
    }

    #[test]
    fn test_text_content_in_document_order() {
        let node = DocumentNode::element(
            "div",
            vec![],
            vec![
                DocumentNode::text("one "),
                DocumentNode::element("b", vec![], vec![DocumentNode::text("two")]),
                DocumentNode::text(" three"),
            ],
        );
        assert_eq!(node.text_content(), "one two three");
    }

    #[test]
    fn test_dropping_deep_tree_does_not_overflow() {
        let mut node = DocumentNode::text("leaf");
        for _ in 0..200_000 {
            node = DocumentNode::element("div", vec![], vec![node]);
        }
        drop(DocumentNode::document(vec![node]));
    }
}
