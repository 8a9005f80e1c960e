//! Lenient page parsing
//!
//! html5ever (through `scraper`) recovers from any input, so parsing never
//! fails: garbage in yields a degenerate tree in which lookups simply miss.

use scraper::{Html, Node};

use super::DocumentNode;

/// Parse raw page bytes (lossy UTF-8) into an owned document tree
pub fn parse(bytes: &[u8]) -> DocumentNode {
    let source = String::from_utf8_lossy(bytes);
    let html = Html::parse_document(&source);
    convert(&html)
}

/// Childless copy of a scraper node; `None` for nodes the tree does not keep
fn shell(node: &Node) -> Option<DocumentNode> {
    match node {
        Node::Element(element) => {
            let attributes = element
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            Some(DocumentNode::element(element.name(), attributes, Vec::new()))
        }
        Node::Text(text) => Some(DocumentNode::text(&**text)),
        Node::Document | Node::Fragment => Some(DocumentNode::document(Vec::new())),
        _ => None,
    }
}

/// Copy the scraper tree into owned nodes, post-order, without recursion
fn convert(html: &Html) -> DocumentNode {
    let root = html.tree.root();
    let mut stack = vec![(root.first_child(), DocumentNode::document(Vec::new()))];

    loop {
        let next = match stack.last_mut() {
            Some((cursor, _)) => {
                let child = *cursor;
                if let Some(current) = child {
                    *cursor = current.next_sibling();
                }
                child
            }
            None => return DocumentNode::document(Vec::new()),
        };

        match next {
            Some(child) => {
                if let Some(node) = shell(child.value()) {
                    stack.push((child.first_child(), node));
                }
            }
            None => {
                let finished = match stack.pop() {
                    Some((_, node)) => node,
                    None => return DocumentNode::document(Vec::new()),
                };
                match stack.last_mut() {
                    Some((_, parent)) => parent.children.push(finished),
                    None => return finished,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NodeKind, find_first};

    #[test]
    fn test_parse_builds_elements_and_text() {
        let root = parse(b"<html><body><div id=\"main\" class=\"x\">Hello <b>World</b></div></body></html>");
        assert_eq!(root.kind, NodeKind::Document);

        let main = find_first(&root, "id", "main").unwrap();
        assert_eq!(main.tag, "div");
        assert_eq!(main.attribute("class"), Some("x"));
        assert_eq!(main.text_content(), "Hello World");
    }

    #[test]
    fn test_comments_are_dropped() {
        let root = parse(b"<div id=\"a\"><!-- note -->text</div>");
        let div = find_first(&root, "id", "a").unwrap();
        assert_eq!(div.children.len(), 1);
        assert_eq!(div.children[0].text.as_deref(), Some("text"));
    }

    #[test]
    fn test_garbage_input_yields_degenerate_tree() {
        let root = parse(&[0xff, 0xfe, b'<', b'<', b'>']);
        assert_eq!(root.kind, NodeKind::Document);
        assert!(find_first(&root, "id", "highlightContent").is_none());

        let empty = parse(b"");
        assert!(find_first(&empty, "class", "collectionItem").is_none());
    }
}
