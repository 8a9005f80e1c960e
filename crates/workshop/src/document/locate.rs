//! Attribute-predicate search over a document tree
//!
//! All walks are pre-order and use an explicit stack, so malformed pages with
//! very deep nesting cannot exhaust the call stack. Each node is visited at
//! most once; a miss is `None` or an empty list, never an error.

use super::DocumentNode;

fn matches(node: &DocumentNode, attribute: &str, value: &str) -> bool {
    node.is_element() && node.attribute(attribute) == Some(value)
}

/// Pre-order iterator over the descendants of a node (the node itself excluded)
struct Descendants<'a> {
    stack: Vec<&'a DocumentNode>,
}

impl<'a> Descendants<'a> {
    fn of(root: &'a DocumentNode) -> Self {
        Self {
            stack: root.children.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DocumentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// First descendant element of `root` whose `attribute` equals `value`
pub fn find_first<'a>(root: &'a DocumentNode, attribute: &str, value: &str) -> Option<&'a DocumentNode> {
    Descendants::of(root).find(|node| matches(node, attribute, value))
}

/// Like [`find_first`], but `root` itself is a candidate too
pub fn find_first_including_self<'a>(
    root: &'a DocumentNode,
    attribute: &str,
    value: &str,
) -> Option<&'a DocumentNode> {
    if matches(root, attribute, value) {
        return Some(root);
    }
    find_first(root, attribute, value)
}

/// Every descendant element of `root` whose `attribute` equals `value`, in document order
pub fn find_all<'a>(root: &'a DocumentNode, attribute: &str, value: &str) -> Vec<&'a DocumentNode> {
    Descendants::of(root)
        .filter(|node| matches(node, attribute, value))
        .collect()
}
