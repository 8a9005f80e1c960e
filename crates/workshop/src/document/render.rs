//! Serialize a document subtree back to markup text

use std::fmt::{self, Write};

use super::{DocumentNode, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

enum Step<'a> {
    Open(&'a DocumentNode, bool),
    Close(&'a str),
}

/// Render `node` and its subtree to markup
pub fn render(node: &DocumentNode) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let mut stack = vec![Step::Open(node, false)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Close(tag) => write!(out, "</{}>", tag)?,
            Step::Open(node, raw) => match node.kind {
                NodeKind::Text => {
                    let text = node.text.as_deref().unwrap_or_default();
                    if raw {
                        out.write_str(text)?;
                    } else {
                        write_escaped(&mut out, text, false)?;
                    }
                }
                NodeKind::Document => {
                    stack.extend(node.children.iter().rev().map(|child| Step::Open(child, false)));
                }
                NodeKind::Element => {
                    write!(out, "<{}", node.tag)?;
                    for (name, value) in &node.attributes {
                        write!(out, " {}=\"", name)?;
                        write_escaped(&mut out, value, true)?;
                        out.write_char('"')?;
                    }
                    out.write_char('>')?;

                    if VOID_ELEMENTS.contains(&node.tag.as_str()) {
                        continue;
                    }
                    let raw = RAW_TEXT_ELEMENTS.contains(&node.tag.as_str());
                    stack.push(Step::Close(node.tag.as_str()));
                    stack.extend(node.children.iter().rev().map(|child| Step::Open(child, raw)));
                }
            },
        }
    }

    Ok(out)
}

fn write_escaped(out: &mut String, text: &str, attribute: bool) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' if !attribute => out.write_str("&lt;")?,
            '>' if !attribute => out.write_str("&gt;")?,
            '"' if attribute => out.write_str("&quot;")?,
            '\u{a0}' => out.write_str("&nbsp;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}
