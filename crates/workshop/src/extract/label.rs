//! Label-anchored value extraction from free text
//!
//! Matching happens on an ASCII-lowercased copy of the text; values are
//! recovered from the original text at the same byte offsets. ASCII folding
//! never changes byte lengths, so the two strings stay aligned.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

/// Where a label variant first occurs in the lowercased text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor<'v> {
    pub offset: usize,
    pub variant: &'v str,
}

/// Find the first variant (in variant order) present in `lower_text`
pub fn locate_anchor<'v>(lower_text: &str, variants: &'v [String]) -> Option<Anchor<'v>> {
    variants.iter().find_map(|variant| {
        if variant.is_empty() {
            return None;
        }
        lower_text.find(variant.as_str()).map(|offset| Anchor {
            offset,
            variant: variant.as_str(),
        })
    })
}

/// Replace markup fragments with newlines and decode the common entities
pub fn strip_markup(text: &str) -> String {
    let stripped = MARKUP.replace_all(text, "\n");
    stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Every value following `variant` in plain `text`, original casing preserved
///
/// A value is the rest of the line after the label and some whitespace,
/// ending on a non-whitespace character and followed by whitespace.
pub fn collect_values(text: &str, variant: &str) -> Vec<String> {
    let pattern = format!(r"{}\s+(.*\S)\s+", regex::escape(variant));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Could not build value pattern for '{}': {}", variant, e);
            return Vec::new();
        }
    };

    let lower = text.to_ascii_lowercase();
    re.captures_iter(&lower)
        .filter_map(|caps| caps.get(1))
        .map(|value| text[value.range()].to_string())
        .collect()
}

/// Values following the first matching label variant in `raw_text`
///
/// Returns an empty list when no variant occurs.
pub fn extract(raw_text: &str, variants: &[String]) -> Vec<String> {
    let lower_text = raw_text.to_ascii_lowercase();
    let Some(anchor) = locate_anchor(&lower_text, variants) else {
        debug!("No label variant of {:?} found", variants.first());
        return Vec::new();
    };

    let stripped = strip_markup(&raw_text[anchor.offset..]);
    collect_values(&stripped, anchor.variant)
}
