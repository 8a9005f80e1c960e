//! The operator-facing side of resolution

use super::ledger::PlaceholderKind;
use crate::error::Result;

/// One choice to put to the operator
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    pub kind: PlaceholderKind,
    /// Item the choice belongs to; `None` for the collection-wide map choice
    pub item_id: Option<&'a str>,
    pub item_title: Option<&'a str>,
    /// Options indexed from 0. For maps the last option is the empty "none" entry.
    pub options: &'a [String],
}

impl SelectionRequest<'_> {
    /// Prompt line introducing the options
    pub fn headline(&self) -> String {
        match (self.item_id, self.item_title) {
            (Some(id), Some(title)) => format!(
                "Multiple {}s for {} workshop item {} please select one to enable",
                self.kind, title, id
            ),
            (Some(id), None) => format!(
                "Multiple {}s for workshop item {} please select one to enable",
                self.kind, id
            ),
            _ => format!("Multiple {}s please select one to enable", self.kind),
        }
    }

    /// Display label of an option; the empty option reads as "(none)"
    pub fn label(&self, index: usize) -> &str {
        match self.options.get(index).map(String::as_str) {
            Some("") => "(none)",
            Some(option) => option,
            None => "",
        }
    }
}

/// Makes deferred choices; returns an index into `request.options`
pub trait Selector {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Result<usize>;
}

/// Always picks the first option (the provisional default for mods)
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstOption;

impl Selector for FirstOption {
    fn select(&mut self, _request: &SelectionRequest<'_>) -> Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_for_item_choice() {
        let options = vec!["a".to_string(), "b".to_string()];
        let request = SelectionRequest {
            kind: PlaceholderKind::Mod,
            item_id: Some("123"),
            item_title: Some("Better Cars"),
            options: &options,
        };
        assert_eq!(
            request.headline(),
            "Multiple mods for Better Cars workshop item 123 please select one to enable"
        );
    }

    #[test]
    fn test_map_labels() {
        let options = vec!["Riverside".to_string(), String::new()];
        let request = SelectionRequest {
            kind: PlaceholderKind::Map,
            item_id: None,
            item_title: None,
            options: &options,
        };
        assert_eq!(request.headline(), "Multiple maps please select one to enable");
        assert_eq!(request.label(0), "Riverside");
        assert_eq!(request.label(1), "(none)");
        assert_eq!(request.label(5), "");
    }
}
