//! Launcher config fragment

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ScrapeError;

/// Final identifiers for the launcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub workshop_items: Vec<String>,
    pub mods: Vec<String>,
    /// Empty when no map was selected
    pub map: String,
}

/// Render the three-line config fragment
///
/// ```
/// let text = workshop::format_config(&["1".to_string(), "2".to_string()], &["ModA".to_string()], "");
/// assert_eq!(text, "WorkshopItems=1;2;\nMods=ModA;\nMap=;");
/// ```
pub fn format_config(workshop_ids: &[String], mod_ids: &[String], map_id: &str) -> String {
    format!(
        "WorkshopItems={};\nMods={};\nMap={};",
        workshop_ids.join(";"),
        mod_ids.join(";"),
        map_id
    )
}

impl fmt::Display for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_config(&self.workshop_items, &self.mods, &self.map))
    }
}

fn field<'a>(line: Option<&'a str>, key: &str) -> Result<&'a str, ScrapeError> {
    let line = line.ok_or_else(|| ScrapeError::MalformedConfig(format!("missing {} line", key)))?;
    line.trim_end_matches('\r')
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('='))
        .and_then(|rest| rest.strip_suffix(';'))
        .ok_or_else(|| ScrapeError::MalformedConfig(format!("expected '{}=...;', got {:?}", key, line)))
}

fn list(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        value.split(';').map(str::to_string).collect()
    }
}

impl FromStr for ResolvedConfig {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().filter(|line| !line.trim().is_empty());
        let workshop_items = list(field(lines.next(), "WorkshopItems")?);
        let mods = list(field(lines.next(), "Mods")?);
        let map = field(lines.next(), "Map")?.to_string();

        Ok(Self { workshop_items, mods, map })
    }
}
