//! Normalized spellings of a text label

/// Match variants of `label`: lowercase, lowercase without spaces, lowercase without colons
///
/// Folding is ASCII-only, the same folding [`super::label::extract`] applies
/// to the text it searches.
pub fn variants_of(label: &str) -> Vec<String> {
    let lower = label.to_ascii_lowercase();
    let without_spaces = lower.replace(' ', "");
    let without_colons = lower.replace(':', "");
    vec![lower, without_spaces, without_colons]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_id_variants() {
        assert_eq!(variants_of("Mod ID:"), vec!["mod id:", "modid:", "mod id"]);
    }

    #[test]
    fn test_variants_are_deterministic() {
        assert_eq!(variants_of("Map Folder:"), variants_of("Map Folder:"));
        assert_eq!(variants_of("Map Folder:"), vec!["map folder:", "mapfolder:", "map folder"]);
    }

    #[test]
    fn test_label_without_separators() {
        assert_eq!(variants_of("Id"), vec!["id", "id", "id"]);
    }
}
