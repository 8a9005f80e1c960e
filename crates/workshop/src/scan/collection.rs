//! Reading collection pages and item detail pages

use tracing::{debug, warn};

use crate::document::{self, DocumentNode, find_all, find_first};
use crate::extract::{self, MAP_FOLDER_LABEL, MOD_ID_LABEL, variants_of};

/// Class marking one entry of a collection page
pub const COLLECTION_ITEM_CLASS: &str = "collectionItem";
/// Class marking a title node
pub const ITEM_TITLE_CLASS: &str = "workshopItemTitle";
/// Id of the description region on a detail page
pub const DETAIL_REGION_ID: &str = "highlightContent";

/// One entry of a collection page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    pub workshop_id: String,
    pub title: String,
}

/// Candidate identifiers pulled from one item's detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub mod_candidates: Vec<String>,
    pub map_candidates: Vec<String>,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.mod_candidates.is_empty() && self.map_candidates.is_empty()
    }
}

/// Numeric suffix of an item element id such as `sharedfile_2392709985`
pub fn workshop_id_from(element_id: &str) -> Option<&str> {
    let (_, suffix) = element_id.rsplit_once('_')?;
    if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
        Some(suffix)
    } else {
        None
    }
}

fn title_of(node: &DocumentNode) -> Option<String> {
    find_first(node, "class", ITEM_TITLE_CLASS).map(|title| title.text_content().trim().to_string())
}

/// The collection's own heading: the first title node on the page
pub fn collection_title(root: &DocumentNode) -> Option<String> {
    title_of(root)
}

/// Collection entries in document order
///
/// Entries whose element id carries no numeric workshop id are skipped with a
/// warning. For such pages the workshop id list is shorter than the number of
/// collection entries: it counts usable entries only, since there is no id to
/// put in `WorkshopItems` for the others.
pub fn collection_items(root: &DocumentNode) -> Vec<CollectionItem> {
    find_all(root, "class", COLLECTION_ITEM_CLASS)
        .into_iter()
        .filter_map(|node| {
            let element_id = node.attribute("id").unwrap_or_default();
            let Some(workshop_id) = workshop_id_from(element_id) else {
                warn!("Skipping collection entry with unusable id {:?}", element_id);
                return None;
            };
            let title = title_of(node).unwrap_or_default();
            Some(CollectionItem {
                workshop_id: workshop_id.to_string(),
                title,
            })
        })
        .collect()
}

/// Mod and map candidates from a parsed detail page
///
/// A missing description region or a render failure yields no candidates.
pub fn extract_identifiers(root: &DocumentNode) -> ExtractionResult {
    let Some(region) = find_first(root, "id", DETAIL_REGION_ID) else {
        debug!("Detail page has no #{} region", DETAIL_REGION_ID);
        return ExtractionResult::default();
    };

    let text = match document::render(region) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to render detail region, treating as empty: {}", e);
            String::new()
        }
    };

    ExtractionResult {
        mod_candidates: extract::extract(&text, &variants_of(MOD_ID_LABEL)),
        map_candidates: extract::extract(&text, &variants_of(MAP_FOLDER_LABEL)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;

    const COLLECTION: &str = r##"
        <html><body>
          <div class="collectionHeader"><div class="workshopItemTitle">My Server Pack</div></div>
          <div class="collectionChildren">
            <div class="collectionItem" id="sharedfile_111">
              <a href="#"><div class="workshopItemTitle">First <b>Mod</b></div></a>
            </div>
            <div class="collectionItem" id="broken">
              <div class="workshopItemTitle">Nope</div>
            </div>
            <div class="collectionItem" id="sharedfile_222">
              <div class="workshopItemTitle">  Second Map  </div>
            </div>
            <div class="collectionItem" id="sharedfile_333"></div>
          </div>
        </body></html>
    "##;

    #[test]
    fn test_workshop_id_suffix() {
        assert_eq!(workshop_id_from("sharedfile_2392709985"), Some("2392709985"));
        assert_eq!(workshop_id_from("a_b_42"), Some("42"));
        assert_eq!(workshop_id_from("sharedfile_"), None);
        assert_eq!(workshop_id_from("sharedfile_12x"), None);
        assert_eq!(workshop_id_from("12345"), None);
    }

    #[test]
    fn test_collection_items_in_document_order() {
        let root = parse(COLLECTION.as_bytes());
        let items = collection_items(&root);

        assert_eq!(
            items,
            vec![
                CollectionItem { workshop_id: "111".into(), title: "First Mod".into() },
                CollectionItem { workshop_id: "222".into(), title: "Second Map".into() },
                CollectionItem { workshop_id: "333".into(), title: String::new() },
            ]
        );
        assert_eq!(collection_title(&root).as_deref(), Some("My Server Pack"));
    }

    #[test]
    fn test_extract_identifiers_from_detail_page() {
        let page = r#"<html><body>
            <div class="workshopItemDescription" id="highlightContent">
              Great mod.<br><br>Workshop ID: 111<br>Mod ID: CoolMod<br>Mod ID: CoolMod_Lite<br>Map Folder: CoolTown<br>
            </div>
            <div id="other">Mod ID: NotThisOne<br></div>
        </body></html>"#;

        let result = extract_identifiers(&parse(page.as_bytes()));
        assert_eq!(result.mod_candidates, vec!["CoolMod", "CoolMod_Lite"]);
        assert_eq!(result.map_candidates, vec!["CoolTown"]);
    }

    #[test]
    fn test_deeply_nested_detail_page_is_scanned() {
        let depth = 50_000;
        let page = format!(
            "<html><body><div id=\"highlightContent\">{}Mod ID: Deep<br>{}</div></body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );

        let root = parse(page.as_bytes());
        let result = extract_identifiers(&root);
        drop(root);

        assert_eq!(result.mod_candidates, vec!["Deep"]);
    }

    #[test]
    fn test_missing_region_yields_no_candidates() {
        let result = extract_identifiers(&parse(b"<div>Mod ID: Orphan<br></div>"));
        assert!(result.is_empty());
    }
}
