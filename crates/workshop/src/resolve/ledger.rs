//! Deferred disambiguation of extracted identifiers
//!
//! The ledger commits one workshop id per item and one mod id per item that
//! produced any mod candidate. When an item produced several mod candidates
//! the first is committed provisionally and a [`ReservedPlaceholder`] records
//! where to patch the final choice.
//!
//! Map candidates behave differently: every item's map candidates go into a
//! single shared pool and one map is chosen for the whole collection. Mods are
//! disambiguated per item. The asymmetry matches how existing collections are
//! consumed (one map per server) but has not been confirmed as intended.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::selector::{SelectionRequest, Selector};
use crate::error::{Result, ScrapeError};
use crate::output::ResolvedConfig;
use crate::scan::{CollectionItem, ExtractionResult};

/// Field a placeholder stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderKind {
    Mod,
    Map,
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderKind::Mod => write!(f, "mod"),
            PlaceholderKind::Map => write!(f, "map"),
        }
    }
}

/// A choice deferred until scanning completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservedPlaceholder {
    pub kind: PlaceholderKind,
    /// Every candidate, at least two
    pub options: Vec<String>,
    /// Position in the committed list that the choice overwrites
    pub committed_index: usize,
    pub item_id: String,
    pub item_title: String,
}

/// Accumulated scan outcome awaiting resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionLedger {
    workshop_ids: Vec<String>,
    mod_ids: Vec<String>,
    map_pool: Vec<String>,
    placeholders: Vec<ReservedPlaceholder>,
}

impl SelectionLedger {
    /// Account for one item's extraction result
    pub fn record(mut self, item: &CollectionItem, result: ExtractionResult) -> Self {
        self.workshop_ids.push(item.workshop_id.clone());

        let mut mods = result.mod_candidates;
        match mods.len() {
            0 => {}
            1 => self.mod_ids.append(&mut mods),
            _ => {
                self.mod_ids.push(mods[0].clone());
                debug!("{} has {} mod candidates, deferring choice", item.workshop_id, mods.len());
                self.placeholders.push(ReservedPlaceholder {
                    kind: PlaceholderKind::Mod,
                    options: mods,
                    committed_index: self.mod_ids.len() - 1,
                    item_id: item.workshop_id.clone(),
                    item_title: item.title.clone(),
                });
            }
        }

        self.map_pool.extend(result.map_candidates);
        self
    }

    pub fn workshop_ids(&self) -> &[String] {
        &self.workshop_ids
    }

    /// Committed mod ids, provisional defaults included
    pub fn mod_ids(&self) -> &[String] {
        &self.mod_ids
    }

    pub fn map_pool(&self) -> &[String] {
        &self.map_pool
    }

    pub fn placeholders(&self) -> &[ReservedPlaceholder] {
        &self.placeholders
    }

    /// Whether resolving needs any operator input
    pub fn needs_selection(&self) -> bool {
        !self.placeholders.is_empty() || !self.map_pool.is_empty()
    }

    /// Resolve every deferred choice through `selector`
    ///
    /// Placeholders are presented in creation order, then the map pool (with
    /// a trailing "none" option) when it is non-empty. An out-of-range answer
    /// aborts resolution with [`ScrapeError::InvalidSelection`].
    pub fn resolve<S: Selector + ?Sized>(self, selector: &mut S) -> Result<ResolvedConfig> {
        let SelectionLedger {
            workshop_ids,
            mut mod_ids,
            map_pool,
            placeholders,
        } = self;

        for placeholder in &placeholders {
            let request = SelectionRequest {
                kind: placeholder.kind,
                item_id: Some(&placeholder.item_id),
                item_title: Some(&placeholder.item_title),
                options: &placeholder.options,
            };
            let index = checked(selector.select(&request)?, &request)?;
            mod_ids[placeholder.committed_index] = placeholder.options[index].clone();
        }

        let mut map = String::new();
        if !map_pool.is_empty() {
            let mut options = map_pool;
            options.push(String::new());

            let request = SelectionRequest {
                kind: PlaceholderKind::Map,
                item_id: None,
                item_title: None,
                options: &options,
            };
            let index = checked(selector.select(&request)?, &request)?;
            map = options.swap_remove(index);
        }

        Ok(ResolvedConfig {
            workshop_items: workshop_ids,
            mods: mod_ids,
            map,
        })
    }
}

fn checked(index: usize, request: &SelectionRequest<'_>) -> Result<usize> {
    if index < request.options.len() {
        Ok(index)
    } else {
        Err(ScrapeError::InvalidSelection {
            kind: request.kind,
            index,
            options: request.options.len(),
        })
    }
}
