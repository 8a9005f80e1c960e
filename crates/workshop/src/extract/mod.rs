//! Pulling labeled values out of loosely structured description text

pub mod label;
pub mod variants;

pub use label::{Anchor, collect_values, extract, locate_anchor, strip_markup};
pub use variants::variants_of;

/// Label preceding mod identifiers in item descriptions
pub const MOD_ID_LABEL: &str = "Mod ID:";

/// Label preceding map folder names in item descriptions
pub const MAP_FOLDER_LABEL: &str = "Map Folder:";
