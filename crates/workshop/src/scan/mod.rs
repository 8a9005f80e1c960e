//! Identifier extraction across a collection

pub mod collection;
pub mod scanner;

pub use collection::{
    CollectionItem, ExtractionResult, collection_items, collection_title, extract_identifiers, workshop_id_from,
};
pub use scanner::{CollectionScan, CollectionScanner};
