//! Disambiguation of items with more than one candidate

pub mod ledger;
pub mod selector;

pub use ledger::{PlaceholderKind, ReservedPlaceholder, SelectionLedger};
pub use selector::{FirstOption, SelectionRequest, Selector};
