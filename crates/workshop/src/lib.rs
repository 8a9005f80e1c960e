//! Workshop collection scanner
//!
//! Reads a Steam Workshop collection page, visits every item's detail page,
//! pulls the `Mod ID:` and `Map Folder:` values out of the item descriptions
//! and turns them into the launcher config fragment
//!
//! ```text
//! WorkshopItems=<id1>;<id2>;...;
//! Mods=<id1>;<id2>;...;
//! Map=<mapId>;
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use workshop::{CollectionScanner, FirstOption, HttpFetcher, ScanConfig};
//!
//! # async fn example() -> workshop::Result<()> {
//! let config = ScanConfig::default();
//! let fetcher = HttpFetcher::from_config(&config)?;
//! let scanner = CollectionScanner::new(fetcher, config)?;
//!
//! let scan = scanner
//!     .scan("https://steamcommunity.com/sharedfiles/filedetails/?id=2392987599")
//!     .await?;
//!
//! // Items with several candidates need a choice; take the first of each.
//! let resolved = scan.into_ledger().resolve(&mut FirstOption)?;
//! println!("{}", resolved);
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! - [`document`]: lenient parsing into an owned tree and attribute lookups
//! - [`extract`]: label variants and label-anchored value extraction
//! - [`scan`]: per-item fetch and extraction, results kept in document order
//! - [`resolve`]: deferred choice for items with several candidates
//! - [`output`]: the config fragment

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod http;
pub mod metrics;
pub mod output;
pub mod progress;
pub mod resolve;
pub mod scan;

// Re-export commonly used types for convenience
pub use config::ScanConfig;
pub use document::{DocumentNode, NodeKind};
pub use error::{ErrorSeverity, Result, ScrapeError};
pub use http::{HttpFetcher, PageFetcher};
pub use metrics::{ScanMetrics, ScanMetricsSnapshot};
pub use output::{ResolvedConfig, format_config};
pub use progress::{
    ConsoleProgressReporter, IntoProgressCallback, NullProgressReporter, ProgressCallback, ProgressEvent,
    ProgressReporter,
};
pub use resolve::{FirstOption, PlaceholderKind, ReservedPlaceholder, SelectionLedger, SelectionRequest, Selector};
pub use scan::{CollectionItem, CollectionScan, CollectionScanner, ExtractionResult};
