//! Collection scanning
//!
//! Items are processed in document order. Detail pages may be fetched
//! concurrently (bounded by `max_concurrent_fetches`); every finished item
//! lands in its own pre-sized slot, so results always come back in document
//! order whatever order the fetches complete in.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::collection::{CollectionItem, ExtractionResult, collection_items, collection_title, extract_identifiers};
use crate::config::ScanConfig;
use crate::document;
use crate::error::{Result, ScrapeError};
use crate::http::PageFetcher;
use crate::metrics::ScanMetrics;
use crate::progress::{ProgressCallback, ProgressEvent};
use crate::resolve::SelectionLedger;

/// Everything learned from one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionScan {
    pub title: Option<String>,
    pub items: Vec<CollectionItem>,
    /// One result per item, same order as `items`
    pub results: Vec<ExtractionResult>,
    /// Indices of items whose detail page could not be fetched
    pub failed_items: Vec<usize>,
}

impl CollectionScan {
    /// Fold the ordered results into a disambiguation ledger
    pub fn into_ledger(self) -> SelectionLedger {
        self.items
            .iter()
            .zip(self.results)
            .fold(SelectionLedger::default(), |ledger, (item, result)| ledger.record(item, result))
    }
}

/// Drives fetching and extraction for a collection
pub struct CollectionScanner<F: PageFetcher> {
    fetcher: F,
    config: ScanConfig,
    metrics: Arc<ScanMetrics>,
    progress_callback: Option<ProgressCallback>,
}

impl<F: PageFetcher> CollectionScanner<F> {
    pub fn new(fetcher: F, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher,
            config,
            metrics: Arc::new(ScanMetrics::default()),
            progress_callback: None,
        })
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Record into a shared counter set, e.g. one the fetcher also counts retries into
    pub fn with_metrics(mut self, metrics: Arc<ScanMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<ScanMetrics> {
        self.metrics.clone()
    }

    fn report(&self, event: ProgressEvent) {
        if let Some(ref callback) = self.progress_callback {
            callback(event);
        }
    }

    /// Fetch a collection page and scan every item on it
    ///
    /// Failing to fetch the collection page itself aborts the scan; failing
    /// to fetch an item's detail page does not (see [`Self::scan_item`]).
    pub async fn scan(&self, collection_url: &str) -> Result<CollectionScan> {
        let parsed = url::Url::parse(collection_url).map_err(|e| ScrapeError::invalid_url(collection_url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScrapeError::UnsupportedUrl {
                url: collection_url.to_string(),
                scheme: parsed.scheme().to_string(),
            });
        }

        let body = self.fetcher.fetch(collection_url).await?;
        let root = document::parse(&body);
        let title = collection_title(&root);
        let items = collection_items(&root);
        drop(root);

        info!("Collection {:?}: {} items", title.as_deref().unwrap_or(""), items.len());
        self.report(ProgressEvent::ScanStarted {
            url: collection_url.to_string(),
            total_items: items.len(),
        });

        let mut failed_items = Vec::new();
        let results = self
            .scan_items(&items)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                outcome.unwrap_or_else(|| {
                    failed_items.push(index);
                    ExtractionResult::default()
                })
            })
            .collect();

        self.report(ProgressEvent::ScanComplete {
            total_items: items.len(),
            failed_items: failed_items.len(),
        });

        Ok(CollectionScan {
            title,
            items,
            results,
            failed_items,
        })
    }

    /// Scan items with bounded concurrency, returning outcomes in item order
    ///
    /// `None` marks an item whose detail page could not be fetched.
    pub async fn scan_items(&self, items: &[CollectionItem]) -> Vec<Option<ExtractionResult>> {
        let mut slots: Vec<Option<Option<ExtractionResult>>> = vec![None; items.len()];

        let mut finished = stream::iter(items.iter().enumerate())
            .map(|(index, item)| async move { (index, self.scan_item(index, item).await) })
            .buffer_unordered(self.config.max_concurrent_fetches.max(1));

        while let Some((index, result)) = finished.next().await {
            slots[index] = Some(result);
        }

        slots.into_iter().map(Option::flatten).collect()
    }

    /// Fetch, parse and extract one item
    ///
    /// A failed fetch is logged and reported and yields `None`; the caller
    /// records the item with no candidates and the scan carries on.
    pub async fn scan_item(&self, index: usize, item: &CollectionItem) -> Option<ExtractionResult> {
        self.metrics.record_item_started();
        self.report(ProgressEvent::ItemStarted {
            index,
            workshop_id: item.workshop_id.clone(),
            title: item.title.clone(),
        });

        let url = self.config.detail_url(&item.workshop_id);
        let fetched = self.fetcher.fetch(&url).await;
        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }

        let body = match fetched {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    category = e.category(),
                    "Fetching {} ({}) failed, recording no candidates: {}",
                    item.workshop_id,
                    item.title,
                    e
                );
                self.metrics.record_fetch_failed();
                self.report(ProgressEvent::ItemFailed {
                    index,
                    workshop_id: item.workshop_id.clone(),
                    error: e.to_string(),
                });
                return None;
            }
        };

        self.metrics.record_fetch_completed();
        self.report(ProgressEvent::ItemFetched {
            index,
            workshop_id: item.workshop_id.clone(),
            bytes: body.len(),
        });

        let result = extract_identifiers(&document::parse(&body));
        debug!(
            "{}: mods {:?}, maps {:?}",
            item.workshop_id, result.mod_candidates, result.map_candidates
        );

        self.metrics
            .record_candidates(result.mod_candidates.len(), result.map_candidates.len());
        self.report(ProgressEvent::ItemScanned {
            index,
            workshop_id: item.workshop_id.clone(),
            mods: result.mod_candidates.len(),
            maps: result.map_candidates.len(),
        });

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// In-memory fetcher; unknown URLs fail like a 404
    struct StaticPages {
        pages: HashMap<String, String>,
        delays: HashMap<String, Duration>,
    }

    impl StaticPages {
        fn new() -> Self {
            Self { pages: HashMap::new(), delays: HashMap::new() }
        }

        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn slow(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl PageFetcher for StaticPages {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
            self.pages
                .get(url)
                .map(|body| body.clone().into_bytes())
                .ok_or_else(|| ScrapeError::HttpStatus { url: url.to_string(), status: 404 })
        }
    }

    const BASE: &str = "http://catalog.test/sharedfiles";
    const COLLECTION_URL: &str = "http://catalog.test/collections/pack";

    fn collection(ids: &[&str]) -> String {
        let items: String = ids
            .iter()
            .map(|id| {
                format!(
                    r#"<div class="collectionItem" id="sharedfile_{id}"><div class="workshopItemTitle">Item {id}</div></div>"#
                )
            })
            .collect();
        format!("<html><body><div class=\"workshopItemTitle\">Pack</div>{items}</body></html>")
    }

    fn detail(description: &str) -> String {
        format!(r#"<html><body><div id="highlightContent">{description}</div></body></html>"#)
    }

    fn config() -> ScanConfig {
        ScanConfig::default()
            .with_base_url(BASE)
            .with_settle_delay(Duration::ZERO)
    }

    fn detail_url(id: &str) -> String {
        format!("{BASE}/filedetails/?id={id}")
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_records_empty_item() {
        let pages = StaticPages::new()
            .page(COLLECTION_URL, &collection(&["10", "20", "30"]))
            .page(&detail_url("10"), &detail("Mod ID: Alpha<br>"))
            .page(&detail_url("30"), &detail("Mod ID: Gamma<br>"));

        let scanner = CollectionScanner::new(pages, config()).unwrap();
        let scan = scanner.scan(COLLECTION_URL).await.unwrap();

        assert_eq!(scan.title.as_deref(), Some("Pack"));
        assert_eq!(scan.items.len(), 3);
        assert_eq!(scan.results[0].mod_candidates, vec!["Alpha"]);
        assert!(scan.results[1].is_empty());
        assert_eq!(scan.results[2].mod_candidates, vec!["Gamma"]);
        assert_eq!(scan.failed_items, vec![1]);

        let snapshot = scanner.metrics().snapshot();
        assert_eq!(snapshot.items, 3);
        assert_eq!(snapshot.failed_fetches, 1);
        assert_eq!(snapshot.successful_fetches, 2);
    }

    #[tokio::test]
    async fn test_concurrent_results_keep_document_order() {
        let pages = StaticPages::new()
            .page(COLLECTION_URL, &collection(&["1", "2", "3", "4"]))
            .page(&detail_url("1"), &detail("Mod ID: one<br>"))
            .page(&detail_url("2"), &detail("Mod ID: two<br>"))
            .page(&detail_url("3"), &detail("Mod ID: three<br>"))
            .page(&detail_url("4"), &detail("Mod ID: four<br>"))
            .slow(&detail_url("1"), Duration::from_millis(60))
            .slow(&detail_url("2"), Duration::from_millis(30));

        let scanner = CollectionScanner::new(pages, config().with_max_concurrent_fetches(4)).unwrap();
        let scan = scanner.scan(COLLECTION_URL).await.unwrap();

        let mods: Vec<&str> = scan.results.iter().map(|r| r.mod_candidates[0].as_str()).collect();
        assert_eq!(mods, vec!["one", "two", "three", "four"]);
    }

    #[tokio::test]
    async fn test_collection_fetch_failure_is_fatal() {
        let scanner = CollectionScanner::new(StaticPages::new(), config()).unwrap();
        let err = scanner.scan(COLLECTION_URL).await.unwrap_err();
        assert!(err.is_fetch_failure());
    }

    #[tokio::test]
    async fn test_rejects_non_http_collection_url() {
        let scanner = CollectionScanner::new(StaticPages::new(), config()).unwrap();
        assert!(matches!(
            scanner.scan("file:///tmp/collection.html").await,
            Err(ScrapeError::UnsupportedUrl { .. })
        ));
        assert!(matches!(scanner.scan("not a url").await, Err(ScrapeError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_progress_events_reported() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = events.clone();
        let pages = StaticPages::new()
            .page(COLLECTION_URL, &collection(&["5"]))
            .page(&detail_url("5"), &detail("Map Folder: Town<br>"));

        let scanner = CollectionScanner::new(pages, config())
            .unwrap()
            .with_progress(Arc::new(move |event| sink.lock().unwrap().push(event)));
        scanner.scan(COLLECTION_URL).await.unwrap();

        let events = events.lock().unwrap();
        assert!(matches!(events.first(), Some(ProgressEvent::ScanStarted { total_items: 1, .. })));
        assert!(events.iter().any(|e| matches!(e, ProgressEvent::ItemScanned { mods: 0, maps: 1, .. })));
        assert!(matches!(events.last(), Some(ProgressEvent::ScanComplete { failed_items: 0, .. })));
    }

    #[tokio::test]
    async fn test_failures_are_counted_per_scan() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = events.clone();
        let pages = StaticPages::new()
            .page(COLLECTION_URL, &collection(&["7", "8"]))
            .page(&detail_url("7"), &detail("Mod ID: seven<br>"));

        let shared = Arc::new(ScanMetrics::default());
        let scanner = CollectionScanner::new(pages, config())
            .unwrap()
            .with_metrics(shared.clone())
            .with_progress(Arc::new(move |event| sink.lock().unwrap().push(event)));

        let first = scanner.scan(COLLECTION_URL).await.unwrap();
        let second = scanner.scan(COLLECTION_URL).await.unwrap();

        assert_eq!(first.failed_items, vec![1]);
        assert_eq!(second.failed_items, vec![1]);
        assert_eq!(shared.snapshot().failed_fetches, 2);

        let completed: Vec<usize> = events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::ScanComplete { failed_items, .. } => Some(*failed_items),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![1, 1]);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result = CollectionScanner::new(StaticPages::new(), config().with_max_concurrent_fetches(0));
        assert!(matches!(result, Err(ScrapeError::Configuration { .. })));
    }
}
