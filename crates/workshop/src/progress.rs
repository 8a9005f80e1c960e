//! Progress tracking and reporting for collection scans

use std::sync::Arc;

/// Progress callback for scan operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted during a scan
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    ScanStarted {
        url: String,
        total_items: usize,
    },
    ItemStarted {
        index: usize,
        workshop_id: String,
        title: String,
    },
    ItemFetched {
        index: usize,
        workshop_id: String,
        bytes: usize,
    },
    ItemFailed {
        index: usize,
        workshop_id: String,
        error: String,
    },
    ItemScanned {
        index: usize,
        workshop_id: String,
        mods: usize,
        maps: usize,
    },
    RetryAttempt {
        url: String,
        attempt: usize,
        max_attempts: usize,
    },
    ScanComplete {
        total_items: usize,
        failed_items: usize,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_scan_started(&self, _url: &str, _total_items: usize) {}
    fn on_item_started(&self, _index: usize, _workshop_id: &str, _title: &str) {}
    fn on_item_fetched(&self, _index: usize, _workshop_id: &str, _bytes: usize) {}
    fn on_item_failed(&self, _index: usize, _workshop_id: &str, _error: &str) {}
    fn on_item_scanned(&self, _index: usize, _workshop_id: &str, _mods: usize, _maps: usize) {}
    fn on_retry_attempt(&self, _url: &str, _attempt: usize, _max_attempts: usize) {}
    fn on_scan_complete(&self, _total_items: usize, _failed_items: usize) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::ScanStarted { url, total_items } => {
                self.on_scan_started(&url, total_items);
            }
            ProgressEvent::ItemStarted { index, workshop_id, title } => {
                self.on_item_started(index, &workshop_id, &title);
            }
            ProgressEvent::ItemFetched { index, workshop_id, bytes } => {
                self.on_item_fetched(index, &workshop_id, bytes);
            }
            ProgressEvent::ItemFailed { index, workshop_id, error } => {
                self.on_item_failed(index, &workshop_id, &error);
            }
            ProgressEvent::ItemScanned { index, workshop_id, mods, maps } => {
                self.on_item_scanned(index, &workshop_id, mods, maps);
            }
            ProgressEvent::RetryAttempt { url, attempt, max_attempts } => {
                self.on_retry_attempt(&url, attempt, max_attempts);
            }
            ProgressEvent::ScanComplete { total_items, failed_items } => {
                self.on_scan_complete(total_items, failed_items);
            }
        })
    }
}

/// Step-style console reporter writing to stderr
///
/// Stdout is kept free for prompts and the final config fragment.
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
    total_items: std::sync::atomic::AtomicUsize,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            total_items: Default::default(),
        }
    }

    fn total(&self) -> usize {
        self.total_items.load(std::sync::atomic::Ordering::Relaxed)
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_scan_started(&self, url: &str, total_items: usize) {
        self.total_items.store(total_items, std::sync::atomic::Ordering::Relaxed);
        eprintln!("Parsing Workshop collection: {} ({} items)", url, total_items);
    }

    fn on_item_started(&self, index: usize, _workshop_id: &str, title: &str) {
        eprintln!("[{}/{}] fetching: {}", index + 1, self.total(), title);
    }

    fn on_item_fetched(&self, index: usize, _workshop_id: &str, bytes: usize) {
        if self.verbose {
            eprintln!("[{}/{}] parsing: {} bytes", index + 1, self.total(), bytes);
        }
    }

    fn on_item_failed(&self, index: usize, workshop_id: &str, error: &str) {
        eprintln!("[{}/{}] failed {}: {}", index + 1, self.total(), workshop_id, error);
    }

    fn on_item_scanned(&self, index: usize, workshop_id: &str, mods: usize, maps: usize) {
        if self.verbose {
            eprintln!(
                "[{}/{}] collected {}: {} mod(s), {} map(s)",
                index + 1,
                self.total(),
                workshop_id,
                mods,
                maps
            );
        }
    }

    fn on_retry_attempt(&self, url: &str, attempt: usize, max_attempts: usize) {
        if self.verbose {
            eprintln!("retrying {} ({}/{})", url, attempt, max_attempts);
        }
    }

    fn on_scan_complete(&self, total_items: usize, failed_items: usize) {
        eprintln!("Scanned {} items ({} failed)", total_items, failed_items);
    }
}

/// Null progress reporter that discards all events
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl ProgressReporter for Recorder {
        fn on_item_failed(&self, _index: usize, workshop_id: &str, _error: &str) {
            self.seen.lock().unwrap().push(format!("failed:{}", workshop_id));
        }

        fn on_scan_complete(&self, total_items: usize, failed_items: usize) {
            self.seen.lock().unwrap().push(format!("done:{}/{}", failed_items, total_items));
        }
    }

    #[test]
    fn test_reporter_dispatch() {
        let recorder = Recorder::default();
        let seen = recorder.seen.clone();
        let callback = recorder.into_callback();

        callback(ProgressEvent::ItemStarted {
            index: 0,
            workshop_id: "1".into(),
            title: "ignored".into(),
        });
        callback(ProgressEvent::ItemFailed {
            index: 0,
            workshop_id: "1".into(),
            error: "boom".into(),
        });
        callback(ProgressEvent::ScanComplete { total_items: 2, failed_items: 1 });

        assert_eq!(*seen.lock().unwrap(), vec!["failed:1".to_string(), "done:1/2".to_string()]);
    }

    #[test]
    fn test_null_reporter_accepts_everything() {
        let callback = NullProgressReporter.into_callback();
        callback(ProgressEvent::ScanStarted { url: "http://x".into(), total_items: 0 });
    }
}
