//! Command line front end for the workshop collection scanner
//!
//! ```bash
//! workshop-cli "https://steamcommunity.com/sharedfiles/filedetails/?id=2392987599"
//! ```
//!
//! Progress and logs go to stderr; prompts and the config fragment go to stdout.

mod prompt;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use workshop::{
    CollectionScanner, ConsoleProgressReporter, FirstOption, HttpFetcher, IntoProgressCallback, NullProgressReporter,
    ProgressCallback, ResolvedConfig, ScanConfig, ScanMetrics, ScrapeError, SelectionLedger,
};

use crate::prompt::{PromptSelector, ask_collection_url};

#[derive(Parser, Debug)]
#[command(name = "workshop-cli", version, about = "Collect workshop, mod and map ids from a Steam Workshop collection")]
struct Args {
    /// Collection URL; asked for interactively when omitted
    url: Option<String>,

    /// Catalog base URL used for item detail pages
    #[arg(long)]
    base_url: Option<String>,

    /// Number of detail pages fetched at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Retries per page for transient failures
    #[arg(long)]
    retries: Option<usize>,

    /// Pause after each detail page, in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Take the first candidate everywhere instead of prompting
    #[arg(long)]
    first: bool,

    /// Print the result as JSON instead of the config fragment
    #[arg(long)]
    json: bool,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig::from_env();
        if let Some(ref base_url) = self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_max_concurrent_fetches(concurrency);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.retries {
            config = config.with_max_retries(retries);
        }
        if let Some(ms) = self.settle_ms {
            config = config.with_settle_delay(Duration::from_millis(ms));
        }
        config
    }

    fn progress(&self) -> ProgressCallback {
        if self.quiet {
            NullProgressReporter.into_callback()
        } else {
            ConsoleProgressReporter::new(self.verbose).into_callback()
        }
    }
}

/// Scan failure for `main`; verbose runs get the full error report attached
fn scan_failure(error: ScrapeError, url: &str, verbose: bool) -> anyhow::Error {
    let context = if verbose {
        format!("Failed to scan collection {}\n{}", url, error.detailed_report())
    } else {
        format!("Failed to scan collection {}", url)
    };
    anyhow::Error::new(error).context(context)
}

/// Resolve deferred choices, prompting only when something is actually ambiguous
fn resolve<R: BufRead, W: Write>(
    ledger: SelectionLedger,
    first: bool,
    input: R,
    output: W,
) -> workshop::Result<ResolvedConfig> {
    if first || !ledger.needs_selection() {
        ledger.resolve(&mut FirstOption)
    } else {
        ledger.resolve(&mut PromptSelector::new(input, output))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else if args.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if dotenv::dotenv().is_ok() {
        info!("Loaded environment variables from .env file");
    }

    let url = match args.url.clone() {
        Some(url) => url,
        None => ask_collection_url(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let config = args.scan_config();
    let progress = args.progress();
    let metrics = Arc::new(ScanMetrics::default());
    let fetcher = HttpFetcher::from_config(&config)?
        .with_progress(progress.clone())
        .with_metrics(metrics.clone());
    let scanner = CollectionScanner::new(fetcher, config)?
        .with_progress(progress)
        .with_metrics(metrics.clone());

    let scan = scanner
        .scan(&url)
        .await
        .map_err(|e| scan_failure(e, &url, args.verbose))?;

    if let Some(ref title) = scan.title {
        println!("Parsing mod list: {}", title);
    }

    let metrics = metrics.snapshot();
    info!(
        "Scanned {} items ({} fetched, {} failed, {} retries, {:.0}% success)",
        metrics.items,
        metrics.successful_fetches,
        metrics.failed_fetches,
        metrics.retries_attempted,
        metrics.success_rate() * 100.0
    );

    let resolved = resolve(scan.into_ledger(), args.first, io::stdin().lock(), io::stdout())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("{}", resolved);
    }

    Ok(())
}
