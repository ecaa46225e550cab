//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a bounded timeout
//! - HTML parsing, link extraction and text extraction
//! - The breadth-first crawl controller and its worker-pool variant
//! - Politeness pacing between requests

mod controller;
mod fetcher;
mod parser;
mod pool;
mod rate_limit;

pub use crate::output::stats::CrawlReport;
pub use controller::{Controller, CrawlLimits};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use parser::{extract_links, html_to_text};
pub use rate_limit::{RateLimiter, MAX_INTERVAL};

use crate::config::Config;
use crate::url::UrlFilter;
use crate::CorpusError;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the seed URL and the in-scope root domain
/// 2. Build the HTTP client
/// 3. Crawl breadth-first until the budget, the frontier or `cancel` stops it
///
/// Writing the corpus is left to the caller.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `cancel` - Token that stops the crawl early
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed, possibly with zero documents
/// * `Err(CorpusError)` - The crawl could not be set up
pub async fn run_crawl(
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlReport, CorpusError> {
    let seed = config.crawler.seed()?;
    let filter = UrlFilter::for_seed(&seed, &config.crawler)?;
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;

    tracing::info!(
        "Scope: hosts matching '{}' ({:?})",
        filter.root_domain(),
        filter.policy()
    );

    let controller = Controller::new(fetcher, filter, CrawlLimits::from(&config.crawler))
        .with_cancellation(cancel);
    controller.run(seed).await
}

/// Cancels `cancel` once `limit` has elapsed
///
/// The task ends early, without cancelling, if the token is cancelled by
/// someone else first.
pub fn spawn_deadline(cancel: CancellationToken, limit: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(limit) => {
                tracing::warn!("Crawl reached its {:?} time limit, stopping", limit);
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    })
}

/// Cancels `cancel` on Ctrl-C; the documents collected so far are still saved
pub fn spawn_interrupt_handler(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => tracing::warn!("Interrupt received, stopping crawl"),
                    Err(e) => {
                        tracing::error!("Failed to listen for interrupt: {}", e);
                        return;
                    }
                }
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    })
}
