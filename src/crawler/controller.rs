//! Crawl controller - the breadth-first crawl loop
//!
//! The controller owns one crawl from seed to report:
//! - Seeds the frontier and moves the crawl `Idle -> Running`
//! - Claims URLs in FIFO order until the budget or frontier runs out
//! - Fetches each page, records its text, and enqueues its in-scope links
//! - Waits the politeness delay between fetches
//! - Stops early, keeping what it collected, when its cancellation token fires
//!
//! With more than one worker the same steps run in the pool variant
//! (see [`crate::crawler::pool`]).

use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::parser::extract_links;
use crate::crawler::pool;
use crate::output::stats::CrawlReport;
use crate::state::{Claim, CrawlState, Termination};
use crate::url::UrlFilter;
use crate::CorpusError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Limits and pacing of one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Maximum number of URLs consumed, failures included
    pub page_budget: usize,
    /// Pause between consecutive fetches
    pub delay: Duration,
    /// Number of concurrent fetch workers
    pub workers: usize,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            page_budget: 150,
            delay: Duration::from_millis(1500),
            workers: 1,
        }
    }
}

impl From<&crate::config::CrawlerConfig> for CrawlLimits {
    fn from(config: &crate::config::CrawlerConfig) -> Self {
        Self {
            page_budget: config.page_budget,
            delay: config.delay(),
            workers: config.workers.max(1),
        }
    }
}

/// What came out of fetching one claimed URL
#[derive(Debug)]
pub(crate) enum PageOutcome {
    Fetched { text: String, links: Vec<Url> },
    Failed(FetchResult),
}

/// Runs a bounded breadth-first crawl over one site
pub struct Controller<F> {
    fetcher: Arc<F>,
    filter: Arc<UrlFilter>,
    limits: CrawlLimits,
    cancel: CancellationToken,
}

impl<F> Clone for Controller<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            filter: Arc::clone(&self.filter),
            limits: self.limits,
            cancel: self.cancel.clone(),
        }
    }
}

impl<F: PageFetcher + 'static> Controller<F> {
    /// Creates a controller
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Retrieves pages
    /// * `filter` - Decides which discovered links are in scope
    /// * `limits` - Page budget, delay and worker count
    pub fn new(fetcher: F, filter: UrlFilter, limits: CrawlLimits) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            filter: Arc::new(filter),
            limits,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the cancellation token, e.g. with one wired to Ctrl-C
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn limits(&self) -> CrawlLimits {
        self.limits
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn filter(&self) -> &UrlFilter {
        &self.filter
    }

    /// Crawls from `seed` and returns the collected documents
    ///
    /// Per-page failures are logged and counted, never returned. The only
    /// error is an invalid state transition, which means the state machine
    /// was misused.
    pub async fn run(&self, seed: Url) -> Result<CrawlReport, CorpusError> {
        if self.limits.workers > 1 {
            pool::run_pool(self, seed).await
        } else {
            self.run_sequential(seed).await
        }
    }

    async fn run_sequential(&self, seed: Url) -> Result<CrawlReport, CorpusError> {
        let started_at = chrono::Utc::now();
        let start_time = Instant::now();

        let mut state = CrawlState::new(self.limits.page_budget);
        info!(
            "Starting crawl at {} (budget {}, delay {:?})",
            seed, self.limits.page_budget, self.limits.delay
        );
        state.start(seed)?;

        let termination = loop {
            if self.cancel.is_cancelled() {
                break stop_reason(&state, true);
            }

            let url = match state.claim_next() {
                Claim::Fetch(url) => url,
                Claim::Finished(termination) => break termination,
                // Nothing is ever in flight between iterations here
                Claim::Wait => break state.natural_termination(),
            };

            info!(
                "Crawling ({}/{}): {}",
                state.visited_count(),
                self.limits.page_budget,
                url
            );
            let outcome = self.visit(&url).await;
            record_outcome(&mut state, &url, outcome);

            if state.has_pending_work() {
                self.pause().await;
            }
        };

        state.finish(termination)?;
        let report = CrawlReport::from_state(state, termination, started_at, start_time.elapsed());
        info!("Crawl finished: {}", report.summary_line());
        Ok(report)
    }

    /// Fetches a claimed URL and extracts its in-scope links
    ///
    /// Links are resolved against the final URL after redirects.
    pub(crate) async fn visit(&self, url: &Url) -> PageOutcome {
        match self.fetcher.fetch(url).await {
            FetchResult::Success {
                final_url,
                html,
                text,
                ..
            } => {
                if final_url != *url {
                    debug!("{} redirected to {}", url, final_url);
                }
                let links = extract_links(&final_url, &html, &self.filter);
                debug!("Found {} in-scope links on {}", links.len(), url);
                PageOutcome::Fetched { text, links }
            }
            failure => PageOutcome::Failed(failure),
        }
    }

    /// Sleeps the politeness delay, returning early on cancellation
    async fn pause(&self) {
        if self.limits.delay.is_zero() {
            return;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("Delay interrupted by cancellation");
            }
            _ = tokio::time::sleep(self.limits.delay) => {}
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// Applies a page outcome to the crawl state
pub(crate) fn record_outcome(state: &mut CrawlState, url: &Url, outcome: PageOutcome) {
    match outcome {
        PageOutcome::Fetched { text, links } => {
            let added = state.record_success(url, text, links);
            debug!(
                "{} new URLs queued from {} ({} in frontier)",
                added,
                url,
                state.frontier_len()
            );
        }
        PageOutcome::Failed(failure) => {
            warn!("Error on {}: {}", url, failure);
            state.record_failure(url);
        }
    }
}

/// Termination to report once the loop stops
pub(crate) fn stop_reason(state: &CrawlState, cancelled: bool) -> Termination {
    if cancelled && state.has_pending_work() {
        Termination::Cancelled
    } else {
        state.natural_termination()
    }
}
