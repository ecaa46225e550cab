//! Concurrent crawl with a fixed pool of fetch workers
//!
//! Workers share one `CrawlState` behind a mutex. Claiming a URL marks it
//! visited under that lock, so no URL is fetched twice and the visited count
//! never passes the page budget. Fetches run outside the lock; a shared
//! [`RateLimiter`] keeps request starts spaced by the politeness delay. Only a
//! worker holding a claimed URL reserves a slot, so idle workers never delay
//! the next real fetch.
//!
//! A worker that finds the frontier empty while others are still fetching
//! parks on a `Notify` until one of them records its page.

use crate::crawler::controller::{record_outcome, stop_reason, Controller};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::rate_limit::RateLimiter;
use crate::output::stats::CrawlReport;
use crate::state::{Claim, CrawlState};
use crate::CorpusError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::Notify;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use url::Url;

struct Shared {
    state: Mutex<CrawlState>,
    progress: Notify,
    limiter: RateLimiter,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs the crawl with `limits.workers` concurrent workers
pub(crate) async fn run_pool<F: PageFetcher + 'static>(
    controller: &Controller<F>,
    seed: Url,
) -> Result<CrawlReport, CorpusError> {
    let limits = controller.limits();
    let started_at = chrono::Utc::now();
    let start_time = Instant::now();

    let mut state = CrawlState::new(limits.page_budget);
    info!(
        "Starting crawl at {} (budget {}, delay {:?}, {} workers)",
        seed, limits.page_budget, limits.delay, limits.workers
    );
    state.start(seed)?;

    let shared = Arc::new(Shared {
        state: Mutex::new(state),
        progress: Notify::new(),
        limiter: RateLimiter::new(limits.delay),
    });

    let mut workers = JoinSet::new();
    for id in 0..limits.workers {
        let controller = controller.clone();
        let shared = Arc::clone(&shared);
        workers.spawn(async move { worker(id, controller, shared).await });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            error!("Crawl worker failed: {}", e);
        }
    }

    let mut state = {
        let mut guard = shared.state();
        std::mem::replace(&mut *guard, CrawlState::new(0))
    };

    let termination = stop_reason(&state, controller.is_cancelled());
    state.finish(termination)?;
    let report = CrawlReport::from_state(state, termination, started_at, start_time.elapsed());
    info!("Crawl finished: {}", report.summary_line());
    Ok(report)
}

async fn worker<F: PageFetcher + 'static>(
    id: usize,
    controller: Controller<F>,
    shared: Arc<Shared>,
) {
    debug!("Worker {} started", id);

    loop {
        if controller.is_cancelled() {
            break;
        }

        // Registered before claiming so a page recorded in between still wakes us
        let progress = shared.progress.notified();

        let claim = {
            let mut state = shared.state();
            let claim = state.claim_next();
            if let Claim::Fetch(url) = &claim {
                info!(
                    "Crawling ({}/{}): {}",
                    state.visited_count(),
                    state.page_budget(),
                    url
                );
            }
            claim
        };

        match claim {
            Claim::Fetch(url) => {
                tokio::select! {
                    _ = controller.cancelled() => {
                        debug!("Worker {} releasing {} on cancellation", id, url);
                        shared.state().release(url);
                        shared.progress.notify_waiters();
                        break;
                    }
                    _ = shared.limiter.acquire() => {}
                }

                let outcome = controller.visit(&url).await;
                record_outcome(&mut shared.state(), &url, outcome);
                shared.progress.notify_waiters();
            }
            Claim::Wait => {
                tokio::select! {
                    _ = controller.cancelled() => break,
                    _ = progress => {}
                }
            }
            Claim::Finished(termination) => {
                debug!("Worker {} done: {}", id, termination);
                shared.progress.notify_waiters();
                break;
            }
        }
    }

    debug!("Worker {} stopped", id);
}
