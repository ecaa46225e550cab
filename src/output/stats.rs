//! Crawl statistics and end-of-run reporting
//!
//! This module provides the summary a crawl hands back to its caller along
//! with the collected documents, and a formatted printout of it.

use crate::state::{CrawlDocument, CrawlState, Termination};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of one crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Successfully fetched pages, in fetch order
    pub documents: Vec<CrawlDocument>,

    /// Number of URLs consumed from the frontier (successes and failures)
    pub visited: usize,

    /// Configured maximum for `visited`
    pub page_budget: usize,

    /// Number of fetches that failed
    pub failures: usize,

    /// Why the crawl stopped
    pub termination: Termination,

    /// Wall-clock start of the crawl
    pub started_at: DateTime<Utc>,

    /// Time spent crawling
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Builds the report from a finished crawl state
    pub(crate) fn from_state(
        state: CrawlState,
        termination: Termination,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        let visited = state.visited_count();
        let page_budget = state.page_budget();
        let failures = state.failures();

        Self {
            documents: state.into_documents(),
            visited,
            page_budget,
            failures,
            termination,
            started_at,
            elapsed,
        }
    }

    /// Pages fetched per second over the whole run
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.visited as f64 / secs
        } else {
            0.0
        }
    }

    /// One-line summary used for the final log message
    pub fn summary_line(&self) -> String {
        format!(
            "{} documents from {}/{} visited pages ({} failed), {} after {:.1}s",
            self.documents.len(),
            self.visited,
            self.page_budget,
            self.failures,
            self.termination,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Duration: {:.1}s", report.elapsed.as_secs_f64());
    println!("  Stopped because: {}", report.termination);
    println!();

    println!("Pages:");
    println!("  Visited: {} / {}", report.visited, report.page_budget);
    println!("  Documents: {}", report.documents.len());
    println!("  Failed: {}", report.failures);
    println!("  Rate: {:.2} pages/sec", report.pages_per_second());
    println!();
}
