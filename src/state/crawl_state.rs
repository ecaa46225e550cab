//! Frontier, visited set and the crawl state that owns them

use crate::state::{CrawlDocument, CrawlPhase};
use crate::CorpusError;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use url::Url;

/// FIFO queue of URLs waiting to be fetched
///
/// Insertion order is the breadth-first visiting order. A URL is held at most
/// once; pushing a URL that is already queued is a no-op.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL to the tail; returns false if it was already queued
    pub fn push(&mut self, url: Url) -> bool {
        if !self.queued.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Puts a URL back at the head; returns false if it was already queued
    pub fn push_front(&mut self, url: Url) -> bool {
        if !self.queued.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_front(url);
        true
    }

    /// Removes and returns the head of the queue
    pub fn pop(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.queued.remove(url.as_str());
        Some(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// URLs that have been consumed by the crawl
///
/// A URL enters the set when it is claimed for fetching and stays there
/// whether the fetch succeeds or fails.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    /// Marks a URL as visited; returns false if it already was
    pub fn insert(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    /// Forgets a URL; returns false if it was not visited
    pub fn remove(&mut self, url: &Url) -> bool {
        self.urls.remove(url.as_str())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The visited set reached the page budget
    BudgetExhausted,
    /// No URLs were left to visit
    FrontierExhausted,
    /// Stopped by a user interrupt or deadline
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BudgetExhausted => "page budget reached",
            Self::FrontierExhausted => "frontier exhausted",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Result of asking the state for the next URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// Fetch this URL; it is already marked visited
    Fetch(Url),
    /// Nothing queued right now, but fetches in flight may still add links
    Wait,
    /// Nothing more will ever be claimed
    Finished(Termination),
}

/// All mutable state of one crawl
///
/// Owned by the controller; wrapped in a mutex only when several workers
/// share it. Every method is a complete state update, so holding the lock for
/// a single call keeps the budget and visited-once invariants intact.
#[derive(Debug)]
pub struct CrawlState {
    phase: CrawlPhase,
    frontier: Frontier,
    visited: VisitedSet,
    in_flight: usize,
    page_budget: usize,
    documents: Vec<CrawlDocument>,
    failures: usize,
    termination: Option<Termination>,
}

impl CrawlState {
    /// Creates an idle crawl state with the given page budget
    pub fn new(page_budget: usize) -> Self {
        Self {
            phase: CrawlPhase::Idle,
            frontier: Frontier::new(),
            visited: VisitedSet::default(),
            in_flight: 0,
            page_budget,
            documents: Vec::new(),
            failures: 0,
            termination: None,
        }
    }

    /// Enqueues the seed URL, without its fragment, and moves `Idle -> Running`
    pub fn start(&mut self, mut seed: Url) -> Result<(), CorpusError> {
        self.transition(CrawlPhase::Running)?;
        seed.set_fragment(None);
        self.frontier.push(seed);
        Ok(())
    }

    /// Moves `Running -> Done`, recording why the crawl stopped
    pub fn finish(&mut self, termination: Termination) -> Result<(), CorpusError> {
        self.transition(CrawlPhase::Done)?;
        self.termination = Some(termination);
        Ok(())
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), CorpusError> {
        if !self.phase.can_transition_to(next) {
            return Err(CorpusError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Claims the next URL to fetch
    ///
    /// Pops the frontier head, skips anything already visited, and marks the
    /// returned URL visited in the same step. Refuses to claim once the
    /// visited set has reached the page budget.
    pub fn claim_next(&mut self) -> Claim {
        if self.phase != CrawlPhase::Running {
            return Claim::Finished(self.termination.unwrap_or(Termination::FrontierExhausted));
        }

        loop {
            if self.visited.len() >= self.page_budget {
                return Claim::Finished(Termination::BudgetExhausted);
            }

            let Some(url) = self.frontier.pop() else {
                return if self.in_flight > 0 {
                    Claim::Wait
                } else {
                    Claim::Finished(Termination::FrontierExhausted)
                };
            };

            if !self.visited.insert(&url) {
                tracing::trace!("Skipping already visited {}", url);
                continue;
            }

            self.in_flight += 1;
            return Claim::Fetch(url);
        }
    }

    /// Records a successful fetch and enqueues its unseen links
    ///
    /// Returns the number of links newly added to the frontier.
    pub fn record_success(&mut self, url: &Url, text: String, links: Vec<Url>) -> usize {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.documents.push(CrawlDocument::new(url.as_str(), text));

        let mut added = 0;
        for link in links {
            if self.visited.contains(link.as_str()) {
                continue;
            }
            if self.frontier.push(link) {
                added += 1;
            }
        }
        added
    }

    /// Returns a claimed URL that was never fetched to the frontier head
    ///
    /// Used when a worker is stopped between claiming a URL and fetching it,
    /// so the URL neither counts toward the budget nor is lost.
    pub fn release(&mut self, url: Url) {
        if !self.visited.remove(&url) {
            return;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        self.frontier.push_front(url);
    }

    /// Records a failed fetch; the URL stays consumed
    pub fn record_failure(&mut self, _url: &Url) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.failures += 1;
    }

    /// Reason the crawl would stop now, ignoring cancellation
    pub fn natural_termination(&self) -> Termination {
        if self.visited.len() >= self.page_budget {
            Termination::BudgetExhausted
        } else {
            Termination::FrontierExhausted
        }
    }

    /// Returns true if another claim could still yield a URL
    pub fn has_pending_work(&self) -> bool {
        self.phase == CrawlPhase::Running
            && self.visited.len() < self.page_budget
            && !self.frontier.is_empty()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn documents(&self) -> &[CrawlDocument] {
        &self.documents
    }

    /// Hands the collected documents over, in the order they were fetched
    pub fn into_documents(self) -> Vec<CrawlDocument> {
        self.documents
    }
}
