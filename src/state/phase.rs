//! Lifecycle phase definitions for a crawl

use std::fmt;

/// Represents where a crawl is in its lifecycle
///
/// The only legal path is `Idle -> Running -> Done`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Created, seed not yet enqueued
    #[default]
    Idle,

    /// Pulling URLs from the frontier
    Running,

    /// Budget spent, frontier drained, or cancelled
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Done)
        )
    }

    /// Returns true once the crawl has finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
        };
        write!(f, "{}", s)
    }
}
