//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the `Idle -> Running -> Done` lifecycle of a crawl
//! - `CrawlState`: frontier, visited set and collected documents of one crawl
//! - `CrawlDocument`: the text of one fetched page

mod crawl_state;
mod document;
mod phase;

pub use crawl_state::{Claim, CrawlState, Frontier, Termination, VisitedSet};
pub use document::CrawlDocument;
pub use phase::CrawlPhase;
