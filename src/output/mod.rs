//! Output module for corpus files and crawl summaries
//!
//! This module handles:
//! - Writing and reading the raw JSON corpus
//! - Writing the cleaned corpus as JSONL and as a text dump
//! - Reporting crawl statistics

mod cleaned;
mod corpus;
pub mod stats;
mod traits;

pub use cleaned::{format_text_record, JsonlWriter, TextDumpWriter, RECORD_SEPARATOR_WIDTH};
pub use corpus::{read_raw_corpus, CorpusWriter};
pub use stats::{print_report, CrawlReport};
pub use traits::CorpusSink;
