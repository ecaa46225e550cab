//! Text normalization of a saved corpus
//!
//! This module handles the second, offline pass over a raw corpus:
//! - Collapsing whitespace runs to single spaces
//! - Stripping configured boilerplate patterns, in order
//! - Writing the cleaned records as JSONL and as a numbered text dump
//!
//! # Example
//!
//! ```
//! use site_corpus::config::BoilerplatePattern;
//! use site_corpus::Normalizer;
//!
//! let normalizer = Normalizer::from_patterns(&[BoilerplatePattern::Literal(
//!     "Medicaid Enterprise | Gainwell".to_string(),
//! )])
//! .unwrap();
//!
//! assert_eq!(
//!     normalizer.normalize("Medicaid Enterprise | Gainwell  extra   text"),
//!     "extra text"
//! );
//! ```

mod patterns;

pub use patterns::compile_patterns;

use crate::config::{BoilerplatePattern, Config};
use crate::output::{read_raw_corpus, CorpusSink, JsonlWriter, TextDumpWriter};
use crate::state::CrawlDocument;
use crate::{ConfigResult, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

/// A cleaned corpus record; same shape as a raw one
pub type CorpusRecord = CrawlDocument;

/// Strips whitespace runs and boilerplate from page text
///
/// The pattern list is fixed at construction, so `normalize` depends only on
/// its input.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    patterns: Vec<Regex>,
}

impl Normalizer {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Compiles the configured patterns into a normalizer
    pub fn from_patterns(patterns: &[BoilerplatePattern]) -> ConfigResult<Self> {
        Ok(Self::new(compile_patterns(patterns)?))
    }

    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Self::from_patterns(&config.normalizer.patterns)
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Normalizes one text
    ///
    /// Collapses whitespace, removes every pattern in order, collapses again
    /// and trims. The pass repeats until the text stops changing, so removing
    /// a pattern can never expose a new match that a second call would strip.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = collapse_whitespace(text);

        loop {
            let mut stripped = current.clone();
            for pattern in &self.patterns {
                stripped = pattern.replace_all(&stripped, "").into_owned();
            }

            let next = collapse_whitespace(&stripped);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    /// Normalizes a record, keeping its URL
    pub fn normalize_record(&self, record: &CrawlDocument) -> CorpusRecord {
        CorpusRecord::new(record.url.clone(), self.normalize(&record.text))
    }
}

/// Replaces every whitespace run with one space and trims both ends
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Summary of a normalization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Number of records written to each output
    pub records: usize,
    /// Records whose text was empty after normalization
    pub empty_records: usize,
    pub jsonl_path: PathBuf,
    pub text_path: PathBuf,
}

/// Normalizes a raw corpus file into the JSONL and text dump outputs
///
/// Records keep their order and are written even when their text ends up
/// empty.
///
/// # Arguments
///
/// * `raw` - The raw corpus written by the crawl
/// * `jsonl` - Destination of the JSONL output
/// * `text` - Destination of the text dump
/// * `normalizer` - The configured normalizer
///
/// # Returns
///
/// * `Ok(NormalizeReport)` - Both outputs written
/// * `Err(CorpusError)` - The raw corpus is missing or malformed, or an output
///   could not be written
pub fn normalize_corpus(
    raw: &Path,
    jsonl: &Path,
    text: &Path,
    normalizer: &Normalizer,
) -> Result<NormalizeReport> {
    let documents = read_raw_corpus(raw)?;
    tracing::info!(
        "Normalizing {} records from {} ({} patterns)",
        documents.len(),
        raw.display(),
        normalizer.pattern_count()
    );

    let records: Vec<CorpusRecord> = documents
        .iter()
        .map(|document| normalizer.normalize_record(document))
        .collect();

    let empty_records = records.iter().filter(|r| r.text.is_empty()).count();
    if empty_records > 0 {
        tracing::warn!("{} records are empty after normalization", empty_records);
    }

    let jsonl_path = JsonlWriter::new(jsonl).write_records(&records)?;
    let text_path = TextDumpWriter::new(text).write_records(&records)?;

    tracing::info!(
        "Cleaned data saved to {} and {}",
        jsonl_path.display(),
        text_path.display()
    );

    Ok(NormalizeReport {
        records: records.len(),
        empty_records,
        jsonl_path,
        text_path,
    })
}
