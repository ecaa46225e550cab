//! site-corpus: a bounded single-site crawler and corpus normalizer
//!
//! This crate crawls one website breadth-first within a page budget, keeps the
//! text of every page it fetched, and writes it out as a JSON corpus. A second,
//! independent pass strips boilerplate from a saved corpus and emits JSONL and
//! a human-readable text dump.

pub mod config;
pub mod crawler;
pub mod normalize;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for site-corpus operations
///
/// Per-page fetch failures never show up here; the crawl controller absorbs
/// them. Only setup and storage failures are surfaced to the caller.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed corpus file {path}: {source}")]
    CorpusFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize corpus: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

impl CorpusError {
    /// Wraps an I/O error together with the path it happened on
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid boilerplate pattern: {0}")]
    InvalidPattern(String),

    #[error("No seed URL configured (set crawler.seed-url or pass --seed)")]
    MissingSeed,

    #[error("Raw corpus not found: {}", .0.display())]
    MissingCorpus(PathBuf),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for site-corpus operations
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Controller, CrawlLimits, CrawlReport};
pub use normalize::{normalize_corpus, NormalizeReport, Normalizer};
pub use output::{read_raw_corpus, CorpusWriter};
pub use state::{CrawlDocument, CrawlPhase, Termination};
pub use self::url::{ScopePolicy, UrlFilter};
