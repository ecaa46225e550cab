use crate::url::{parse_seed, ScopePolicy};
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Main configuration structure for site-corpus
///
/// Every section has defaults, so an empty file (or no file at all) is a valid
/// starting point that CLI flags can fill in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlerConfig {
    /// URL the breadth-first traversal starts from
    #[serde(default)]
    pub seed_url: Option<String>,

    /// Domain that in-scope hosts must belong to (defaults to the seed host)
    #[serde(default)]
    pub root_domain: Option<String>,

    /// How hosts are compared against the root domain
    #[serde(default)]
    pub scope_policy: ScopePolicy,

    /// Maximum number of URLs consumed, successful or not
    #[serde(default = "default_page_budget")]
    pub page_budget: usize,

    /// Politeness delay between fetches (milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Total per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of concurrent fetch workers; 1 is the sequential reference crawl
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Optional wall-clock deadline after which the crawl is cancelled (seconds)
    #[serde(default)]
    pub max_duration_secs: Option<u64>,
}

impl CrawlerConfig {
    /// Parses the configured seed URL
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - An absolute http(s) URL
    /// * `Err(ConfigError)` - No seed configured, or it is not a usable URL
    pub fn seed(&self) -> Result<Url, ConfigError> {
        let raw = self.seed_url.as_deref().ok_or(ConfigError::MissingSeed)?;
        parse_seed(raw).map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL: {}", e)))
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            root_domain: None,
            scope_policy: ScopePolicy::default(),
            page_budget: default_page_budget(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            workers: default_workers(),
            max_duration_secs: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Path of the raw JSON corpus written by the crawl
    #[serde(default = "default_raw_path")]
    pub raw_path: String,

    /// Path of the cleaned line-delimited JSON corpus
    #[serde(default = "default_cleaned_jsonl_path")]
    pub cleaned_jsonl_path: String,

    /// Path of the cleaned human-readable text dump
    #[serde(default = "default_cleaned_text_path")]
    pub cleaned_text_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_path: default_raw_path(),
            cleaned_jsonl_path: default_cleaned_jsonl_path(),
            cleaned_text_path: default_cleaned_text_path(),
        }
    }
}

/// Text normalizer configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Boilerplate patterns, applied in order
    #[serde(default)]
    pub patterns: Vec<BoilerplatePattern>,
}

/// A single boilerplate pattern entry
///
/// In TOML this is written as `{ literal = "..." }` or `{ regex = "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoilerplatePattern {
    /// Matched verbatim
    Literal(String),
    /// Matched as a regular expression
    Regex(String),
}

fn default_page_budget() -> usize {
    150
}

fn default_delay_ms() -> u64 {
    1500
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_workers() -> usize {
    1
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_raw_path() -> String {
    "data/raw/corpus.json".to_string()
}

fn default_cleaned_jsonl_path() -> String {
    "data/processed/corpus_clean.jsonl".to_string()
}

fn default_cleaned_text_path() -> String {
    "data/processed/corpus_clean.txt".to_string()
}
