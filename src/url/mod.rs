//! URL handling module for site-corpus
//!
//! This module decides which discovered links belong to the crawled site.

mod domain;
mod matcher;

use crate::config::CrawlerConfig;
use crate::ConfigError;
use serde::Deserialize;
use url::Url;

pub use domain::{extract_domain, parse_seed, root_domain_of};
pub use matcher::{contains_domain, matches_domain_suffix};

/// How a link's host is compared against the crawl's root domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopePolicy {
    /// Host equals the root domain or is a subdomain of it
    #[default]
    Suffix,
    /// Host contains the root domain anywhere (loose, accepts look-alike hosts)
    Substring,
}

impl ScopePolicy {
    fn matches(&self, root: &str, host: &str) -> bool {
        match self {
            Self::Suffix => matches_domain_suffix(root, host),
            Self::Substring => contains_domain(root, host),
        }
    }
}

/// Decides whether a URL is in scope for the crawl
///
/// A URL is in scope when it uses http or https and its host matches the
/// root domain under the configured [`ScopePolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFilter {
    root_domain: String,
    policy: ScopePolicy,
}

impl UrlFilter {
    /// Creates a filter for the given root domain
    pub fn new(root_domain: impl Into<String>, policy: ScopePolicy) -> Self {
        Self {
            root_domain: root_domain.into().to_lowercase(),
            policy,
        }
    }

    /// Builds the filter for a crawl from its seed and crawler configuration
    ///
    /// An explicit `root-domain` wins; otherwise the seed host without a
    /// leading `www.` is used.
    pub fn for_seed(seed: &Url, config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let root = match &config.root_domain {
            Some(root) => root.clone(),
            None => root_domain_of(seed).ok_or_else(|| {
                ConfigError::InvalidUrl(format!("Seed URL '{}' has no host", seed))
            })?,
        };

        if config.scope_policy == ScopePolicy::Substring {
            tracing::warn!(
                "Substring scope policy enabled: any host containing '{}' is crawled",
                root
            );
        }

        Ok(Self::new(root, config.scope_policy))
    }

    /// Returns the root domain this filter admits
    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Returns the active scope policy
    pub fn policy(&self) -> ScopePolicy {
        self.policy
    }

    /// Checks a URL string; anything that fails to parse is out of scope
    ///
    /// # Examples
    ///
    /// ```
    /// use site_corpus::url::{ScopePolicy, UrlFilter};
    ///
    /// let filter = UrlFilter::new("example.com", ScopePolicy::Suffix);
    /// assert!(filter.is_in_scope("https://www.example.com/about"));
    /// assert!(!filter.is_in_scope("ftp://example.com/file"));
    /// assert!(!filter.is_in_scope("not a url"));
    /// ```
    pub fn is_in_scope(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.is_url_in_scope(&parsed),
            Err(_) => false,
        }
    }

    /// Checks an already parsed URL
    pub fn is_url_in_scope(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match extract_domain(url) {
            Some(host) => self.policy.matches(&self.root_domain, &host),
            None => false,
        }
    }
}
