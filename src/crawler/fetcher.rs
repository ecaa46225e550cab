//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a bounded timeout and user agent string
//! - GET requests to fetch page content
//! - Error classification into `FetchResult` variants
//! - HTML-to-text extraction of fetched pages

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::html_to_text;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Connect timeout applied on top of the total request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a fetch operation
///
/// Fetching never returns an error: every transport, status, or decoding
/// problem is reported as one of the failure variants.
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Raw HTML body
        html: String,
        /// Readable text of the page
        text: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request ran into the timeout
        timed_out: bool,
    },
}

impl FetchResult {
    /// Builds a success result, extracting the page text from the HTML
    pub fn from_html(final_url: Url, status_code: u16, html: String) -> Self {
        let text = html_to_text(&html);
        Self::Success {
            final_url,
            status_code,
            html,
            text,
        }
    }

    /// Returns true for a successfully fetched page
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { status_code, .. } => write!(f, "HTTP {}", status_code),
            Self::HttpError { status_code } => write!(f, "HTTP {}", status_code),
            Self::ContentMismatch { content_type } => {
                write!(f, "expected HTML, got '{}'", content_type)
            }
            Self::NetworkError {
                timed_out: true, ..
            } => write!(f, "request timed out"),
            Self::NetworkError { error, .. } => write!(f, "network error: {}", error),
        }
    }
}

/// Retrieves pages for the crawl controller
///
/// Implementations must not block indefinitely; the HTTP implementation
/// bounds every request with a timeout.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a URL and returns its content or the classified failure
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Total time allowed for one request, body included
///
/// # Example
///
/// ```no_run
/// use site_corpus::config::UserAgentConfig;
/// use site_corpus::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from crawler and user agent configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, crawler.timeout())?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML (or no) Content-Type | Success |
/// | 2xx with another Content-Type | ContentMismatch |
/// | Non-2xx status | HttpError |
/// | Timeout, connection failure, body read failure | NetworkError |
///
/// Redirects are followed by the client; the final URL is reported.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::from_html(final_url, status.as_u16(), body),
        Err(e) => classify_error(e),
    }
}

/// Accepts HTML and XHTML; a missing header is treated as HTML
fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.is_empty() || mime == "text/html" || mime == "application/xhtml+xml"
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10));
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let config = UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: Some("https://example.com/about".to_string()),
        };
        assert_eq!(
            config.header_value(),
            "TestCrawler/1.0 (+https://example.com/about)"
        );

        let bare = UserAgentConfig {
            contact_url: None,
            ..config
        };
        assert_eq!(bare.header_value(), "TestCrawler/1.0");
    }

    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("TEXT/HTML"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(is_html_content_type(""));

        assert!(!is_html_content_type("application/pdf"));
        assert!(!is_html_content_type("image/png"));
        assert!(!is_html_content_type("application/json"));
    }

    #[test]
    fn test_from_html_extracts_text() {
        let url = Url::parse("https://example.com/").unwrap();
        let result =
            FetchResult::from_html(url, 200, "<html><body><p>Hi</p></body></html>".to_string());

        assert!(result.is_success());
        match result {
            FetchResult::Success { text, .. } => assert_eq!(text, "Hi"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(
            FetchResult::HttpError { status_code: 404 }.to_string(),
            "HTTP 404"
        );
        assert_eq!(
            FetchResult::NetworkError {
                error: "x".to_string(),
                timed_out: true
            }
            .to_string(),
            "request timed out"
        );
        assert!(!FetchResult::ContentMismatch {
            content_type: "application/pdf".to_string()
        }
        .is_success());
    }
}
