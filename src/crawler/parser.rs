//! HTML parsing for link discovery and text extraction
//!
//! This module handles parsing HTML content to extract:
//! - In-scope links to follow (from `<a href>` tags)
//! - The readable text of the page

use crate::url::UrlFilter;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text content is never part of the page text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts the in-scope links of a page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, resolved against `page_url`
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - Fragment-only hrefs (same page anchors)
/// - hrefs that do not resolve to an absolute URL
/// - URLs the filter rejects
///
/// Fragments are removed from resolved URLs. The result holds each URL once,
/// in the order it first appears in the document.
///
/// # Example
///
/// ```
/// use site_corpus::crawler::extract_links;
/// use site_corpus::url::{ScopePolicy, UrlFilter};
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><a href="https://other.org/">Other</a>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let filter = UrlFilter::new("example.com", ScopePolicy::Suffix);
///
/// let links = extract_links(&page, html, &filter);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/about");
/// ```
pub fn extract_links(page_url: &Url, html: &str, filter: &UrlFilter) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute_url) = resolve_link(href, page_url) else {
            continue;
        };
        if !filter.is_url_in_scope(&absolute_url) {
            continue;
        }
        if seen.insert(absolute_url.as_str().to_string()) {
            links.push(absolute_url);
        }
    }

    links
}

/// Resolves a link href to an absolute URL without its fragment
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only hrefs
/// - hrefs that fail to resolve
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    absolute_url.set_fragment(None);
    Some(absolute_url)
}

/// Extracts the readable text of an HTML document
///
/// Collects every text node outside `script`, `style`, `noscript` and
/// `template` elements, trims it, and joins the non-empty ones with newlines.
/// The `<title>` text is included.
///
/// # Example
///
/// ```
/// use site_corpus::crawler::html_to_text;
///
/// let html = "<html><head><title>Home</title><script>var x;</script></head>\
///             <body><p>Hello <b>world</b></p></body></html>";
/// assert_eq!(html_to_text(html), "Home\nHello\nworld");
/// ```
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    lines.join("\n")
}
