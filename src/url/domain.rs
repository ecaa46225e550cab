use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_corpus::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives the root domain a crawl is confined to from its seed URL
///
/// The seed host is lowercased and a leading `www.` is dropped, so a seed of
/// `https://www.example.com/docs/` scopes the crawl to `example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_corpus::url::root_domain_of;
///
/// let seed = Url::parse("https://www.example.com/docs/").unwrap();
/// assert_eq!(root_domain_of(&seed), Some("example.com".to_string()));
/// ```
pub fn root_domain_of(seed: &Url) -> Option<String> {
    let host = extract_domain(seed)?;
    match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => Some(rest.to_string()),
        _ => Some(host),
    }
}

/// Parses a crawl seed, which must be an absolute http(s) URL with a host
///
/// The fragment is dropped, as it is for every discovered link.
///
/// # Examples
///
/// ```
/// use site_corpus::url::parse_seed;
///
/// assert!(parse_seed("https://example.com/").is_ok());
/// assert!(parse_seed("ftp://example.com/").is_err());
/// assert!(parse_seed("/relative").is_err());
/// ```
pub fn parse_seed(raw: &str) -> UrlResult<Url> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("'{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_errors() {
        assert!(matches!(parse_seed("not a url"), Err(UrlError::Parse(_))));
        assert!(matches!(
            parse_seed("mailto:someone@example.com"),
            Err(UrlError::InvalidScheme(s)) if s == "mailto"
        ));
        assert_eq!(
            parse_seed("  https://example.com/start  ").unwrap().as_str(),
            "https://example.com/start"
        );
    }

    #[test]
    fn test_parse_seed_drops_fragment() {
        let seed = parse_seed("https://example.com/about#team").unwrap();
        assert_eq!(seed.as_str(), "https://example.com/about");
        assert_eq!(seed.fragment(), None);
    }

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_root_domain_strips_www() {
        let url = Url::parse(
            "https://www.gainwelltechnologies.com/solutions/medicaid-enterprise/",
        )
        .unwrap();
        assert_eq!(
            root_domain_of(&url),
            Some("gainwelltechnologies.com".to_string())
        );
    }

    #[test]
    fn test_root_domain_keeps_other_subdomains() {
        let url = Url::parse("https://docs.example.com/").unwrap();
        assert_eq!(root_domain_of(&url), Some("docs.example.com".to_string()));
    }

    #[test]
    fn test_root_domain_of_ip_host() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(root_domain_of(&url), Some("127.0.0.1".to_string()));
    }
}
