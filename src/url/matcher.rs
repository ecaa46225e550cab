/// Checks if a host belongs to a root domain
///
/// A host matches when it is the root domain itself or any subdomain of it.
/// The comparison is done on label boundaries, so a host that merely contains
/// the root domain somewhere inside it does not match.
///
/// Both arguments should already be lowercase.
///
/// # Examples
///
/// ```
/// use site_corpus::url::matches_domain_suffix;
///
/// assert!(matches_domain_suffix("example.com", "example.com"));
/// assert!(matches_domain_suffix("example.com", "www.example.com"));
/// assert!(!matches_domain_suffix("example.com", "evilexample.com"));
/// assert!(!matches_domain_suffix("example.com", "example.com.attacker.tld"));
/// ```
pub fn matches_domain_suffix(root: &str, host: &str) -> bool {
    if root.is_empty() {
        return false;
    }

    match host.strip_suffix(root) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

/// Checks if a host contains the root domain anywhere
///
/// This is a raw substring test: `evilexample.com` and
/// `example.com.attacker.tld` both match `example.com`. It is kept only as an
/// explicit scope policy for crawls that want the loose behavior.
///
/// # Examples
///
/// ```
/// use site_corpus::url::contains_domain;
///
/// assert!(contains_domain("example.com", "www.example.com"));
/// assert!(contains_domain("example.com", "example.com.attacker.tld"));
/// assert!(!contains_domain("example.com", "example.org"));
/// ```
pub fn contains_domain(root: &str, host: &str) -> bool {
    !root.is_empty() && host.contains(root)
}
