use url::Url;

/// Whether a link stays on the site being analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Same hostname as the site domain
    Internal,
    /// Any other hostname
    External,
}

impl LinkScope {
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Extracts the hostname from a URL string
///
/// Returns `None` if the string is not a URL or has no host.
///
/// # Examples
///
/// ```
/// use seo_crawler::url::extract_domain;
///
/// assert_eq!(extract_domain("https://Example.com/path"), Some("example.com".to_string()));
/// assert_eq!(extract_domain("not a url"), None);
/// ```
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url).ok().as_ref().and_then(host_of)
}

/// Lowercase hostname of a parsed URL
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Classifies a link by comparing its hostname with the site domain
///
/// Ports and schemes are ignored: `http://example.com:8080/` is internal to
/// `example.com`. Returns `None` for URLs without a host.
pub fn classify_link(link: &Url, site_domain: &str) -> Option<LinkScope> {
    let host = host_of(link)?;
    if host.eq_ignore_ascii_case(site_domain) {
        Some(LinkScope::Internal)
    } else {
        Some(LinkScope::External)
    }
}
