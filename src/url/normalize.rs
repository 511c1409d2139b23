use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Path suffixes that are never crawled (binary, document, archive and media files)
const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".pdf", ".doc", ".docx", ".xls", ".xlsx",
    ".ppt", ".pptx", ".zip", ".rar", ".tar", ".gz", ".mp4", ".mp3", ".avi", ".mov",
];

/// A resolved, fragment-free URL that passed the exclusion filter
///
/// Two URLs that differ only by fragment map to the same `CanonicalUrl`, which
/// makes this the deduplication key of a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Lowercase hostname of the URL
    pub fn domain(&self) -> Option<&str> {
        self.0.host_str()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Canonicalizes `raw` against `base`
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base`; reject if resolution fails
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Remove the fragment (everything after #)
/// 4. Drop an empty trailing `?`
/// 5. Reject excluded URLs (see [`is_excluded`])
///
/// Returns `None` when the URL cannot be resolved or is excluded. Callers that
/// track exclusions must record the original `raw` string themselves.
///
/// # Examples
///
/// ```
/// use seo_crawler::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let url = normalize(&base, "intro#setup").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/intro");
///
/// assert!(normalize(&base, "guide.pdf").is_none());
/// assert!(normalize(&base, "search?q=rust").is_none());
/// ```
pub fn normalize(base: &Url, raw: &str) -> Option<CanonicalUrl> {
    let mut url = base.join(raw.trim()).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    if url.query() == Some("") {
        url.set_query(None);
    }

    if is_excluded(&url) {
        tracing::debug!("Excluded URL: {}", url);
        return None;
    }

    Some(CanonicalUrl(url))
}

/// Canonicalizes an absolute URL against itself
///
/// This is how the traversal treats every candidate it is about to visit.
pub fn canonicalize(raw: &str) -> Option<CanonicalUrl> {
    let base = Url::parse(raw.trim()).ok()?;
    normalize(&base, raw)
}

/// Checks whether a URL string must never be crawled
///
/// Fails closed: a string that does not parse as a URL is excluded.
pub fn should_exclude(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => is_excluded(&parsed),
        Err(_) => true,
    }
}

/// Checks whether a parsed URL has a blacklisted extension or a query string
pub fn is_excluded(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    if EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return true;
    }

    url.query().is_some_and(|q| !q.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_strip_fragment() {
        let result = normalize(&base(), "https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_fragment_variants_share_canonical_form() {
        let a = normalize(&base(), "/page#one").unwrap();
        let b = normalize(&base(), "/page#two").unwrap();
        let c = normalize(&base(), "/page").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_resolve_relative_path() {
        let result = normalize(&base(), "other").unwrap();
        assert_eq!(result.as_str(), "https://example.com/blog/other");
    }

    #[test]
    fn test_resolve_root_relative_path() {
        let result = normalize(&base(), "/about").unwrap();
        assert_eq!(result.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_query_string_excluded() {
        assert!(normalize(&base(), "/search?q=rust").is_none());
    }

    #[test]
    fn test_empty_query_dropped() {
        let result = normalize(&base(), "/page?").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_blacklisted_extension_excluded() {
        assert!(normalize(&base(), "/files/report.PDF").is_none());
        assert!(normalize(&base(), "/img/logo.png").is_none());
        assert!(normalize(&base(), "/archive.tar").is_none());
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        assert!(normalize(&base(), "mailto:someone@example.com").is_none());
        assert!(normalize(&base(), "ftp://example.com/file").is_none());
    }

    #[test]
    fn test_idempotent() {
        let base = base();
        for raw in ["/a#x", "relative/path", "https://example.com/", "../up"] {
            let once = normalize(&base, raw).unwrap();
            let twice = normalize(&base, once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_canonicalize_against_itself() {
        let result = canonicalize("https://example.com/a#top").unwrap();
        assert_eq!(result.as_str(), "https://example.com/a");
        assert!(canonicalize("not a url").is_none());
    }

    #[test]
    fn test_should_exclude() {
        assert!(should_exclude("https://x.com/a.pdf"));
        assert!(should_exclude("https://x.com/a.html?x=1"));
        assert!(!should_exclude("https://x.com/a.html"));
    }

    #[test]
    fn test_should_exclude_fails_closed() {
        assert!(should_exclude("::not-a-url::"));
        assert!(should_exclude(""));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(should_exclude("https://x.com/VIDEO.MP4"));
    }
}
