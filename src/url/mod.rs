//! URL handling module for SEO Crawler
//!
//! This module provides canonicalization, the exclusion filter, domain
//! extraction and internal/external link classification.

mod domain;
mod normalize;

pub use domain::{classify_link, extract_domain, host_of, LinkScope};
pub use normalize::{canonicalize, is_excluded, normalize, should_exclude, CanonicalUrl};

use crate::UrlError;
use url::Url;

/// Parses and canonicalizes a seed URL supplied by a caller
///
/// Unlike [`canonicalize`], this reports why a seed was rejected so the
/// caller can surface an input error before any work starts.
///
/// # Examples
///
/// ```
/// use seo_crawler::url::parse_seed;
///
/// let seed = parse_seed("https://example.com/#top").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/");
/// assert!(parse_seed("ftp://example.com/").is_err());
/// ```
pub fn parse_seed(raw: &str) -> Result<CanonicalUrl, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let parsed = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            parsed.scheme()
        )));
    }

    if host_of(&parsed).is_none() {
        return Err(UrlError::MissingDomain);
    }

    normalize(&parsed, raw).ok_or_else(|| UrlError::Parse(format!("excluded URL: {}", raw)))
}
