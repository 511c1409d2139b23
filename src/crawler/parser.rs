//! HTML parser for extracting SEO signals and links
//!
//! This module handles parsing HTML content to extract:
//! - Title, meta description and canonical link
//! - H1/H2 headings
//! - hreflang alternates
//! - Outgoing links, classified internal or external

use crate::crawler::record::{LinkRecord, PageSignals};
use crate::url::{classify_link, normalize, CanonicalUrl, LinkScope};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Number of H2 texts retained per page
const MAX_H2_TEXTS: usize = 10;

/// Everything the parser learned from one document
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub signals: PageSignals,

    /// Internal link targets in first-discovery order, deduplicated
    pub internal_links: Vec<CanonicalUrl>,

    /// Original hrefs that resolved but were excluded, in document order
    pub excluded_hrefs: Vec<String>,
}

/// Parses HTML content and extracts SEO signals and links
///
/// # Link Extraction Rules
///
/// **Skip:**
/// - Missing or empty `href`
/// - `javascript:` hrefs
/// - Pure fragment hrefs (`#`, `#section`)
/// - Non-HTTP(S) targets (`mailto:`, `tel:`, `data:`)
///
/// **Record as excluded:**
/// - hrefs that cannot be resolved, or whose target has a blacklisted
///   extension or a query string
///
/// Every remaining anchor counts towards the internal or external link count;
/// the link list keeps each canonical target once.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The page URL, used to resolve relative links
/// * `site_domain` - Hostname that makes a link internal
///
/// # Example
///
/// ```
/// use seo_crawler::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><h1>Hi</h1><a href="/page">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &page_url, "example.com");
/// assert_eq!(parsed.signals.title, "Test");
/// assert_eq!(parsed.signals.internal_links_count, 1);
/// ```
pub fn parse_html(html: &str, page_url: &Url, site_domain: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = select(&document, "title")
        .first()
        .map(element_text)
        .unwrap_or_default();

    let meta_description = select(&document, r#"meta[name="description"]"#)
        .first()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    let h1s = select(&document, "h1");
    let h2s = select(&document, "h2");

    let canonical_url = select(&document, r#"link[rel="canonical"]"#)
        .first()
        .and_then(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty());

    let has_hreflang = !select(&document, r#"link[rel="alternate"][hreflang]"#).is_empty();

    let mut parsed = ParsedPage {
        signals: PageSignals {
            title,
            meta_description,
            h1_count: h1s.len(),
            h1_text: h1s.first().map(element_text).unwrap_or_default(),
            h2_count: h2s.len(),
            h2_texts: h2s.iter().take(MAX_H2_TEXTS).map(element_text).collect(),
            canonical_url,
            has_hreflang,
            ..Default::default()
        },
        ..Default::default()
    };

    extract_links(&document, page_url, site_domain, &mut parsed);

    parsed
}

/// Walks all anchors and fills link counts, link records and exclusions
fn extract_links(document: &Html, page_url: &Url, site_domain: &str, parsed: &mut ParsedPage) {
    let mut seen: HashSet<CanonicalUrl> = HashSet::new();

    for element in select(document, "a[href]") {
        let Some(href) = element.value().attr("href").map(str::trim) else {
            continue;
        };

        if should_skip_href(href) {
            continue;
        }

        let resolved = match page_url.join(href) {
            Ok(resolved) => resolved,
            Err(_) => {
                parsed.excluded_hrefs.push(href.to_string());
                continue;
            }
        };

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }

        let Some(canonical) = normalize(page_url, href) else {
            parsed.excluded_hrefs.push(href.to_string());
            continue;
        };

        let Some(scope) = classify_link(canonical.as_url(), site_domain) else {
            continue;
        };

        match scope {
            LinkScope::Internal => parsed.signals.internal_links_count += 1,
            LinkScope::External => parsed.signals.external_links_count += 1,
        }

        if !seen.insert(canonical.clone()) {
            continue;
        }

        parsed.signals.links.push(LinkRecord {
            url: canonical.to_string(),
            anchor_text: anchor_text(&element),
            is_internal: scope.is_internal(),
        });

        if scope.is_internal() {
            parsed.internal_links.push(canonical);
        }
    }
}

/// Returns true for hrefs that are never links to another document
fn should_skip_href(href: &str) -> bool {
    href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:")
}

/// Anchor text, falling back to the title attribute
fn anchor_text(element: &ElementRef<'_>) -> String {
    let text = element_text(element);
    if !text.is_empty() {
        return text;
    }

    element
        .value()
        .attr("title")
        .map(|title| title.trim().to_string())
        .unwrap_or_default()
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Selects all elements matching a CSS selector; an invalid selector matches nothing
fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}
