//! Crawler module for web page fetching and traversal
//!
//! This module contains the basic pass and the traversal engine, including:
//! - HTTP fetching with a fixed timeout and bounded redirects
//! - HTML parsing into page records and links
//! - Depth-first traversal of a site's internal link graph

mod coordinator;
mod fetcher;
mod parser;
mod record;

pub use coordinator::{Crawler, EXCLUDED_URLS_LIMIT};
pub use fetcher::{build_http_client, fetch_url, ExtractedPage, FetchResult, PageFetcher};
pub use parser::{parse_html, ParsedPage};
pub use record::{
    LinkRecord, PageError, PageRecord, PageResult, PageSignals, ResponseMeta,
    GENERIC_FAILURE_STATUS, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::SeoError;

/// Runs a complete crawl operation
///
/// This is the main entry point for crawling a site. It will:
/// 1. Validate and canonicalize the seed URL
/// 2. Build the HTTP client
/// 3. Walk the internal link graph up to the page budget
/// 4. Return every page record together with the excluded URLs
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The seed URL
/// * `max_pages` - Page budget; `config.crawler.max_pages` when `None`
///
/// # Example
///
/// ```no_run
/// use seo_crawler::config::Config;
/// use seo_crawler::crawler::crawl_site;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl_site(&Config::default(), "https://example.com/", Some(20)).await?;
/// println!("{} pages, {} excluded", report.page_count, report.excluded_count);
/// # Ok(())
/// # }
/// ```
pub async fn crawl_site(
    config: &Config,
    seed: &str,
    max_pages: Option<usize>,
) -> Result<CrawlReport, SeoError> {
    Crawler::new(config)?.crawl(seed, max_pages).await
}
