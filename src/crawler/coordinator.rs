//! Crawl traversal engine
//!
//! This module walks the internal link graph of a site starting from a seed
//! URL. The walk is a depth-first pre-order over first-discovery order, driven
//! by an explicit stack instead of recursion:
//! - Every candidate is offered to the run's `CrawlState` when popped
//! - Visited pages are fetched one at a time, never concurrently
//! - A page's internal links are pushed in reverse so the first link is
//!   explored next, which reproduces recursive pre-order exactly
//! - Fetch failures become error records and end that branch only

use crate::config::Config;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::record::PageResult;
use crate::output::CrawlReport;
use crate::state::{CrawlState, VisitDecision};
use crate::url::{parse_seed, CanonicalUrl};
use crate::{SeoError, UrlError};
use chrono::Utc;
use std::time::Instant;

/// Maximum number of excluded URLs listed in a crawl report
pub const EXCLUDED_URLS_LIMIT: usize = 100;

/// Main crawler structure
pub struct Crawler {
    fetcher: PageFetcher,
    max_pages: usize,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Successfully created crawler
    /// * `Err(SeoError)` - Failed to build the HTTP client
    pub fn new(config: &Config) -> Result<Self, SeoError> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            max_pages: config.crawler.max_pages,
        })
    }

    /// Creates a crawler around an existing fetcher
    pub fn with_fetcher(fetcher: PageFetcher, max_pages: usize) -> Self {
        Self { fetcher, max_pages }
    }

    /// Crawls a site from `seed`
    ///
    /// Input errors (empty, unparseable or excluded seed, zero budget) are
    /// rejected before any request is sent. After that nothing fails the
    /// crawl: every per-page problem is an error record in `pages`.
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL
    /// * `max_pages` - Page budget; the configured budget when `None`
    pub async fn crawl(
        &self,
        seed: &str,
        max_pages: Option<usize>,
    ) -> Result<CrawlReport, SeoError> {
        let started = Instant::now();
        let started_at = Utc::now();

        let seed_url = parse_seed(seed).map_err(|e| match e {
            UrlError::Parse(_) => SeoError::InvalidSeed {
                url: seed.to_string(),
            },
            other => SeoError::UrlError(other),
        })?;
        let site_domain = seed_url
            .domain()
            .map(str::to_string)
            .ok_or(UrlError::MissingDomain)?;

        let max_pages = max_pages.unwrap_or(self.max_pages);
        if max_pages == 0 {
            return Err(SeoError::InvalidInput(
                "max pages must be at least 1".to_string(),
            ));
        }

        tracing::info!("Starting crawl for domain: {}", site_domain);
        tracing::info!("Normalized base URL: {}", seed_url);

        let mut state = CrawlState::new(max_pages);
        let pages = self.traverse(&seed_url, &site_domain, &mut state).await;

        let total_time = started.elapsed().as_secs_f64();
        tracing::info!(
            "Crawl completed: {} pages, {} excluded URLs in {:.2}s",
            pages.len(),
            state.excluded_count(),
            total_time
        );

        Ok(CrawlReport {
            base_url: seed_url.to_string(),
            page_count: pages.len(),
            pages,
            excluded_count: state.excluded_count(),
            excluded_urls: state.excluded_urls(EXCLUDED_URLS_LIMIT),
            total_time,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Depth-first walk over the internal link graph
    ///
    /// Results are in pre-order: a page comes before everything discovered
    /// through it.
    async fn traverse(
        &self,
        seed: &CanonicalUrl,
        site_domain: &str,
        state: &mut CrawlState,
    ) -> Vec<PageResult> {
        let mut results = Vec::new();
        let mut stack: Vec<String> = vec![seed.to_string()];

        while let Some(candidate) = stack.pop() {
            let url = match state.try_visit(&candidate) {
                VisitDecision::Visit(url) => url,
                decision => {
                    tracing::trace!("{} {}: {:?}", decision.state(), candidate, decision);
                    continue;
                }
            };

            tracing::info!(
                "Crawling: {} [{}/{}]",
                url,
                state.visited_count(),
                state.max_pages()
            );

            match self.fetcher.extract(url.as_url(), site_domain).await {
                Ok(extracted) => {
                    for href in &extracted.excluded_hrefs {
                        state.record_excluded(href);
                    }

                    for link in extracted.internal_links.iter().rev() {
                        if !state.is_visited(link) {
                            stack.push(link.to_string());
                        }
                    }

                    results.push(PageResult::from(extracted.record));
                }
                Err(error) => {
                    tracing::warn!("Error crawling {}: {}", url, error.error);
                    results.push(PageResult::Error(error));
                }
            }

            if !state.has_budget() {
                tracing::debug!("Page budget of {} reached", state.max_pages());
                break;
            }
        }

        results
    }
}
