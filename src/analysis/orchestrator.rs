//! Batch analysis orchestrator
//!
//! URLs are analyzed in fixed-size batches. All pages of a batch run
//! concurrently and the whole batch is awaited before the next one starts,
//! so at most [`BATCH_SIZE`] fetches or renders are in flight at once.

use crate::analysis::page::AnalyzedPage;
use crate::config::Config;
use crate::crawler::{PageFetcher, PageResult};
use crate::performance::{ChromeRenderer, PageRenderer, PerformanceCollector};
use crate::SeoError;
use futures::future::join_all;
use serde::Serialize;
use std::time::Instant;

/// Pages analyzed concurrently per batch
pub const BATCH_SIZE: usize = 5;

/// Outcome of a batch analysis run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    /// One entry per input URL, in input order
    pub results: Vec<AnalyzedPage>,
    /// Seconds
    pub total_time: f64,
}

/// Progress after a completed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
}

impl BatchProgress {
    /// Completion percentage, capped at 100
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.processed * 100) / self.total).min(100) as u32
    }
}

pub struct Analyzer<R = ChromeRenderer> {
    fetcher: PageFetcher,
    collector: PerformanceCollector<R>,
    max_pages: usize,
}

impl Analyzer<ChromeRenderer> {
    /// Creates an analyzer using headless Chrome for the full pass
    pub fn new(config: &Config) -> Result<Self, SeoError> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            collector: PerformanceCollector::new(config),
            max_pages: config.analysis.max_pages,
        })
    }
}

impl<R: PageRenderer> Analyzer<R> {
    pub fn with_parts(
        fetcher: PageFetcher,
        collector: PerformanceCollector<R>,
        max_pages: usize,
    ) -> Self {
        Self {
            fetcher,
            collector,
            max_pages,
        }
    }

    /// Runs the full pipeline (basic pass, browser pass, scoring) for one URL
    pub async fn analyze_page(&self, url: &str) -> AnalyzedPage {
        self.analyze_one(url, true).await
    }

    /// Analyzes `urls` in batches of [`BATCH_SIZE`]
    ///
    /// # Arguments
    ///
    /// * `urls` - Pages to analyze; at most `analysis.max-pages` are used
    /// * `full` - Also run the browser pass for every page
    ///
    /// # Returns
    ///
    /// * `Ok(SiteAnalysis)` - One result per analyzed URL, failures included
    /// * `Err(SeoError::InvalidInput)` - `urls` is empty
    pub async fn analyze_site(
        &self,
        urls: &[String],
        full: bool,
    ) -> Result<SiteAnalysis, SeoError> {
        self.analyze_site_with_progress(urls, full, |_| {}).await
    }

    /// Like [`Analyzer::analyze_site`], calling `on_batch` after every batch
    pub async fn analyze_site_with_progress<F>(
        &self,
        urls: &[String],
        full: bool,
        mut on_batch: F,
    ) -> Result<SiteAnalysis, SeoError>
    where
        F: FnMut(BatchProgress),
    {
        if urls.is_empty() {
            return Err(SeoError::InvalidInput("No URLs provided".to_string()));
        }

        let urls = if urls.len() > self.max_pages {
            tracing::warn!(
                "{} URLs submitted, analyzing only the first {}",
                urls.len(),
                self.max_pages
            );
            &urls[..self.max_pages]
        } else {
            urls
        };

        let started = Instant::now();
        let total = urls.len();
        let mut results = Vec::with_capacity(total);

        tracing::info!(
            "Starting {} analysis of {} pages",
            if full { "full" } else { "basic" },
            total
        );

        for batch in urls.chunks(BATCH_SIZE) {
            let analyzed = join_all(batch.iter().map(|url| self.analyze_one(url, full))).await;
            results.extend(analyzed);

            let progress = BatchProgress {
                processed: results.len(),
                total,
            };
            tracing::info!(
                "Progress: {}/{} pages analyzed ({}%)",
                progress.processed,
                progress.total,
                progress.percent()
            );
            on_batch(progress);
        }

        let total_time = started.elapsed().as_secs_f64();
        tracing::info!("Analysis completed in {:.2}s", total_time);

        Ok(SiteAnalysis {
            results,
            total_time,
        })
    }

    async fn analyze_one(&self, url: &str, full: bool) -> AnalyzedPage {
        let record = match self.fetcher.extract_basic(url).await {
            PageResult::Page(record) => *record,
            failed => return AnalyzedPage::failed(failed),
        };

        let performance = if full {
            Some(self.collector.extract_performance(url).await)
        } else {
            None
        };

        AnalyzedPage::scored(record, performance)
    }
}
