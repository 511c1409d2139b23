//! Batch analysis of pages
//!
//! This module combines the basic pass, the optional browser pass and the
//! scoring engine into per-page analysis results.

mod orchestrator;
mod page;

pub use orchestrator::{Analyzer, BatchProgress, SiteAnalysis, BATCH_SIZE};
pub use page::AnalyzedPage;

use crate::config::Config;
use crate::SeoError;

/// Analyzes `urls` with headless Chrome available for the full pass
///
/// # Example
///
/// ```no_run
/// use seo_crawler::config::Config;
/// use seo_crawler::analysis::analyze_site;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let urls = vec!["https://example.com/".to_string()];
/// let analysis = analyze_site(&Config::default(), &urls, false).await?;
/// println!("{} pages in {:.2}s", analysis.results.len(), analysis.total_time);
/// # Ok(())
/// # }
/// ```
pub async fn analyze_site(
    config: &Config,
    urls: &[String],
    full: bool,
) -> Result<SiteAnalysis, SeoError> {
    Analyzer::new(config)?.analyze_site(urls, full).await
}
