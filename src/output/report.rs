//! Crawl and analysis reports
//!
//! Reports serialize with camelCase field names and can be written as JSON
//! or printed as a human-readable summary.

use crate::analysis::{AnalyzedPage, SiteAnalysis};
use crate::crawler::PageResult;
use crate::output::stats::{aggregate, print_statistics, SiteStatistics};
use crate::SeoError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Result of one traversal run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// Canonical seed URL
    #[serde(rename = "baseURL")]
    pub base_url: String,
    /// Page and error records in depth-first pre-order
    pub pages: Vec<PageResult>,
    pub page_count: usize,
    /// Distinct excluded URLs seen during the run
    pub excluded_count: usize,
    /// First excluded URLs in discovery order, capped at 100
    pub excluded_urls: Vec<String>,
    /// Seconds
    pub total_time: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// URLs of the successfully fetched pages, in crawl order
    pub fn page_urls(&self) -> Vec<String> {
        self.pages
            .iter()
            .filter(|page| !page.is_error())
            .map(|page| page.url().to_string())
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.pages.iter().filter(|page| page.is_error()).count()
    }
}

/// Result of a batch analysis with its statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub results: Vec<AnalyzedPage>,
    pub stats: SiteStatistics,
    pub total_pages: usize,
    /// Seconds
    pub total_time: f64,
}

impl From<SiteAnalysis> for AnalysisReport {
    fn from(analysis: SiteAnalysis) -> Self {
        Self {
            stats: aggregate(&analysis.results),
            total_pages: analysis.results.len(),
            results: analysis.results,
            total_time: analysis.total_time,
        }
    }
}

/// Writes any report as pretty-printed JSON
///
/// # Arguments
///
/// * `report` - The report to serialize
/// * `output_path` - Path of the file to create or truncate
pub fn write_json_report<T: Serialize>(report: &T, output_path: &Path) -> Result<(), SeoError> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Prints a crawl report in a human-readable format
pub fn print_crawl_report(report: &CrawlReport) {
    println!("\n=== Crawl Report ===\n");
    println!("Base URL: {}", report.base_url);
    println!(
        "Pages: {} ({} errors) in {:.2}s",
        report.page_count,
        report.error_count(),
        report.total_time
    );
    println!();

    for page in &report.pages {
        match page {
            PageResult::Page(record) => println!(
                "  [{}] {} ({} internal, {} external links)",
                record.status, record.url, record.internal_links_count, record.external_links_count
            ),
            PageResult::Error(error) => {
                println!("  [{}] {} - {}", error.status, error.url, error.error)
            }
        }
    }
    println!();

    if !report.excluded_urls.is_empty() {
        println!("Excluded URLs ({}):", report.excluded_count);
        for url in &report.excluded_urls {
            println!("  - {}", url);
        }
        if report.excluded_count > report.excluded_urls.len() {
            println!(
                "  ... and {} more",
                report.excluded_count - report.excluded_urls.len()
            );
        }
        println!();
    }
}

/// Prints a batch analysis report in a human-readable format
pub fn print_analysis_report(report: &AnalysisReport) {
    println!("\n=== Analysis Report ===\n");
    println!(
        "Analyzed {} pages in {:.2}s",
        report.total_pages, report.total_time
    );
    println!();

    for result in &report.results {
        match (&result.page, result.seo_score) {
            (PageResult::Error(error), _) => {
                println!("  ERROR {} [{}]: {}", error.url, error.status, error.error)
            }
            (PageResult::Page(record), Some(score)) => {
                println!("  {:>3}/100 {}", score, record.url);
                for penalty in result.penalties() {
                    println!("          {} ({} pts)", penalty.name, penalty.points);
                }
                if let Some(error) = &result.performance_error {
                    println!("          performance pass failed: {}", error);
                }
            }
            (PageResult::Page(record), None) => println!("    -/100 {}", record.url),
        }
    }

    print_statistics(&report.stats);
}
