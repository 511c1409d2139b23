//! Output module for crawl and analysis results
//!
//! This module handles:
//! - Crawl and analysis report types
//! - Site-wide statistics over analyzed pages
//! - JSON export and human-readable summaries

mod report;
pub mod stats;

pub use report::{
    print_analysis_report, print_crawl_report, write_json_report, AnalysisReport, CrawlReport,
};
pub use stats::{
    aggregate, print_statistics, CategoryAverage, CategoryAverages, CommonIssue, SiteStatistics,
    SiteSummary,
};
