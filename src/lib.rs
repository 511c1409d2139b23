//! SEO Crawler: site traversal and per-page SEO scoring
//!
//! This crate walks the internal link graph of a website from a seed URL,
//! extracts structural signals from every page, optionally renders pages in a
//! headless browser to collect performance metrics, scores each page and
//! aggregates site-wide statistics.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod performance;
pub mod scoring;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for SEO Crawler operations
#[derive(Debug, Error)]
pub enum SeoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported seed URL (query string, excluded file type or unparseable): {url}")]
    InvalidSeed { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Browser error for {url}: {message}")]
    Browser { url: String, message: String },

    #[error("Browser navigation timed out after {seconds}s for {url}")]
    BrowserTimeout { url: String, seconds: u64 },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for SEO Crawler operations
pub type Result<T> = std::result::Result<T, SeoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analysis::{analyze_site, Analyzer, AnalyzedPage, SiteAnalysis};
pub use config::Config;
pub use crawler::{crawl_site, Crawler, PageRecord, PageResult};
pub use output::{aggregate, AnalysisReport, CrawlReport, SiteStatistics};
pub use performance::{PerformanceCollector, PerformanceRecord};
pub use scoring::{score, ScoreBreakdown, ScoreResult};
pub use url::{extract_domain, normalize, should_exclude, CanonicalUrl};
