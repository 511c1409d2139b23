use serde::Deserialize;

/// Main configuration structure for SEO Crawler
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Traversal and basic fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages visited by one crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Timeout of a single basic fetch (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum redirects followed by a basic fetch
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// Value sent as the Accept-Language header
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

/// Batch analysis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum number of URLs analyzed per request; extra URLs are dropped
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Timeout of a browser navigation (seconds)
    #[serde(rename = "browser-timeout-secs", default = "default_browser_timeout")]
    pub browser_timeout_secs: u64,

    /// Quiet period without network events that counts as network idle (milliseconds)
    #[serde(rename = "network-idle-ms", default = "default_network_idle")]
    pub network_idle_ms: u64,

    /// Maximum number of images inspected by the alt audit
    #[serde(rename = "max-images", default = "default_max_images")]
    pub max_images: usize,
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Path to a Chrome/Chromium executable; auto-detected when absent
    #[serde(default)]
    pub executable: Option<String>,

    /// Launch Chrome with --no-sandbox
    #[serde(rename = "no-sandbox", default = "default_true")]
    pub no_sandbox: bool,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version)`
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{})",
            self.crawler_name, self.crawler_version
        )
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            browser_timeout_secs: default_browser_timeout(),
            network_idle_ms: default_network_idle(),
            max_images: default_max_images(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            no_sandbox: default_true(),
        }
    }
}

fn default_max_pages() -> usize {
    50
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_redirects() -> usize {
    5
}

fn default_crawler_name() -> String {
    "SEOAnalyzerBot".to_string()
}

fn default_crawler_version() -> String {
    "1.0".to_string()
}

fn default_accept_language() -> String {
    "fr,en;q=0.9".to_string()
}

fn default_browser_timeout() -> u64 {
    30
}

fn default_network_idle() -> u64 {
    500
}

fn default_max_images() -> usize {
    20
}

fn default_true() -> bool {
    true
}
