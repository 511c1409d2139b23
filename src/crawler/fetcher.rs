//! HTTP fetcher implementation
//!
//! This module handles the basic (markup-only) pass, including:
//! - Building HTTP clients with the configured user agent and limits
//! - GET requests with a fixed timeout and bounded redirects
//! - Error classification into error page records
//! - Turning a fetched document into a `PageRecord`

use crate::config::Config;
use crate::crawler::parser::parse_html;
use crate::crawler::record::{
    PageError, PageRecord, PageResult, ResponseMeta, GENERIC_FAILURE_STATUS,
};
use crate::url::{host_of, CanonicalUrl};
use crate::SeoError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::{Duration, Instant};
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: Option<String>,
        /// x-response-time header value
        response_time: Option<String>,
        /// Page body content
        body: String,
        /// Time from sending the request to reading the whole body
        elapsed: Duration,
    },

    /// The server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, too many redirects, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Converts a failed fetch into an error page record
    ///
    /// Returns `None` for successful fetches.
    pub fn to_page_error(&self, url: &str) -> Option<PageError> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(PageError {
                url: url.to_string(),
                status: *status_code,
                error: format!("Request failed with status code {}", status_code),
            }),
            Self::NetworkError { error } => Some(PageError {
                url: url.to_string(),
                status: GENERIC_FAILURE_STATUS,
                error: error.clone(),
            }),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(SeoError)` - Invalid header value or client build failure
///
/// # Example
///
/// ```no_run
/// use seo_crawler::config::Config;
/// use seo_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, SeoError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.user_agent.accept_language).map_err(|e| {
            SeoError::InvalidInput(format!("Invalid accept-language header: {}", e))
        })?,
    );

    let client = Client::builder()
        .user_agent(config.user_agent.header_value())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .redirect(Policy::limited(config.crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | Success |
/// | Non-2xx status | HttpError |
/// | Timeout | NetworkError |
/// | Connection refused | NetworkError |
/// | Redirect chain over the limit | NetworkError |
///
/// There is no retry: a single failed fetch is final for that URL.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let started = Instant::now();

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = header_string(response.headers(), CONTENT_TYPE.as_str());
    let response_time = header_string(response.headers(), "x-response-time");

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            response_time,
            body,
            elapsed: started.elapsed(),
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };

    FetchResult::NetworkError { error }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// A page fetched and parsed by the basic pass
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub record: PageRecord,

    /// Internal link targets to consider for traversal, in discovery order
    pub internal_links: Vec<CanonicalUrl>,

    /// Original hrefs on this page that were excluded
    pub excluded_hrefs: Vec<String>,
}

/// Fetch & Extract: retrieves one page and derives its structural facts
///
/// Has no side effect beyond the network call.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Result<Self, SeoError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and classifies its links against `site_domain`
    ///
    /// The record keeps the requested URL; relative links resolve against the
    /// URL the document was finally served from.
    pub async fn extract(
        &self,
        url: &Url,
        site_domain: &str,
    ) -> Result<ExtractedPage, PageError> {
        let (final_url, status_code, content_type, response_time, body, elapsed) =
            match fetch_url(&self.client, url.as_str()).await {
                FetchResult::Success {
                    final_url,
                    status_code,
                    content_type,
                    response_time,
                    body,
                    elapsed,
                } => (final_url, status_code, content_type, response_time, body, elapsed),
                failed => {
                    return Err(failed
                        .to_page_error(url.as_str())
                        .unwrap_or_else(|| generic_error(url.as_str())))
                }
            };

        let document_url = match Url::parse(&final_url) {
            Ok(served) if served != *url => {
                tracing::debug!("Redirected: {} -> {}", url, served);
                served
            }
            _ => url.clone(),
        };

        let parsed = parse_html(&body, &document_url, site_domain);
        let meta = ResponseMeta {
            status: status_code,
            content_type,
            response_time,
            load_time: elapsed.as_secs_f64(),
        };

        Ok(ExtractedPage {
            record: PageRecord::new(url.as_str(), meta, parsed.signals),
            internal_links: parsed.internal_links,
            excluded_hrefs: parsed.excluded_hrefs,
        })
    }

    /// Basic pass for a standalone URL
    ///
    /// Links are classified against the page's own hostname. Any failure,
    /// including an unparseable URL, becomes an error record.
    pub async fn extract_basic(&self, url: &str) -> PageResult {
        let parsed = match Url::parse(url.trim()) {
            Ok(parsed) => parsed,
            Err(e) => {
                return PageResult::Error(PageError {
                    url: url.to_string(),
                    status: GENERIC_FAILURE_STATUS,
                    error: format!("Invalid URL: {}", e),
                })
            }
        };

        let Some(domain) = host_of(&parsed) else {
            return PageResult::Error(PageError {
                url: url.to_string(),
                status: GENERIC_FAILURE_STATUS,
                error: "Invalid URL: missing host".to_string(),
            });
        };

        match self.extract(&parsed, &domain).await {
            Ok(extracted) => PageResult::from(extracted.record),
            Err(error) => {
                tracing::warn!("Basic extraction failed for {}: {}", url, error.error);
                PageResult::Error(error)
            }
        }
    }
}

fn generic_error(url: &str) -> PageError {
    PageError {
        url: url.to_string(),
        status: GENERIC_FAILURE_STATUS,
        error: "Request failed".to_string(),
    }
}
