//! Page records produced by the basic (markup-only) pass

use serde::Serialize;

/// Titles longer than this are flagged as too long
pub const MAX_TITLE_LENGTH: usize = 60;

/// Meta descriptions longer than this are flagged as too long
pub const MAX_DESCRIPTION_LENGTH: usize = 160;

/// Status recorded when a failure carries no HTTP response
pub const GENERIC_FAILURE_STATUS: u16 = 500;

/// One outgoing link of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Canonical form of the link target
    pub url: String,
    /// Trimmed anchor text, falling back to the title attribute
    pub anchor_text: String,
    pub is_internal: bool,
}

/// Raw structural signals read from a parsed document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSignals {
    pub title: String,
    pub meta_description: String,
    pub h1_count: usize,
    pub h1_text: String,
    pub h2_count: usize,
    pub h2_texts: Vec<String>,
    pub canonical_url: Option<String>,
    pub has_hreflang: bool,
    pub internal_links_count: usize,
    pub external_links_count: usize,
    pub links: Vec<LinkRecord>,
}

/// Response facts of the basic fetch
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    pub status: u16,
    pub content_type: Option<String>,
    /// Value of the `x-response-time` header, if the server sent one
    pub response_time: Option<String>,
    /// Seconds spent fetching the document
    pub load_time: f64,
}

/// One page's extracted facts
///
/// The derived flags are computed once in [`PageRecord::new`] from the counts
/// and lengths and are never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub load_time: f64,
    pub response_time: Option<String>,

    pub title: String,
    pub title_length: usize,
    pub meta_description: String,
    pub meta_description_length: usize,
    pub h1_count: usize,
    pub h1_text: String,
    pub h2_count: usize,
    pub h2_texts: Vec<String>,
    pub canonical_url: Option<String>,
    pub has_hreflang: bool,

    pub internal_links_count: usize,
    pub external_links_count: usize,
    pub links: Vec<LinkRecord>,

    pub missing_title: bool,
    pub missing_description: bool,
    pub missing_h1: bool,
    #[serde(rename = "hasMultipleH1")]
    pub has_multiple_h1: bool,
    pub has_too_long_title: bool,
    pub has_too_long_description: bool,
}

impl PageRecord {
    pub fn new(url: impl Into<String>, meta: ResponseMeta, signals: PageSignals) -> Self {
        let title_length = signals.title.chars().count();
        let meta_description_length = signals.meta_description.chars().count();

        Self {
            url: url.into(),
            status: meta.status,
            content_type: meta.content_type,
            load_time: meta.load_time,
            response_time: meta.response_time,
            missing_title: title_length == 0,
            has_too_long_title: title_length > MAX_TITLE_LENGTH,
            missing_description: meta_description_length == 0,
            has_too_long_description: meta_description_length > MAX_DESCRIPTION_LENGTH,
            missing_h1: signals.h1_count == 0,
            has_multiple_h1: signals.h1_count > 1,
            title: signals.title,
            title_length,
            meta_description: signals.meta_description,
            meta_description_length,
            h1_count: signals.h1_count,
            h1_text: signals.h1_text,
            h2_count: signals.h2_count,
            h2_texts: signals.h2_texts,
            canonical_url: signals.canonical_url,
            has_hreflang: signals.has_hreflang,
            internal_links_count: signals.internal_links_count,
            external_links_count: signals.external_links_count,
            links: signals.links,
        }
    }
}

/// A page whose fetch or parse failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageError {
    pub url: String,
    pub status: u16,
    pub error: String,
}

/// Result of extracting one page: either its record or an error record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageResult {
    Page(Box<PageRecord>),
    Error(PageError),
}

impl PageResult {
    pub fn url(&self) -> &str {
        match self {
            Self::Page(page) => &page.url,
            Self::Error(error) => &error.url,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Page(page) => page.status,
            Self::Error(error) => error.status,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn as_page(&self) -> Option<&PageRecord> {
        match self {
            Self::Page(page) => Some(page),
            Self::Error(_) => None,
        }
    }
}

impl From<PageRecord> for PageResult {
    fn from(record: PageRecord) -> Self {
        Self::Page(Box::new(record))
    }
}

impl From<PageError> for PageResult {
    fn from(error: PageError) -> Self {
        Self::Error(error)
    }
}
