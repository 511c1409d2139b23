//! Records produced by the browser-rendered pass

use serde::{Deserialize, Serialize};

/// One image found on a rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProbe {
    pub src: String,
    pub has_alt: bool,
    pub alt_text: String,
}

/// Performance and DOM-derived facts of one page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub url: String,

    /// Seconds from navigation start until the network went idle
    pub load_time: f64,

    /// First contentful paint in seconds, if the browser reported one
    pub fcp: Option<f64>,

    /// Serialized DOM size in KB, used as a page weight proxy
    #[serde(rename = "pageSize")]
    pub page_weight_kb: Option<u64>,

    pub total_requests: usize,
    pub failed_requests: usize,

    /// Images inspected, capped at the configured maximum
    pub images_count: usize,
    pub images_without_alt: usize,

    pub has_structured_data: bool,
    pub structured_data_blocks: usize,
    /// JSON-LD blocks that are present but fail to parse
    pub invalid_structured_data_blocks: usize,
}

impl PerformanceRecord {
    /// Fraction of inspected images without an `alt` attribute
    ///
    /// Returns `None` when the page has no images.
    pub fn missing_alt_ratio(&self) -> Option<f64> {
        if self.images_count == 0 {
            return None;
        }
        Some(self.images_without_alt as f64 / self.images_count as f64)
    }
}

/// A page whose browser pass failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceError {
    pub url: String,
    pub error: String,
}
