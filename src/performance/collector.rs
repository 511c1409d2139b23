//! Performance metrics collection on top of a page renderer

use crate::config::Config;
use crate::performance::browser::ChromeRenderer;
use crate::performance::record::{ImageProbe, PerformanceError, PerformanceRecord};
use crate::SeoError;
use async_trait::async_trait;
use std::time::Duration;

/// Raw output of rendering one page in a browser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedPage {
    /// Time from navigation start until the network went idle
    pub load_time: Duration,

    /// `first-contentful-paint` start time in milliseconds
    pub first_contentful_paint_ms: Option<f64>,

    /// Length of the serialized DOM in bytes
    pub dom_size: usize,

    /// All images of the document, in document order
    pub images: Vec<ImageProbe>,

    /// Text of every `script[type="application/ld+json"]` block
    pub json_ld_blocks: Vec<String>,

    pub total_requests: usize,
    pub failed_requests: usize,
}

/// Renders a page in a browser and reports what it observed
///
/// Implementations own their browser session for the duration of one call
/// and must release it before returning, on success and on failure.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<RenderedPage, SeoError>;
}

/// Turns rendered pages into performance records
pub struct PerformanceCollector<R = ChromeRenderer> {
    renderer: R,
    max_images: usize,
}

impl PerformanceCollector<ChromeRenderer> {
    /// Creates a collector backed by headless Chrome
    pub fn new(config: &Config) -> Self {
        Self {
            renderer: ChromeRenderer::new(config),
            max_images: config.analysis.max_images,
        }
    }
}

impl<R: PageRenderer> PerformanceCollector<R> {
    pub fn with_renderer(renderer: R, max_images: usize) -> Self {
        Self {
            renderer,
            max_images,
        }
    }

    /// Renders `url` and derives its performance record
    ///
    /// Any renderer failure, including a navigation timeout, becomes a
    /// `PerformanceError` for that URL.
    pub async fn extract_performance(
        &self,
        url: &str,
    ) -> Result<PerformanceRecord, PerformanceError> {
        match self.renderer.render(url).await {
            Ok(rendered) => Ok(summarize(url, rendered, self.max_images)),
            Err(e) => {
                tracing::warn!("Performance pass failed for {}: {}", url, e);
                Err(PerformanceError {
                    url: url.to_string(),
                    error: e.to_string(),
                })
            }
        }
    }
}

fn summarize(url: &str, rendered: RenderedPage, max_images: usize) -> PerformanceRecord {
    let images: Vec<&ImageProbe> = rendered.images.iter().take(max_images).collect();
    let images_without_alt = images.iter().filter(|image| !image.has_alt).count();

    let structured_data_blocks = rendered.json_ld_blocks.len();
    let invalid_structured_data_blocks = rendered
        .json_ld_blocks
        .iter()
        .filter(|block| serde_json::from_str::<serde_json::Value>(block).is_err())
        .count();

    PerformanceRecord {
        url: url.to_string(),
        load_time: rendered.load_time.as_secs_f64(),
        fcp: rendered.first_contentful_paint_ms.map(|ms| ms / 1000.0),
        page_weight_kb: page_weight_kb(rendered.dom_size),
        total_requests: rendered.total_requests,
        failed_requests: rendered.failed_requests,
        images_count: images.len(),
        images_without_alt,
        has_structured_data: structured_data_blocks > 0,
        structured_data_blocks,
        invalid_structured_data_blocks,
    }
}

/// Bytes to whole KB; an empty DOM means nothing was measured
fn page_weight_kb(dom_size: usize) -> Option<u64> {
    if dom_size == 0 {
        return None;
    }
    Some((dom_size as f64 / 1024.0).round() as u64)
}
