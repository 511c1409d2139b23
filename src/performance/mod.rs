//! Browser-rendered performance pass
//!
//! This module handles the slow pass of an analysis, including:
//! - Rendering a page in headless Chrome behind the `PageRenderer` trait
//! - Counting requests and failed requests during navigation
//! - Paint timing, page weight, image alt audit and structured data detection

mod browser;
mod collector;
mod record;

pub use browser::ChromeRenderer;
pub use collector::{PageRenderer, PerformanceCollector, RenderedPage};
pub use record::{ImageProbe, PerformanceError, PerformanceRecord};
