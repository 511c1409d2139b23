//! State module for tracking crawl progress
//!
//! This module provides the state owned by a single traversal run.
//!
//! # Components
//!
//! - `PageState`: Where a candidate URL ended up (pending, skipped, visited)
//! - `CrawlState`: The visited/excluded sets and the page budget of one crawl

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::{CrawlState, VisitDecision};
pub use page_state::PageState;
