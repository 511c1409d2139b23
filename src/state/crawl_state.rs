//! Visited/excluded bookkeeping for a single traversal run

use crate::state::PageState;
use crate::url::{canonicalize, CanonicalUrl};
use std::collections::HashSet;

/// Outcome of offering a candidate URL to the crawl state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitDecision {
    /// The URL was marked visited and should be fetched now
    Visit(CanonicalUrl),

    /// The URL failed canonicalization or is excluded
    Excluded,

    /// The canonical URL was visited earlier in this run
    AlreadyVisited,

    /// The page budget is used up
    BudgetExhausted,
}

impl VisitDecision {
    /// The page state this decision moves a pending candidate to
    pub fn state(&self) -> PageState {
        match self {
            Self::Visit(_) => PageState::Visited,
            _ => PageState::Skipped,
        }
    }
}

/// State owned exclusively by one traversal run
///
/// `visited` only ever grows and never exceeds `max_pages`. `excluded` keeps the
/// original strings that were rejected, in first-seen order.
#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<CanonicalUrl>,
    excluded: Vec<String>,
    excluded_seen: HashSet<String>,
    max_pages: usize,
}

impl CrawlState {
    pub fn new(max_pages: usize) -> Self {
        Self {
            visited: HashSet::new(),
            excluded: Vec::new(),
            excluded_seen: HashSet::new(),
            max_pages,
        }
    }

    /// Canonicalizes `raw` and marks it visited if it may be fetched
    ///
    /// # Decision Order
    ///
    /// 1. Canonicalization fails or excludes the URL → record `raw` as excluded
    /// 2. Budget exhausted or already visited → skip
    /// 3. Otherwise → mark visited
    pub fn try_visit(&mut self, raw: &str) -> VisitDecision {
        let Some(canonical) = canonicalize(raw) else {
            self.record_excluded(raw);
            return VisitDecision::Excluded;
        };

        if self.visited.len() >= self.max_pages {
            return VisitDecision::BudgetExhausted;
        }

        if !self.visited.insert(canonical.clone()) {
            return VisitDecision::AlreadyVisited;
        }

        VisitDecision::Visit(canonical)
    }

    /// Records an original URL string as excluded
    ///
    /// Empty strings are ignored; duplicates are kept once.
    pub fn record_excluded(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        if self.excluded_seen.insert(raw.to_string()) {
            self.excluded.push(raw.to_string());
        }
    }

    pub fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    /// Returns true while more pages may be visited
    pub fn has_budget(&self) -> bool {
        self.visited.len() < self.max_pages
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// The first `limit` excluded URLs in discovery order
    pub fn excluded_urls(&self, limit: usize) -> Vec<String> {
        self.excluded.iter().take(limit).cloned().collect()
    }
}
