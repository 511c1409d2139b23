//! SEO scoring engine
//!
//! Scores a page from its basic record and, when available, its performance
//! record. The model lives in a static rule table (`rules`) and is applied by
//! a single interpreter (`engine`).
//!
//! # Categories
//!
//! | Category | Budget |
//! |----------|--------|
//! | structure | 45 |
//! | performance | 35 |
//! | content | 10 |
//! | technical | 10 |
//!
//! The final score is the sum of earned points clamped to `0..=100`. A single
//! category may go negative; only the total is clamped.

mod breakdown;
mod engine;
pub mod rules;

pub use breakdown::{
    Category, CategoryScore, CategoryScores, Factor, FactorStatus, ScoreBreakdown, ScoreResult,
    BASE_SCORE,
};
pub use engine::{evaluate, score};
