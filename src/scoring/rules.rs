//! Declarative scoring rules
//!
//! Every check the scoring engine performs is a row in [`RULES`]. A rule names
//! its category, the largest penalty it can apply and how its condition is
//! read from the page and performance records. The engine interprets the
//! table; nothing here runs on its own.

use crate::crawler::PageRecord;
use crate::performance::PerformanceRecord;
use crate::scoring::breakdown::Category;

/// Details text of a factor whose condition is not met
pub const OK_DETAILS: &str = "No issue detected";

/// Details text of a factor whose measurement is missing
pub const UNAVAILABLE_DETAILS: &str = "Measurement unavailable";

pub const UNAVAILABLE_RECOMMENDATION: &str = "Run a full analysis to evaluate this factor";

/// One severity band of a graded metric
#[derive(Debug)]
pub struct Band {
    /// The band applies when the metric is strictly above this value
    pub above: f64,
    /// Penalty magnitude
    pub points: i32,
    pub label: &'static str,
    pub recommendation: &'static str,
}

/// How a rule reads its condition
pub enum Check {
    /// Fixed penalty when a page predicate holds
    Page {
        applies: fn(&PageRecord) -> bool,
        details: fn(&PageRecord) -> String,
        recommendation: &'static str,
    },

    /// Fixed penalty when a performance predicate holds
    Performance {
        applies: fn(&PerformanceRecord) -> bool,
        details: fn(&PerformanceRecord) -> String,
        recommendation: &'static str,
    },

    /// Graded penalty from the first band the metric exceeds
    ///
    /// Bands are ordered from most to least severe. A missing metric makes the
    /// rule unavailable.
    Banded {
        metric: fn(&PerformanceRecord) -> Option<f64>,
        quantity: &'static str,
        format: fn(f64) -> String,
        bands: &'static [Band],
    },

    /// Penalty proportional to the share of failing items
    ///
    /// Above `full_above` the full weight applies; below it the penalty is the
    /// share of the weight rounded up.
    Ratio {
        counts: fn(&PerformanceRecord) -> (usize, usize),
        full_above: f64,
        details: fn(usize, usize) -> String,
        ok_details: fn(usize) -> String,
        full_recommendation: &'static str,
        partial_recommendation: &'static str,
    },
}

impl Check {
    pub fn needs_performance(&self) -> bool {
        !matches!(self, Self::Page { .. })
    }
}

pub struct Rule {
    pub category: Category,
    pub name: &'static str,
    /// Largest penalty magnitude, also charged when the rule is unavailable
    pub weight: i32,
    pub check: Check,
}

/// Replaces every rule of a category when the performance pass did not run
pub struct CategoryFallback {
    pub category: Category,
    pub name: &'static str,
    pub details: &'static str,
    pub recommendation: &'static str,
}

pub static CATEGORY_FALLBACKS: &[CategoryFallback] = &[CategoryFallback {
    category: Category::Performance,
    name: "Performance",
    details: "Performance metrics unavailable",
    recommendation: "Use the full analysis to evaluate performance",
}];

static LOAD_TIME_BANDS: &[Band] = &[
    Band {
        above: 5.0,
        points: 18,
        label: "very slow",
        recommendation: "Optimize images and minimize render-blocking resources",
    },
    Band {
        above: 3.0,
        points: 12,
        label: "slow",
        recommendation: "Improve speed by enabling caching and compression",
    },
];

static FCP_BANDS: &[Band] = &[
    Band {
        above: 3.0,
        points: 12,
        label: "very slow",
        recommendation: "Reduce the delay before the first content is displayed",
    },
    Band {
        above: 1.8,
        points: 6,
        label: "slow",
        recommendation: "Improve FCP by optimizing critical CSS",
    },
];

static PAGE_WEIGHT_BANDS: &[Band] = &[
    Band {
        above: 3000.0,
        points: 5,
        label: "very heavy",
        recommendation: "Reduce page weight by optimizing images and code",
    },
    Band {
        above: 1500.0,
        points: 3,
        label: "heavy",
        recommendation: "Optimize resources to reduce the total weight",
    },
];

fn seconds(value: f64) -> String {
    format!("{:.2}s", value)
}

fn kilobytes(value: f64) -> String {
    format!("{} KB", value)
}

/// The scoring model, in evaluation order
pub static RULES: &[Rule] = &[
    // Structure (45)
    Rule {
        category: Category::Structure,
        name: "Meta title",
        weight: 18,
        check: Check::Page {
            applies: |page| page.missing_title,
            details: |_| "The meta title is missing".to_string(),
            recommendation: "Add a descriptive meta title including the main keyword",
        },
    },
    Rule {
        category: Category::Structure,
        name: "Meta title length",
        weight: 6,
        check: Check::Page {
            applies: |page| !page.missing_title && page.has_too_long_title,
            details: |page| {
                format!("The meta title is too long ({} characters)", page.title_length)
            },
            recommendation: "Shorten the title to under 60 characters",
        },
    },
    Rule {
        category: Category::Structure,
        name: "Meta description",
        weight: 12,
        check: Check::Page {
            applies: |page| page.missing_description,
            details: |_| "The meta description is missing".to_string(),
            recommendation: "Add an engaging meta description with a call to action",
        },
    },
    Rule {
        category: Category::Structure,
        name: "Meta description length",
        weight: 6,
        check: Check::Page {
            applies: |page| !page.missing_description && page.has_too_long_description,
            details: |page| {
                format!(
                    "The meta description is too long ({} characters)",
                    page.meta_description_length
                )
            },
            recommendation: "Keep the description to 160 characters at most",
        },
    },
    Rule {
        category: Category::Structure,
        name: "H1 tag",
        weight: 12,
        check: Check::Page {
            applies: |page| page.missing_h1,
            details: |_| "The H1 tag is missing".to_string(),
            recommendation: "Add an H1 tag describing the main content of the page",
        },
    },
    Rule {
        category: Category::Structure,
        name: "H1 uniqueness",
        weight: 6,
        check: Check::Page {
            applies: |page| !page.missing_h1 && page.has_multiple_h1,
            details: |page| format!("{} H1 tags found", page.h1_count),
            recommendation: "Keep a single H1 tag per page",
        },
    },
    Rule {
        category: Category::Structure,
        name: "H2 tags",
        weight: 7,
        check: Check::Page {
            applies: |page| page.h2_count == 0,
            details: |_| "No H2 tag is present".to_string(),
            recommendation: "Use H2 tags to split the content into sections",
        },
    },
    // Performance (35)
    Rule {
        category: Category::Performance,
        name: "Load time",
        weight: 18,
        check: Check::Banded {
            metric: |perf| Some(perf.load_time),
            quantity: "Load time",
            format: seconds,
            bands: LOAD_TIME_BANDS,
        },
    },
    Rule {
        category: Category::Performance,
        name: "First Contentful Paint (FCP)",
        weight: 12,
        check: Check::Banded {
            metric: |perf| perf.fcp,
            quantity: "FCP",
            format: seconds,
            bands: FCP_BANDS,
        },
    },
    Rule {
        category: Category::Performance,
        name: "Page weight",
        weight: 5,
        check: Check::Banded {
            metric: |perf| perf.page_weight_kb.map(|kb| kb as f64),
            quantity: "Page weight",
            format: kilobytes,
            bands: PAGE_WEIGHT_BANDS,
        },
    },
    // Content (10)
    Rule {
        category: Category::Content,
        name: "Image alt attributes",
        weight: 10,
        check: Check::Ratio {
            counts: |perf| (perf.images_without_alt, perf.images_count),
            full_above: 0.5,
            details: |missing, total| format!("{}/{} images without alt attribute", missing, total),
            ok_details: |total| {
                if total == 0 {
                    "No image found on the page".to_string()
                } else {
                    format!("All images ({}) have alt attributes", total)
                }
            },
            full_recommendation: "Add descriptive alt attributes to all images",
            partial_recommendation: "Fill in the missing alt attributes",
        },
    },
    // Technical (10)
    Rule {
        category: Category::Technical,
        name: "Canonical URL",
        weight: 5,
        check: Check::Page {
            applies: |page| page.canonical_url.is_none(),
            details: |_| "Canonical URL is missing".to_string(),
            recommendation: "Add a canonical tag to avoid duplicate content issues",
        },
    },
    Rule {
        category: Category::Technical,
        name: "Structured data",
        weight: 5,
        check: Check::Performance {
            applies: |perf| !perf.has_structured_data,
            details: |_| "No structured data found".to_string(),
            recommendation: "Add schema.org structured data to improve SERP visibility",
        },
    },
];
