//! Site-wide statistics over analyzed pages
//!
//! This module reduces a set of per-page analysis results into averages,
//! percentages, per-category score averages and the most common issues.

use crate::analysis::AnalyzedPage;
use crate::crawler::PageRecord;
use crate::scoring::Category;
use serde::Serialize;
use std::collections::HashMap;

/// Number of entries in `commonIssues`
pub const COMMON_ISSUES_LIMIT: usize = 5;

/// Pages loading slower than this many seconds have a performance issue
pub const SLOW_PAGE_SECONDS: f64 = 3.0;

/// Statistics for a result set
///
/// When no page was analyzed successfully there is nothing to average and
/// only an error message is reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SiteStatistics {
    Computed(Box<SiteSummary>),
    Empty { error: String },
}

impl SiteStatistics {
    pub fn summary(&self) -> Option<&SiteSummary> {
        match self {
            Self::Computed(summary) => Some(summary),
            Self::Empty { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    /// Seconds
    pub average_load_time: f64,
    /// Seconds; `None` when no page has a paint measurement
    #[serde(rename = "averageFCP")]
    pub average_fcp: Option<f64>,
    pub average_title_length: f64,
    pub average_description_length: f64,
    /// KB; `None` when no page has a weight measurement
    pub average_page_size: Option<f64>,
    #[serde(rename = "averageSEOScore")]
    pub average_seo_score: f64,

    // Percentages of successfully analyzed pages
    pub pages_with_title: f64,
    pub pages_with_description: f64,
    pub pages_with_h1: f64,
    pub pages_with_multiple_h1: f64,
    pub pages_with_h2: f64,

    pub pages_with_errors: usize,
    pub pages_with_performance_issues: usize,
    pub total_pages: usize,
    pub successfully_analyzed: usize,

    pub score_details_by_category: CategoryAverages,
    pub common_issues: Vec<CommonIssue>,
}

/// Average category score as a percentage of the category budget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverage {
    pub average: f64,
    pub max_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAverages {
    pub structure: CategoryAverage,
    pub performance: CategoryAverage,
    pub content: CategoryAverage,
    pub technical: CategoryAverage,
}

/// A penalty grouped across pages by category and name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonIssue {
    pub category: Category,
    pub name: String,
    pub count: usize,
    /// Sum of absolute penalty points
    pub total_points: u32,
}

/// Aggregates analysis results into site statistics
///
/// # Arguments
///
/// * `results` - Analyzed pages, error pages included
///
/// # Example
///
/// ```
/// use seo_crawler::output::{aggregate, SiteStatistics};
///
/// let stats = aggregate(&[]);
/// assert!(matches!(stats, SiteStatistics::Empty { .. }));
/// ```
pub fn aggregate(results: &[AnalyzedPage]) -> SiteStatistics {
    let valid: Vec<(&AnalyzedPage, &PageRecord)> = results
        .iter()
        .filter_map(|result| result.record().map(|record| (result, record)))
        .collect();

    if valid.is_empty() {
        return SiteStatistics::Empty {
            error: "No pages analyzed successfully".to_string(),
        };
    }

    let percentage = |predicate: fn(&PageRecord) -> bool| {
        let count = valid.iter().filter(|(_, record)| predicate(record)).count();
        count as f64 / valid.len() as f64 * 100.0
    };

    let summary = SiteSummary {
        average_load_time: mean(valid.iter().filter_map(|(page, _)| page.load_time()))
            .unwrap_or(0.0),
        average_fcp: mean(
            valid
                .iter()
                .filter_map(|(page, _)| page.performance.as_ref().and_then(|perf| perf.fcp)),
        ),
        average_title_length: mean(valid.iter().map(|(_, record)| record.title_length as f64))
            .unwrap_or(0.0),
        average_description_length: mean(
            valid
                .iter()
                .map(|(_, record)| record.meta_description_length as f64),
        )
        .unwrap_or(0.0),
        average_page_size: mean(valid.iter().filter_map(|(page, _)| {
            page.performance
                .as_ref()
                .and_then(|perf| perf.page_weight_kb)
                .map(|kb| kb as f64)
        })),
        average_seo_score: mean(
            valid
                .iter()
                .filter_map(|(page, _)| page.seo_score.map(f64::from)),
        )
        .unwrap_or(0.0),
        pages_with_title: percentage(|record| !record.missing_title),
        pages_with_description: percentage(|record| !record.missing_description),
        pages_with_h1: percentage(|record| !record.missing_h1),
        pages_with_multiple_h1: percentage(|record| record.has_multiple_h1),
        pages_with_h2: percentage(|record| record.h2_count > 0),
        pages_with_errors: results.len() - valid.len(),
        pages_with_performance_issues: valid
            .iter()
            .filter(|(page, _)| page.load_time().is_some_and(|t| t > SLOW_PAGE_SECONDS))
            .count(),
        total_pages: results.len(),
        successfully_analyzed: valid.len(),
        score_details_by_category: CategoryAverages {
            structure: category_average(&valid, Category::Structure),
            performance: category_average(&valid, Category::Performance),
            content: category_average(&valid, Category::Content),
            technical: category_average(&valid, Category::Technical),
        },
        common_issues: common_issues(valid.iter().map(|(page, _)| *page)),
    };

    SiteStatistics::Computed(Box::new(summary))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

fn category_average(valid: &[(&AnalyzedPage, &PageRecord)], category: Category) -> CategoryAverage {
    let average = mean(valid.iter().filter_map(|(page, _)| {
        page.score_details
            .as_ref()
            .map(|details| details.categories.get(category).percentage())
    }))
    .unwrap_or(0.0);

    CategoryAverage {
        average,
        max_score: category.max_points(),
    }
}

/// Groups penalties by `(category, name)` and ranks them
///
/// Ordered by occurrence count, then total point impact. Remaining ties keep
/// first-seen order.
fn common_issues<'a>(pages: impl Iterator<Item = &'a AnalyzedPage>) -> Vec<CommonIssue> {
    let mut issues: Vec<CommonIssue> = Vec::new();
    let mut index: HashMap<(Category, String), usize> = HashMap::new();

    for penalty in pages.flat_map(|page| page.penalties()) {
        let key = (penalty.category, penalty.name.clone());
        let position = *index.entry(key).or_insert_with(|| {
            issues.push(CommonIssue {
                category: penalty.category,
                name: penalty.name.clone(),
                count: 0,
                total_points: 0,
            });
            issues.len() - 1
        });

        let issue = &mut issues[position];
        issue.count += 1;
        issue.total_points += penalty.points.unsigned_abs();
    }

    issues.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.total_points.cmp(&a.total_points))
    });
    issues.truncate(COMMON_ISSUES_LIMIT);
    issues
}

/// Prints site statistics in a human-readable format
///
/// # Arguments
///
/// * `stats` - The statistics to print
pub fn print_statistics(stats: &SiteStatistics) {
    let summary = match stats {
        SiteStatistics::Computed(summary) => summary,
        SiteStatistics::Empty { error } => {
            println!("Site Statistics: {}", error);
            return;
        }
    };

    println!("\n=== Site Statistics ===\n");
    println!(
        "Pages: {} analyzed, {} errors, {} total",
        summary.successfully_analyzed, summary.pages_with_errors, summary.total_pages
    );
    println!("Average SEO Score: {:.1}/100", summary.average_seo_score);
    println!("Average Load Time: {:.2}s", summary.average_load_time);
    if let Some(fcp) = summary.average_fcp {
        println!("Average FCP: {:.2}s", fcp);
    }
    if let Some(size) = summary.average_page_size {
        println!("Average Page Size: {:.0} KB", size);
    }
    println!(
        "Slow Pages (>{}s): {}",
        SLOW_PAGE_SECONDS, summary.pages_with_performance_issues
    );
    println!();

    println!("Coverage:");
    println!("  Title:          {:.1}%", summary.pages_with_title);
    println!("  Description:    {:.1}%", summary.pages_with_description);
    println!("  H1:             {:.1}%", summary.pages_with_h1);
    println!("  Multiple H1:    {:.1}%", summary.pages_with_multiple_h1);
    println!("  H2:             {:.1}%", summary.pages_with_h2);
    println!(
        "  Avg title / description length: {:.0} / {:.0} chars",
        summary.average_title_length, summary.average_description_length
    );
    println!();

    let categories = &summary.score_details_by_category;
    println!("Category Scores:");
    for (name, category) in [
        ("structure", &categories.structure),
        ("performance", &categories.performance),
        ("content", &categories.content),
        ("technical", &categories.technical),
    ] {
        println!(
            "  {:<12} {:>5.1}% (max {} pts)",
            name, category.average, category.max_score
        );
    }
    println!();

    if !summary.common_issues.is_empty() {
        println!("Common Issues:");
        for issue in &summary.common_issues {
            println!(
                "  [{}] {}: {} pages, {} pts",
                issue.category, issue.name, issue.count, issue.total_points
            );
        }
        println!();
    }
}
