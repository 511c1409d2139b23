//! Interpreter for the scoring rule table

use crate::crawler::PageRecord;
use crate::performance::PerformanceRecord;
use crate::scoring::breakdown::{Factor, FactorStatus, ScoreBreakdown, ScoreResult};
use crate::scoring::rules::{
    CategoryFallback, Check, Rule, CATEGORY_FALLBACKS, OK_DETAILS, RULES, UNAVAILABLE_DETAILS,
    UNAVAILABLE_RECOMMENDATION,
};

/// What a single rule concluded
enum Outcome {
    Ok(String),
    Issue {
        points: i32,
        details: String,
        recommendation: &'static str,
    },
    Unavailable,
}

/// Scores one page with the built-in rule table
///
/// `perf` is `None` when only the basic pass ran (or the browser pass
/// failed); rules that need it then record unavailable factors.
///
/// # Example
///
/// ```no_run
/// use seo_crawler::scoring::score;
/// # fn example(page: &seo_crawler::PageRecord) {
/// let result = score(page, None);
/// assert!(result.score <= 100);
/// # }
/// ```
pub fn score(page: &PageRecord, perf: Option<&PerformanceRecord>) -> ScoreResult {
    evaluate(RULES, CATEGORY_FALLBACKS, page, perf)
}

/// Scores one page against an arbitrary rule table
pub fn evaluate(
    rules: &[Rule],
    fallbacks: &[CategoryFallback],
    page: &PageRecord,
    perf: Option<&PerformanceRecord>,
) -> ScoreResult {
    let mut breakdown = ScoreBreakdown::default();

    if perf.is_none() {
        for fallback in fallbacks {
            let category = breakdown.categories.get_mut(fallback.category);
            let points = -category.max_points;
            category.earned += points;
            category.factors.push(Factor {
                category: fallback.category,
                name: fallback.name.to_string(),
                points,
                status: FactorStatus::Unavailable,
                details: fallback.details.to_string(),
                recommendation: Some(fallback.recommendation.to_string()),
            });
        }
    }

    for rule in rules {
        if perf.is_none()
            && rule.check.needs_performance()
            && fallbacks.iter().any(|f| f.category == rule.category)
        {
            continue;
        }

        let factor = match check(rule, page, perf) {
            Outcome::Ok(details) => Factor {
                category: rule.category,
                name: rule.name.to_string(),
                points: 0,
                status: FactorStatus::Ok,
                details,
                recommendation: None,
            },
            Outcome::Issue {
                points,
                details,
                recommendation,
            } => Factor {
                category: rule.category,
                name: rule.name.to_string(),
                points: -points,
                status: FactorStatus::Issue,
                details,
                recommendation: Some(recommendation.to_string()),
            },
            Outcome::Unavailable => Factor {
                category: rule.category,
                name: rule.name.to_string(),
                points: -rule.weight,
                status: FactorStatus::Unavailable,
                details: UNAVAILABLE_DETAILS.to_string(),
                recommendation: Some(UNAVAILABLE_RECOMMENDATION.to_string()),
            },
        };

        let category = breakdown.categories.get_mut(rule.category);
        category.earned += factor.points;
        category.factors.push(factor.clone());

        if factor.status != FactorStatus::Unavailable {
            breakdown.all_factors.push(factor);
        }
    }

    let penalties = breakdown
        .all_factors
        .iter()
        .filter(|factor| factor.is_penalty())
        .cloned()
        .collect();

    ScoreResult {
        score: breakdown.total(),
        breakdown,
        penalties,
    }
}

fn check(rule: &Rule, page: &PageRecord, perf: Option<&PerformanceRecord>) -> Outcome {
    match &rule.check {
        Check::Page {
            applies,
            details,
            recommendation,
        } => {
            if applies(page) {
                Outcome::Issue {
                    points: rule.weight,
                    details: details(page),
                    recommendation: *recommendation,
                }
            } else {
                Outcome::Ok(OK_DETAILS.to_string())
            }
        }

        Check::Performance {
            applies,
            details,
            recommendation,
        } => match perf {
            None => Outcome::Unavailable,
            Some(perf) if applies(perf) => Outcome::Issue {
                points: rule.weight,
                details: details(perf),
                recommendation: *recommendation,
            },
            Some(_) => Outcome::Ok(OK_DETAILS.to_string()),
        },

        Check::Banded {
            metric,
            quantity,
            format,
            bands,
        } => {
            let Some(value) = perf.and_then(metric) else {
                return Outcome::Unavailable;
            };

            match bands.iter().find(|band| value > band.above) {
                Some(band) => Outcome::Issue {
                    points: band.points,
                    details: format!("{} is {} ({})", quantity, band.label, format(value)),
                    recommendation: band.recommendation,
                },
                None => Outcome::Ok(format!("{} is good ({})", quantity, format(value))),
            }
        }

        Check::Ratio {
            counts,
            full_above,
            details,
            ok_details,
            full_recommendation,
            partial_recommendation,
        } => {
            let Some(perf) = perf else {
                return Outcome::Unavailable;
            };

            let (failing, total) = counts(perf);
            if total == 0 || failing == 0 {
                return Outcome::Ok(ok_details(total));
            }

            let ratio = failing as f64 / total as f64;
            if ratio > *full_above {
                Outcome::Issue {
                    points: rule.weight,
                    details: details(failing, total),
                    recommendation: *full_recommendation,
                }
            } else {
                // ceil(ratio * weight) without float rounding error
                let weight = rule.weight as usize;
                let share = (failing * weight).div_ceil(total) as i32;
                Outcome::Issue {
                    points: share.min(rule.weight),
                    details: details(failing, total),
                    recommendation: *partial_recommendation,
                }
            }
        }
    }
}
