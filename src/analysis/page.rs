//! Analyzed page records

use crate::crawler::{PageRecord, PageResult};
use crate::performance::{PerformanceError, PerformanceRecord};
use crate::scoring::{score, Factor, ScoreBreakdown};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A page record enriched with performance data and its SEO score
///
/// Serializes as one flat object: the page record's fields, then the
/// performance record's fields (browser values win on shared keys such as
/// `loadTime`), then `performanceError`, `seoScore`, `seoPenalties` and
/// `scoreDetails` when present. Error pages carry only the error record;
/// nothing else is computed for them.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedPage {
    pub page: PageResult,
    pub performance: Option<PerformanceRecord>,
    /// Why the browser pass failed, when it was attempted and failed
    pub performance_error: Option<String>,
    pub seo_score: Option<u32>,
    pub seo_penalties: Option<Vec<Factor>>,
    pub score_details: Option<ScoreBreakdown>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    performance_error: Option<&'a String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seo_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seo_penalties: Option<&'a Vec<Factor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score_details: Option<&'a ScoreBreakdown>,
}

impl Serialize for AnalyzedPage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = Map::new();
        merge_into(&mut fields, &self.page).map_err(S::Error::custom)?;
        if let Some(performance) = &self.performance {
            merge_into(&mut fields, performance).map_err(S::Error::custom)?;
        }
        let score = ScoreFields {
            performance_error: self.performance_error.as_ref(),
            seo_score: self.seo_score,
            seo_penalties: self.seo_penalties.as_ref(),
            score_details: self.score_details.as_ref(),
        };
        merge_into(&mut fields, &score).map_err(S::Error::custom)?;

        fields.serialize(serializer)
    }
}

/// Inserts the fields of `value`, which must serialize as an object
fn merge_into<T: Serialize>(fields: &mut Map<String, Value>, value: &T) -> serde_json::Result<()> {
    match serde_json::to_value(value)? {
        Value::Object(object) => {
            fields.extend(object);
            Ok(())
        }
        other => Err(serde_json::Error::custom(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

impl AnalyzedPage {
    /// Scores a successfully extracted page
    ///
    /// A failed performance pass scores as if it never ran.
    pub fn scored(
        record: PageRecord,
        performance: Option<Result<PerformanceRecord, PerformanceError>>,
    ) -> Self {
        let (performance, performance_error) = match performance {
            Some(Ok(perf)) => (Some(perf), None),
            Some(Err(error)) => (None, Some(error.error)),
            None => (None, None),
        };

        let result = score(&record, performance.as_ref());

        Self {
            page: PageResult::from(record),
            performance,
            performance_error,
            seo_score: Some(result.score),
            seo_penalties: Some(result.penalties),
            score_details: Some(result.breakdown),
        }
    }

    /// Wraps a failed basic extraction
    pub fn failed(page: PageResult) -> Self {
        Self {
            page,
            performance: None,
            performance_error: None,
            seo_score: None,
            seo_penalties: None,
            score_details: None,
        }
    }

    pub fn url(&self) -> &str {
        self.page.url()
    }

    pub fn is_error(&self) -> bool {
        self.page.is_error()
    }

    pub fn record(&self) -> Option<&PageRecord> {
        self.page.as_page()
    }

    /// Load time of the browser pass if it ran, else of the basic fetch
    pub fn load_time(&self) -> Option<f64> {
        match &self.performance {
            Some(perf) => Some(perf.load_time),
            None => self.record().map(|record| record.load_time),
        }
    }

    pub fn penalties(&self) -> &[Factor] {
        self.seo_penalties.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{PageError, PageSignals, ResponseMeta};

    fn record() -> PageRecord {
        PageRecord::new(
            "https://example.com/",
            ResponseMeta {
                status: 200,
                content_type: None,
                response_time: None,
                load_time: 0.4,
            },
            PageSignals {
                title: "Home".to_string(),
                h1_count: 1,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_scored_without_performance() {
        let page = AnalyzedPage::scored(record(), None);
        assert!(page.seo_score.is_some());
        assert_eq!(page.load_time(), Some(0.4));
        assert!(page.performance_error.is_none());
    }

    #[test]
    fn test_failed_performance_pass_kept_as_message() {
        let error = PerformanceError {
            url: "https://example.com/".to_string(),
            error: "Browser navigation timed out".to_string(),
        };
        let page = AnalyzedPage::scored(record(), Some(Err(error)));
        assert_eq!(
            page.performance_error.as_deref(),
            Some("Browser navigation timed out")
        );
        assert_eq!(
            page.seo_score,
            AnalyzedPage::scored(record(), None).seo_score
        );
    }

    #[test]
    fn test_serializes_flat_with_score() {
        let page = AnalyzedPage::scored(record(), None);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["url"], "https://example.com/");
        assert_eq!(json["title"], "Home");
        assert!(json["seoScore"].is_number());
        assert!(json["scoreDetails"]["categories"]["structure"]["maxPoints"].is_number());
        assert!(json.get("performance").is_none());
    }

    #[test]
    fn test_performance_fields_merged_into_page() {
        let perf = PerformanceRecord {
            url: "https://example.com/".to_string(),
            load_time: 2.5,
            fcp: Some(1.2),
            page_weight_kb: Some(80),
            total_requests: 14,
            failed_requests: 1,
            images_count: 2,
            images_without_alt: 0,
            has_structured_data: true,
            structured_data_blocks: 1,
            invalid_structured_data_blocks: 0,
        };
        let page = AnalyzedPage::scored(record(), Some(Ok(perf)));
        let json = serde_json::to_value(&page).unwrap();

        assert!(json.get("performance").is_none());
        assert_eq!(json["title"], "Home");
        assert_eq!(json["fcp"], 1.2);
        assert_eq!(json["pageSize"], 80);
        assert_eq!(json["totalRequests"], 14);
        assert_eq!(json["hasStructuredData"], true);
        // Browser load time replaces the basic fetch time
        assert_eq!(json["loadTime"], 2.5);
        assert!(json["seoScore"].is_number());
    }

    #[test]
    fn test_performance_error_serialized() {
        let error = PerformanceError {
            url: "https://example.com/".to_string(),
            error: "Browser navigation timed out".to_string(),
        };
        let page = AnalyzedPage::scored(record(), Some(Err(error)));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["performanceError"], "Browser navigation timed out");
        assert_eq!(json["loadTime"], 0.4);
    }

    #[test]
    fn test_error_page_has_no_score() {
        let page = AnalyzedPage::failed(PageResult::Error(PageError {
            url: "https://example.com/x".to_string(),
            status: 404,
            error: "Request failed with status code 404".to_string(),
        }));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["status"], 404);
        assert!(json.get("seoScore").is_none());
        assert!(page.penalties().is_empty());
    }
}
