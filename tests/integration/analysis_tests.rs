//! Integration tests for batch analysis
//!
//! Pages are served by wiremock; the browser pass runs against fake
//! renderers so no Chrome install is needed.

use async_trait::async_trait;
use seo_crawler::analysis::{Analyzer, BatchProgress, BATCH_SIZE};
use seo_crawler::config::Config;
use seo_crawler::crawler::PageFetcher;
use seo_crawler::output::{AnalysisReport, SiteStatistics};
use seo_crawler::performance::{ImageProbe, PageRenderer, PerformanceCollector, RenderedPage};
use seo_crawler::SeoError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GOOD_PAGE: &str = r#"<html><head>
    <title>Well structured page</title>
    <meta name="description" content="A page with everything in place">
    <link rel="canonical" href="/good">
    </head><body><h1>Main topic</h1><h2>Section</h2></body></html>"#;

const BARE_PAGE: &str = "<html><head></head><body><p>Nothing here</p></body></html>";

/// Renders every page as fast, fully accessible and with structured data
#[derive(Default)]
struct FastRenderer {
    calls: AtomicUsize,
}

#[async_trait]
impl PageRenderer for FastRenderer {
    async fn render(&self, _url: &str) -> Result<RenderedPage, SeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RenderedPage {
            load_time: Duration::from_millis(800),
            first_contentful_paint_ms: Some(400.0),
            dom_size: 40 * 1024,
            images: vec![ImageProbe {
                src: "https://example.com/logo.png".to_string(),
                has_alt: true,
                alt_text: "Logo".to_string(),
            }],
            json_ld_blocks: vec![r#"{"@type":"WebPage"}"#.to_string()],
            total_requests: 8,
            failed_requests: 0,
        })
    }
}

/// Tracks how many renders overlap
#[derive(Default)]
struct CountingRenderer {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl PageRenderer for CountingRenderer {
    async fn render(&self, _url: &str) -> Result<RenderedPage, SeoError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(RenderedPage::default())
    }
}

struct BrokenRenderer;

#[async_trait]
impl PageRenderer for BrokenRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, SeoError> {
        Err(SeoError::Browser {
            url: url.to_string(),
            message: "browser crashed".to_string(),
        })
    }
}

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html.as_bytes().to_vec(), "text/html"),
        )
        .mount(server)
        .await;
}

fn analyzer<R: PageRenderer>(renderer: R, max_pages: usize) -> Analyzer<R> {
    let config = Config::default();
    Analyzer::with_parts(
        PageFetcher::new(&config).unwrap(),
        PerformanceCollector::with_renderer(renderer, config.analysis.max_images),
        max_pages,
    )
}

#[tokio::test]
async fn test_basic_analysis_scores_every_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", GOOD_PAGE).await;
    mount_page(&server, "/bare", BARE_PAGE).await;

    let urls = vec![
        format!("{}/good", server.uri()),
        format!("{}/bare", server.uri()),
    ];
    let renderer = FastRenderer::default();
    let analyzer = analyzer(renderer, 50);
    let analysis = analyzer.analyze_site(&urls, false).await.unwrap();

    assert_eq!(analysis.results.len(), 2);
    assert_eq!(analysis.results[0].url(), urls[0]);
    assert_eq!(analysis.results[1].url(), urls[1]);

    // Structure 45, performance unavailable, content unavailable,
    // canonical ok and structured data unavailable
    assert_eq!(analysis.results[0].seo_score, Some(50));
    // Every structure rule fails, the canonical link is missing too
    assert_eq!(analysis.results[1].seo_score, Some(0));
    assert!(analysis.results.iter().all(|r| r.performance.is_none()));
}

#[tokio::test]
async fn test_basic_mode_never_renders() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", GOOD_PAGE).await;

    let renderer = Arc::new(FastRenderer::default());
    let analyzer = analyzer(SharedRenderer(renderer.clone()), 50);
    analyzer
        .analyze_site(&[format!("{}/good", server.uri())], false)
        .await
        .unwrap();

    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_full_analysis_uses_performance_data() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", GOOD_PAGE).await;

    let analyzer = analyzer(FastRenderer::default(), 50);
    let page = analyzer
        .analyze_page(&format!("{}/good", server.uri()))
        .await;

    assert_eq!(page.seo_score, Some(100));
    let perf = page.performance.as_ref().expect("performance pass missing");
    assert_eq!(perf.fcp, Some(0.4));
    assert_eq!(perf.page_weight_kb, Some(40));
    assert!(perf.has_structured_data);
    assert!(page.penalties().is_empty());
}

#[tokio::test]
async fn test_error_pages_isolated_and_skip_browser_pass() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", GOOD_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let renderer = Arc::new(FastRenderer::default());
    let analyzer = analyzer(SharedRenderer(renderer.clone()), 50);
    let urls = vec![
        format!("{}/gone", server.uri()),
        format!("{}/good", server.uri()),
    ];
    let analysis = analyzer.analyze_site(&urls, true).await.unwrap();

    assert!(analysis.results[0].is_error());
    assert_eq!(analysis.results[0].page.status(), 410);
    assert!(analysis.results[0].seo_score.is_none());
    assert_eq!(analysis.results[1].seo_score, Some(100));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_browser_pass_scores_as_basic() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", GOOD_PAGE).await;

    let analyzer = analyzer(BrokenRenderer, 50);
    let page = analyzer
        .analyze_page(&format!("{}/good", server.uri()))
        .await;

    assert!(!page.is_error());
    assert!(page.performance.is_none());
    assert!(page
        .performance_error
        .as_deref()
        .is_some_and(|e| e.contains("browser crashed")));
    assert_eq!(page.seo_score, Some(50));
}

#[tokio::test]
async fn test_batches_bound_concurrency_and_report_progress() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", GOOD_PAGE).await;

    let renderer = Arc::new(CountingRenderer::default());
    let analyzer = analyzer(SharedRenderer(renderer.clone()), 50);
    let urls: Vec<String> = (0..12)
        .map(|_| format!("{}/good", server.uri()))
        .collect();

    let mut progress = Vec::new();
    let analysis = analyzer
        .analyze_site_with_progress(&urls, true, |p| progress.push(p))
        .await
        .unwrap();

    assert_eq!(analysis.results.len(), 12);
    assert!(renderer.peak.load(Ordering::SeqCst) <= BATCH_SIZE);
    assert_eq!(
        progress,
        vec![
            BatchProgress { processed: 5, total: 12 },
            BatchProgress { processed: 10, total: 12 },
            BatchProgress { processed: 12, total: 12 },
        ]
    );
    assert_eq!(progress.last().map(|p| p.percent()), Some(100));
}

#[tokio::test]
async fn test_url_list_capped() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", GOOD_PAGE).await;

    let analyzer = analyzer(FastRenderer::default(), 3);
    let urls: Vec<String> = (0..7)
        .map(|_| format!("{}/good", server.uri()))
        .collect();
    let analysis = analyzer.analyze_site(&urls, false).await.unwrap();

    assert_eq!(analysis.results.len(), 3);
}

#[tokio::test]
async fn test_empty_url_list_rejected() {
    let analyzer = analyzer(FastRenderer::default(), 50);
    let result = analyzer.analyze_site(&[], true).await;
    assert!(matches!(result, Err(SeoError::InvalidInput(_))));
}

#[tokio::test]
async fn test_report_statistics() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", GOOD_PAGE).await;
    mount_page(&server, "/bare", BARE_PAGE).await;

    let analyzer = analyzer(FastRenderer::default(), 50);
    let urls = vec![
        format!("{}/good", server.uri()),
        format!("{}/bare", server.uri()),
        format!("{}/missing", server.uri()),
    ];
    let report = AnalysisReport::from(analyzer.analyze_site(&urls, true).await.unwrap());

    assert_eq!(report.total_pages, 3);
    let summary = match &report.stats {
        SiteStatistics::Computed(summary) => summary,
        SiteStatistics::Empty { error } => panic!("no statistics: {}", error),
    };
    assert_eq!(summary.successfully_analyzed, 2);
    assert_eq!(summary.pages_with_errors, 1);
    assert_eq!(summary.pages_with_title, 50.0);
    assert_eq!(summary.average_fcp, Some(0.4));
    assert!(summary.common_issues.len() <= 5);
    assert!(summary
        .common_issues
        .iter()
        .any(|issue| issue.name == "Meta title" && issue.count == 1));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["results"][2]["status"], 404);
    assert!(json["stats"]["averageSEOScore"].is_number());
}

#[tokio::test]
async fn test_all_errors_give_empty_statistics() {
    let server = MockServer::start().await;

    let analyzer = analyzer(FastRenderer::default(), 50);
    let urls = vec![format!("{}/missing", server.uri())];
    let report = AnalysisReport::from(analyzer.analyze_site(&urls, false).await.unwrap());

    assert!(matches!(report.stats, SiteStatistics::Empty { .. }));
}

/// Lets a test keep a handle on a renderer the analyzer owns
struct SharedRenderer<R>(Arc<R>);

#[async_trait]
impl<R: PageRenderer> PageRenderer for SharedRenderer<R> {
    async fn render(&self, url: &str) -> Result<RenderedPage, SeoError> {
        self.0.render(url).await
    }
}
