//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use seo_crawler::config::Config;
use seo_crawler::crawler::{crawl_site, Crawler, PageResult};
use seo_crawler::SeoError;
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html.as_bytes().to_vec(), "text/html"),
        )
        .mount(server)
        .await;
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{}</title></head><body><h1>{}</h1>{}</body></html>"#,
        title, title, body
    )
}

fn page_urls(pages: &[PageResult]) -> Vec<String> {
    pages.iter().map(|p| p.url().to_string()).collect()
}

#[tokio::test]
async fn test_crawl_follows_internal_links_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &page(
            "Home",
            r#"<a href="/a">A</a>
               <a href="https://other.com/">Elsewhere</a>
               <a href="/img.png">Image</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/a", &page("A", "<p>Leaf</p>")).await;

    let report = crawl_site(&Config::default(), &format!("{}/", base), None)
        .await
        .expect("crawl failed");

    assert_eq!(
        page_urls(&report.pages),
        vec![format!("{}/", base), format!("{}/a", base)]
    );
    assert_eq!(report.page_count, 2);
    assert_eq!(report.base_url, format!("{}/", base));
    assert!(report.excluded_urls.iter().any(|u| u.contains("img.png")));
    assert_eq!(report.excluded_count, 1);

    let home = report.pages[0].as_page().expect("home page is an error");
    assert_eq!(home.external_links_count, 1);
    assert_eq!(home.internal_links_count, 1);
    assert_eq!(home.title, "Home");
    assert_eq!(home.status, 200);
    assert!(home
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("text/html")));
}

#[tokio::test]
async fn test_crawl_order_is_depth_first_preorder() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &page("Home", r#"<a href="/a">A</a><a href="/c">C</a>"#)).await;
    mount_page(&server, "/a", &page("A", r#"<a href="/b">B</a><a href="/">Home</a>"#)).await;
    mount_page(&server, "/b", &page("B", r#"<a href="/c">C</a>"#)).await;
    mount_page(&server, "/c", &page("C", "")).await;

    let report = crawl_site(&Config::default(), &format!("{}/", base), None)
        .await
        .unwrap();

    assert_eq!(
        page_urls(&report.pages),
        vec![
            format!("{}/", base),
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base),
        ]
    );
}

#[tokio::test]
async fn test_error_pages_recorded_and_crawl_continues() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &page("Home", r#"<a href="/missing">Missing</a><a href="/ok">Ok</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", &page("Ok", "")).await;

    let report = crawl_site(&Config::default(), &format!("{}/", base), None)
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 3);
    match &report.pages[1] {
        PageResult::Error(error) => {
            assert_eq!(error.url, format!("{}/missing", base));
            assert_eq!(error.status, 404);
        }
        other => panic!("expected an error record, got {:?}", other),
    }
    assert!(report.pages[2].as_page().is_some());
}

#[tokio::test]
async fn test_unreachable_seed_gives_generic_error_record() {
    // Bind a server to reserve a port, then drop it so connections fail
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());
    drop(server);

    let report = crawl_site(&Config::default(), &seed, None).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert!(report.pages[0].is_error());
    assert_eq!(report.pages[0].status(), 500);
}

#[tokio::test]
async fn test_crawl_respects_page_budget() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (1..=6)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &page("Home", &links)).await;
    for i in 1..=6 {
        mount_page(&server, &format!("/p{}", i), &page(&format!("P{}", i), &links)).await;
    }

    let report = crawl_site(&Config::default(), &format!("{}/", base), Some(3))
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 3);
    assert_eq!(
        page_urls(&report.pages),
        vec![
            format!("{}/", base),
            format!("{}/p1", base),
            format!("{}/p2", base),
        ]
    );
}

#[tokio::test]
async fn test_configured_budget_used_by_default() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &page("Home", r#"<a href="/a">A</a><a href="/b">B</a>"#)).await;
    mount_page(&server, "/a", &page("A", "")).await;
    mount_page(&server, "/b", &page("B", "")).await;

    let mut config = Config::default();
    config.crawler.max_pages = 2;
    let crawler = Crawler::new(&config).unwrap();
    let report = crawler.crawl(&format!("{}/", base), None).await.unwrap();

    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_no_duplicate_visits() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &page(
            "Home",
            r##"<a href="/a">A</a>
                <a href="/a#details">A details</a>
                <a href="/b">B</a>
                <a href="/">Self</a>"##,
        ),
    )
    .await;
    mount_page(&server, "/a", &page("A", r#"<a href="/b">B</a><a href="/">Home</a>"#)).await;
    mount_page(&server, "/b", &page("B", r#"<a href="/a">A</a>"#)).await;

    let report = crawl_site(&Config::default(), &format!("{}/", base), None)
        .await
        .unwrap();

    let urls = page_urls(&report.pages);
    let unique: HashSet<&String> = urls.iter().collect();
    assert_eq!(urls.len(), unique.len());
    assert_eq!(urls.len(), 3);
}

#[tokio::test]
async fn test_excluded_urls_deduplicated_across_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &page(
            "Home",
            r#"<a href="/a">A</a><a href="/brochure.pdf">PDF</a><a href="/search?q=x">Search</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/a", &page("A", r#"<a href="/brochure.pdf">PDF</a>"#)).await;

    let report = crawl_site(&Config::default(), &format!("{}/", base), None)
        .await
        .unwrap();

    assert_eq!(report.excluded_count, 2);
    assert_eq!(report.excluded_urls, vec!["/brochure.pdf", "/search?q=x"]);
}

#[tokio::test]
async fn test_invalid_seed_rejected_before_work() {
    let result = crawl_site(&Config::default(), "https://example.com/report.pdf", None).await;
    assert!(matches!(result, Err(SeoError::InvalidSeed { .. })));
}

#[tokio::test]
async fn test_redirected_page_links_resolve_against_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/docs/"))
        .mount(&server)
        .await;
    mount_page(&server, "/docs/", &page("Docs", r#"<a href="intro">Intro</a>"#)).await;
    mount_page(&server, "/docs/intro", &page("Intro", "")).await;

    let report = crawl_site(&Config::default(), &format!("{}/old", base), None)
        .await
        .unwrap();

    // The record keeps the requested URL
    assert_eq!(
        page_urls(&report.pages),
        vec![format!("{}/old", base), format!("{}/docs/intro", base)]
    );
    let first = report.pages[0].as_page().expect("redirected page is an error");
    assert_eq!(first.title, "Docs");
    assert_eq!(first.links[0].url, format!("{}/docs/intro", base));
}
